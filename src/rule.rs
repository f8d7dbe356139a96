//! The trait-injection rewrite rule.
//!
//! For every class whose ancestry contains a configured base type, the rule
//! appends one capability-use statement per configured marker that the
//! class does not already use. Matching is exact on fully-qualified names;
//! appends follow mapping order, then marker order. The rule holds no
//! mutable state, so one instance can serve any number of threads.

use crate::ancestry::AncestryResolver;
use crate::declaration::{CapabilityUse, ClassDeclaration};
use crate::mapping::{CapabilityMapping, TypeName};
use std::collections::HashSet;

/// A rewrite over class declarations, as seen by a rewriting host.
pub trait Rule {
    /// Stable identifier used in logs and reports.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Returns the rewritten declaration, or `None` when the host should
    /// leave the source untouched.
    fn refactor(&self, declaration: &ClassDeclaration) -> Option<ClassDeclaration>;
}

/// Result of applying the rule to one declaration.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Unchanged,
    /// The declaration with its new capability-use statements appended.
    Mutated(ClassDeclaration),
}

impl Outcome {
    pub fn is_mutated(&self) -> bool {
        matches!(self, Outcome::Mutated(_))
    }

    pub fn into_declaration(self) -> Option<ClassDeclaration> {
        match self {
            Outcome::Unchanged => None,
            Outcome::Mutated(declaration) => Some(declaration),
        }
    }
}

/// Adds the configured capability markers to classes extending a configured
/// base type.
pub struct TraitInjectionRule<R> {
    mapping: CapabilityMapping,
    resolver: R,
}

impl<R: AncestryResolver> TraitInjectionRule<R> {
    pub fn new(mapping: CapabilityMapping, resolver: R) -> Self {
        Self { mapping, resolver }
    }

    pub fn mapping(&self) -> &CapabilityMapping {
        &self.mapping
    }

    /// Apply the rule to one declaration.
    ///
    /// Total for any validated mapping: an unresolvable or empty ancestry is
    /// `Unchanged`, never an error. A marker already used by the declaration,
    /// or already appended earlier in this pass, is skipped.
    pub fn apply(&self, declaration: &ClassDeclaration) -> Outcome {
        let class = declaration.display_name();
        let Some(ancestry) = self
            .resolver
            .resolve(declaration)
            .filter(|chain| !chain.is_empty())
        else {
            tracing::debug!(domain = "rule", class, "ancestry unresolved; skipping");
            return Outcome::Unchanged;
        };

        let mut present: HashSet<&TypeName> = declaration.capability_uses().collect();
        let mut appended = Vec::new();
        for (base, markers) in self.mapping.iter() {
            if !ancestry.contains(base) {
                continue;
            }
            for marker in markers {
                if !present.insert(marker) {
                    continue;
                }
                tracing::debug!(
                    domain = "rule",
                    class,
                    base = %base,
                    marker = %marker,
                    "appending capability use",
                );
                appended.push(CapabilityUse::single(marker.clone()));
            }
        }

        if appended.is_empty() {
            tracing::debug!(domain = "rule", class, "no capability to add");
            return Outcome::Unchanged;
        }
        tracing::debug!(
            domain = "rule",
            class,
            added = appended.len(),
            "declaration mutated",
        );
        Outcome::Mutated(declaration.clone().with_appended(appended))
    }
}

impl<R: AncestryResolver> Rule for TraitInjectionRule<R> {
    fn name(&self) -> &'static str {
        "add_trait_to_class_extending_type"
    }

    fn description(&self) -> &'static str {
        "Adds the given set of traits to the classes extending the given type"
    }

    fn refactor(&self, declaration: &ClassDeclaration) -> Option<ClassDeclaration> {
        self.apply(declaration).into_declaration()
    }
}
