//! Ancestry resolution for class declarations.
//!
//! The rule only needs one answer from the type system: the set of classes a
//! declaration transitively extends. `AncestryResolver` is that seam. Real
//! deployments back it with a reflection service; `StaticHierarchy` is a
//! table-driven implementation used by the host binary and by tests, and any
//! closure of the right shape works as well.
//!
//! `None` and an empty chain both mean "unresolvable" and are never errors.

use crate::declaration::ClassDeclaration;
use crate::mapping::{ConfigurationError, RawClassHierarchy, TypeName};
use crate::schema_loader::{CLASS_HIERARCHY_SCHEMA, load_document, parse_document};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Supplies the transitive superclasses of a declaration.
///
/// Implementations must include every ancestor, not only the direct parent,
/// since a mapping may name a grand-ancestor. Order is informational; callers
/// only test membership.
pub trait AncestryResolver {
    fn resolve(&self, declaration: &ClassDeclaration) -> Option<AncestryChain>;
}

impl<F> AncestryResolver for F
where
    F: Fn(&ClassDeclaration) -> Option<AncestryChain>,
{
    fn resolve(&self, declaration: &ClassDeclaration) -> Option<AncestryChain> {
        self(declaration)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// Ancestor names, most immediate first.
pub struct AncestryChain(Vec<TypeName>);

impl AncestryChain {
    pub fn new(ancestors: Vec<TypeName>) -> Self {
        Self(ancestors)
    }

    /// Exact membership test on the fully-qualified name.
    pub fn contains(&self, name: &TypeName) -> bool {
        self.0.iter().any(|ancestor| ancestor == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeName> {
        self.0.iter()
    }
}

impl FromIterator<TypeName> for AncestryChain {
    fn from_iter<I: IntoIterator<Item = TypeName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone, Debug, Default)]
/// Class → direct parent table, walked transitively.
pub struct StaticHierarchy {
    parents: HashMap<TypeName, TypeName>,
}

impl StaticHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `class extends parent`, returning any parent it replaced.
    pub fn insert(&mut self, class: TypeName, parent: TypeName) -> Option<TypeName> {
        self.parents.insert(class, parent)
    }

    pub fn with_parent(mut self, class: TypeName, parent: TypeName) -> Self {
        self.insert(class, parent);
        self
    }

    pub fn parent_of(&self, class: &TypeName) -> Option<&TypeName> {
        self.parents.get(class)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Walk upwards from `class`, starting at `first_parent`.
    ///
    /// Stops at the first class without a known parent. A cycle ends the walk
    /// at the repeated name and is logged; the chain gathered so far is kept.
    pub fn ancestors_of(&self, class: &TypeName, first_parent: &TypeName) -> AncestryChain {
        let mut seen: HashSet<&TypeName> = HashSet::from([class]);
        let mut chain = Vec::new();
        let mut current = Some(first_parent);
        while let Some(ancestor) = current {
            if !seen.insert(ancestor) {
                tracing::warn!(
                    domain = "ancestry",
                    class = %class,
                    repeated = %ancestor,
                    "class hierarchy contains a cycle; truncating ancestry",
                );
                break;
            }
            chain.push(ancestor.clone());
            current = self.parents.get(ancestor);
        }
        AncestryChain(chain)
    }

    /// Load a `{ class: parent }` JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let document = load_document(path, &CLASS_HIERARCHY_SCHEMA)?;
        Self::from_document(document)
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, ConfigurationError> {
        let document = parse_document(text, origin, &CLASS_HIERARCHY_SCHEMA)?;
        Self::from_document(document)
    }

    fn from_document(document: serde_json::Value) -> Result<Self, ConfigurationError> {
        let raw: RawClassHierarchy = serde_json::from_value(document)
            .map_err(|err| ConfigurationError::WrongShape(err.to_string()))?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawClassHierarchy> for StaticHierarchy {
    type Error = ConfigurationError;

    fn try_from(raw: RawClassHierarchy) -> Result<Self, Self::Error> {
        let mut hierarchy = Self::new();
        for (raw_class, raw_parent) in raw {
            let class =
                TypeName::parse(&raw_class).map_err(ConfigurationError::InvalidHierarchyName)?;
            let parent =
                TypeName::parse(&raw_parent).map_err(ConfigurationError::InvalidHierarchyName)?;
            if hierarchy.parents.contains_key(&class) {
                return Err(ConfigurationError::DuplicateHierarchyEntry(class.to_string()));
            }
            hierarchy.insert(class, parent);
        }
        Ok(hierarchy)
    }
}

impl AncestryResolver for StaticHierarchy {
    /// Anonymous classes are unresolvable. The table is authoritative for a
    /// class it knows; otherwise the written `extends` name seeds the walk.
    fn resolve(&self, declaration: &ClassDeclaration) -> Option<AncestryChain> {
        let class = declaration.name()?;
        let first_parent = self.parents.get(class).or(declaration.extends())?;
        Some(self.ancestors_of(class, first_parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> TypeName {
        TypeName::parse(raw).unwrap()
    }

    fn chain_names(chain: &AncestryChain) -> Vec<&str> {
        chain.iter().map(TypeName::as_str).collect()
    }

    fn sylius_like() -> StaticHierarchy {
        StaticHierarchy::new()
            .with_parent(name("App\\Entity\\Channel"), name("Sylius\\Channel"))
            .with_parent(name("Sylius\\Channel"), name("Sylius\\BaseChannel"))
            .with_parent(name("Sylius\\BaseChannel"), name("Sylius\\Resource"))
    }

    #[test]
    fn resolves_every_transitive_ancestor() {
        let hierarchy = sylius_like();
        let decl = ClassDeclaration::named(name("App\\Entity\\Channel"))
            .extending(name("Sylius\\Channel"));
        let chain = hierarchy.resolve(&decl).unwrap();
        assert_eq!(
            chain_names(&chain),
            vec!["Sylius\\Channel", "Sylius\\BaseChannel", "Sylius\\Resource"]
        );
        assert!(chain.contains(&name("Sylius\\Resource")));
    }

    #[test]
    fn written_parent_seeds_unknown_classes() {
        let hierarchy = sylius_like();
        let decl =
            ClassDeclaration::named(name("App\\Entity\\Shop")).extending(name("Sylius\\Channel"));
        let chain = hierarchy.resolve(&decl).unwrap();
        assert_eq!(
            chain_names(&chain),
            vec!["Sylius\\Channel", "Sylius\\BaseChannel", "Sylius\\Resource"]
        );
    }

    #[test]
    fn table_wins_over_written_parent() {
        let hierarchy = sylius_like();
        let decl = ClassDeclaration::named(name("App\\Entity\\Channel"))
            .extending(name("Somewhere\\Else"));
        let chain = hierarchy.resolve(&decl).unwrap();
        assert!(!chain.contains(&name("Somewhere\\Else")));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn unresolvable_declarations_yield_none() {
        let hierarchy = sylius_like();
        assert!(hierarchy.resolve(&ClassDeclaration::anonymous()).is_none());
        assert!(
            hierarchy
                .resolve(&ClassDeclaration::anonymous().extending(name("Sylius\\Channel")))
                .is_none()
        );
        assert!(
            hierarchy
                .resolve(&ClassDeclaration::named(name("App\\Standalone")))
                .is_none()
        );
    }

    #[test]
    fn cycles_truncate_instead_of_looping() {
        let hierarchy = StaticHierarchy::new()
            .with_parent(name("A"), name("B"))
            .with_parent(name("B"), name("C"))
            .with_parent(name("C"), name("A"));
        let chain = hierarchy.resolve(&ClassDeclaration::named(name("A"))).unwrap();
        assert_eq!(chain_names(&chain), vec!["B", "C"]);

        let self_parent = StaticHierarchy::new().with_parent(name("Loop"), name("Loop"));
        let chain = self_parent
            .resolve(&ClassDeclaration::named(name("Loop")))
            .unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = |decl: &ClassDeclaration| {
            decl.extends()
                .map(|parent| AncestryChain::new(vec![parent.clone()]))
        };
        let decl = ClassDeclaration::named(name("App\\X")).extending(name("App\\Base"));
        let chain = resolver.resolve(&decl).unwrap();
        assert_eq!(chain_names(&chain), vec!["App\\Base"]);
    }

    #[test]
    fn loads_and_validates_json_tables() {
        let hierarchy = StaticHierarchy::from_json_str(
            r#"{"App\\Channel": "\\Sylius\\Channel", "Sylius\\Channel": "Sylius\\Resource"}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.parent_of(&name("App\\Channel")),
            Some(&name("Sylius\\Channel"))
        );

        let err = StaticHierarchy::from_json_str(r#"{"App\\Channel": "Bad Parent"}"#, "inline")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidHierarchyName(_)));

        let err = StaticHierarchy::from_json_str(
            r#"{"App\\Channel": "A", "\\App\\Channel": "B"}"#,
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateHierarchyEntry(_)));

        let err = StaticHierarchy::from_json_str(r#"{"App\\Channel": 3}"#, "inline").unwrap_err();
        assert!(matches!(err, ConfigurationError::Schema { .. }));
    }
}
