//! Class declaration nodes handed to the rule by the rewriting host.
//!
//! A `ClassDeclaration` is produced by an external parser with names already
//! resolved to fully-qualified form. The rule reads it and, on a match,
//! builds a new declaration with capability-use statements appended; it
//! never edits a declaration in place or touches anything but the statement
//! list.

use crate::mapping::TypeName;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// One class definition from the source tree.
pub struct ClassDeclaration {
    /// Fully-qualified class name; `None` for anonymous classes.
    #[serde(default)]
    name: Option<TypeName>,
    /// Fully-qualified parent named in the `extends` clause.
    #[serde(default)]
    extends: Option<TypeName>,
    #[serde(default)]
    stmts: Vec<ClassStmt>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A statement in a class body.
pub enum ClassStmt {
    /// `use A\Trait, B\Trait;`
    CapabilityUse(CapabilityUse),
    /// Any other member, carried through untouched.
    Member { text: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Capability-use statement composing one or more markers.
pub struct CapabilityUse {
    pub markers: Vec<TypeName>,
}

impl CapabilityUse {
    pub fn single(marker: TypeName) -> Self {
        Self {
            markers: vec![marker],
        }
    }
}

impl ClassDeclaration {
    pub fn named(name: TypeName) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn extending(mut self, parent: TypeName) -> Self {
        self.extends = Some(parent);
        self
    }

    pub fn with_stmt(mut self, stmt: ClassStmt) -> Self {
        self.stmts.push(stmt);
        self
    }

    pub fn name(&self) -> Option<&TypeName> {
        self.name.as_ref()
    }

    pub fn extends(&self) -> Option<&TypeName> {
        self.extends.as_ref()
    }

    pub fn stmts(&self) -> &[ClassStmt] {
        &self.stmts
    }

    /// Every marker already composed into the class, in statement order.
    pub fn capability_uses(&self) -> impl Iterator<Item = &TypeName> {
        self.stmts.iter().flat_map(|stmt| match stmt {
            ClassStmt::CapabilityUse(used) => used.markers.as_slice(),
            ClassStmt::Member { .. } => &[][..],
        })
    }

    pub fn uses_capability(&self, marker: &TypeName) -> bool {
        self.capability_uses().any(|used| used == marker)
    }

    /// Build a new declaration with `uses` appended after the existing body.
    pub fn with_appended(mut self, uses: impl IntoIterator<Item = CapabilityUse>) -> Self {
        self.stmts.extend(uses.into_iter().map(ClassStmt::CapabilityUse));
        self
    }

    /// Label for logs: the class name or `<anonymous>`.
    pub fn display_name(&self) -> &str {
        self.name.as_ref().map_or("<anonymous>", TypeName::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(raw: &str) -> TypeName {
        TypeName::parse(raw).unwrap()
    }

    #[test]
    fn capability_uses_flatten_grouped_statements() {
        let decl = ClassDeclaration::named(name("App\\Channel"))
            .with_stmt(ClassStmt::Member {
                text: "private $code;".into(),
            })
            .with_stmt(ClassStmt::CapabilityUse(CapabilityUse {
                markers: vec![name("App\\A"), name("App\\B")],
            }))
            .with_stmt(ClassStmt::CapabilityUse(CapabilityUse::single(name("App\\C"))));

        let used: Vec<&str> = decl.capability_uses().map(TypeName::as_str).collect();
        assert_eq!(used, vec!["App\\A", "App\\B", "App\\C"]);
        assert!(decl.uses_capability(&name("\\App\\B")));
        assert!(!decl.uses_capability(&name("App\\D")));
    }

    #[test]
    fn appending_keeps_existing_statements_first() {
        let member = ClassStmt::Member {
            text: "public function code(): string {}".into(),
        };
        let decl = ClassDeclaration::named(name("App\\Channel")).with_stmt(member.clone());
        let grown = decl.with_appended([CapabilityUse::single(name("App\\T1"))]);

        assert_eq!(grown.stmts().len(), 2);
        assert_eq!(grown.stmts()[0], member);
        assert_eq!(
            grown.stmts()[1],
            ClassStmt::CapabilityUse(CapabilityUse::single(name("App\\T1")))
        );
    }

    #[test]
    fn deserializes_host_json() {
        let decl: ClassDeclaration = serde_json::from_value(json!({
            "name": "\\App\\Channel",
            "extends": "App\\BaseChannel",
            "stmts": [
                {"kind": "member", "text": "private $code;"},
                {"kind": "capability_use", "markers": ["App\\ChannelInterface"]}
            ]
        }))
        .unwrap();

        assert_eq!(decl.display_name(), "App\\Channel");
        assert_eq!(decl.extends(), Some(&name("App\\BaseChannel")));
        assert!(decl.uses_capability(&name("App\\ChannelInterface")));

        let anonymous: ClassDeclaration = serde_json::from_value(json!({})).unwrap();
        assert_eq!(anonymous, ClassDeclaration::anonymous());
        assert_eq!(anonymous.display_name(), "<anonymous>");
    }

    #[test]
    fn rejects_malformed_names_in_host_json() {
        let result = serde_json::from_value::<ClassDeclaration>(json!({
            "name": "App\\",
        }));
        assert!(result.is_err());
    }
}
