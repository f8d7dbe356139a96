use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

const NAMESPACE_SEPARATOR: char = '\\';

/// Fully-qualified type identifier (e.g., `App\Model\Channel`).
///
/// Names are stored without the leading global-namespace separator so
/// `\App\Channel` and `App\Channel` compare equal. Everything else is compared
/// exactly: no case folding and no alias resolution.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

/// A string that is not a syntactically valid fully-qualified type name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("'{name}' {reason}")]
pub struct InvalidTypeName {
    pub name: String,
    pub reason: String,
}

impl InvalidTypeName {
    fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl TypeName {
    /// Validate and normalize a fully-qualified name.
    pub fn parse(raw: &str) -> Result<Self, InvalidTypeName> {
        let trimmed = raw.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(raw);
        if trimmed.is_empty() {
            return Err(InvalidTypeName::new(raw, "is empty"));
        }

        for segment in trimmed.split(NAMESPACE_SEPARATOR) {
            let mut chars = segment.chars();
            let Some(first) = chars.next() else {
                return Err(InvalidTypeName::new(raw, "contains an empty namespace segment"));
            };
            if !is_identifier_start(first) {
                return Err(InvalidTypeName::new(
                    raw,
                    format!("segment '{segment}' must start with a letter or underscore"),
                ));
            }
            if let Some(bad) = chars.find(|c| !is_identifier_continue(*c)) {
                return Err(InvalidTypeName::new(
                    raw,
                    format!("segment '{segment}' contains invalid character {bad:?}"),
                ));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

impl TryFrom<String> for TypeName {
    type Error = InvalidTypeName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for TypeName {
    type Error = InvalidTypeName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
