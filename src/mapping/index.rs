//! Validated, ordered view of a capability mapping.
//!
//! Construction is the only place configuration can fail: every key and
//! marker is parsed into a `TypeName`, keys must stay unique after
//! normalization, and repeated markers under one key are collapsed. Once
//! built, the mapping is immutable and cheap to share across threads.

use crate::mapping::error::ConfigurationError;
use crate::mapping::identity::TypeName;
use crate::mapping::model::RawCapabilityMapping;
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// Base type → capability markers, in configuration order.
pub struct CapabilityMapping {
    entries: IndexMap<TypeName, Vec<TypeName>>,
}

impl CapabilityMapping {
    /// Iterate `(base type, markers)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &[TypeName])> {
        self.entries
            .iter()
            .map(|(base, markers)| (base, markers.as_slice()))
    }

    /// Markers configured for `base`, if it is a configured base type.
    pub fn markers_for(&self, base: &TypeName) -> Option<&[TypeName]> {
        self.entries.get(base).map(Vec::as_slice)
    }

    pub fn base_types(&self) -> impl Iterator<Item = &TypeName> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<RawCapabilityMapping> for CapabilityMapping {
    type Error = ConfigurationError;

    fn try_from(raw: RawCapabilityMapping) -> Result<Self, Self::Error> {
        let mut entries = IndexMap::with_capacity(raw.len());
        for (raw_base, raw_markers) in raw {
            let base = parse_base(&raw_base)?;
            if entries.contains_key(&base) {
                return Err(ConfigurationError::DuplicateBaseType(base.to_string()));
            }
            let markers = collect_markers(&base, &raw_markers)?;
            entries.insert(base, markers);
        }
        Ok(Self { entries })
    }
}

impl TryFrom<Value> for CapabilityMapping {
    type Error = ConfigurationError;

    /// Shape-check a dynamic JSON value, then validate it like a raw mapping.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ConfigurationError::WrongShape(format!(
                    "expected an object of base types, got {}",
                    value_kind(&other)
                )));
            }
        };

        let mut raw = RawCapabilityMapping::with_capacity(object.len());
        for (base, markers) in object {
            let items = match markers {
                Value::Array(items) => items,
                other => {
                    return Err(ConfigurationError::WrongShape(format!(
                        "markers for '{base}' must be an array, got {}",
                        value_kind(&other)
                    )));
                }
            };
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(name) => names.push(name),
                    other => {
                        return Err(ConfigurationError::WrongShape(format!(
                            "markers for '{base}' must be strings, got {}",
                            value_kind(&other)
                        )));
                    }
                }
            }
            raw.insert(base, names);
        }
        Self::try_from(raw)
    }
}

fn parse_base(raw: &str) -> Result<TypeName, ConfigurationError> {
    let bare = raw.trim();
    if bare.strip_prefix('\\').unwrap_or(bare).is_empty() {
        return Err(ConfigurationError::EmptyBaseType);
    }
    TypeName::parse(raw).map_err(ConfigurationError::InvalidBaseType)
}

fn collect_markers(base: &TypeName, raw: &[String]) -> Result<Vec<TypeName>, ConfigurationError> {
    let mut markers: Vec<TypeName> = Vec::with_capacity(raw.len());
    for raw_marker in raw {
        let marker = TypeName::parse(raw_marker).map_err(|error| {
            ConfigurationError::InvalidMarker {
                base: base.to_string(),
                error,
            }
        })?;
        if markers.contains(&marker) {
            tracing::debug!(
                domain = "mapping",
                base = %base,
                marker = %marker,
                "collapsing repeated capability marker",
            );
            continue;
        }
        markers.push(marker);
    }
    Ok(markers)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
