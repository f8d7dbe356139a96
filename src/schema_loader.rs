//! Bundled JSON Schemas for configuration documents.
//!
//! Files are parsed into a `Value`, checked against the schema shipped under
//! `schema/`, and only then handed to the typed constructors. Schema failures
//! report every violation at once so a broken config can be fixed in one
//! pass; identifier syntax is left to the typed constructors.

use crate::mapping::ConfigurationError;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A schema compiled into the binary.
pub(crate) struct BundledSchema {
    pub name: &'static str,
    pub source: &'static str,
}

pub(crate) const CAPABILITY_MAPPING_SCHEMA: BundledSchema = BundledSchema {
    name: "capability_mapping.schema.json",
    source: include_str!("../schema/capability_mapping.schema.json"),
};

pub(crate) const CLASS_HIERARCHY_SCHEMA: BundledSchema = BundledSchema {
    name: "class_hierarchy.schema.json",
    source: include_str!("../schema/class_hierarchy.schema.json"),
};

/// Read, parse, and schema-check a configuration file.
pub(crate) fn load_document(
    path: &Path,
    schema: &BundledSchema,
) -> Result<Value, ConfigurationError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, &path.display().to_string(), schema)
}

/// Parse and schema-check configuration text; `origin` names it in errors.
pub(crate) fn parse_document(
    text: &str,
    origin: &str,
    schema: &BundledSchema,
) -> Result<Value, ConfigurationError> {
    let value: Value = serde_json::from_str(text).map_err(|source| ConfigurationError::Json {
        origin: origin.to_string(),
        source,
    })?;
    validate_document(schema, &value, origin)?;
    Ok(value)
}

pub(crate) fn validate_document(
    schema: &BundledSchema,
    instance: &Value,
    origin: &str,
) -> Result<(), ConfigurationError> {
    let bundled_origin = format!("bundled schema {}", schema.name);
    let schema_value: Value =
        serde_json::from_str(schema.source).map_err(|source| ConfigurationError::Json {
            origin: bundled_origin.clone(),
            source,
        })?;
    let compiled =
        JSONSchema::compile(&schema_value).map_err(|err| ConfigurationError::Schema {
            origin: bundled_origin,
            details: err.to_string(),
        })?;

    let violations = match compiled.validate(instance) {
        Ok(()) => return Ok(()),
        Err(errors) => errors.map(|err| err.to_string()).collect::<Vec<_>>(),
    };
    Err(ConfigurationError::Schema {
        origin: origin.to_string(),
        details: violations.join("\n"),
    })
}
