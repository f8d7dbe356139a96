//! Errors raised while loading or constructing rule configuration.

use crate::mapping::identity::InvalidTypeName;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed configuration, rejected before any declaration is visited.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON.
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },

    /// The configuration document violates its bundled JSON Schema.
    #[error("{origin} failed schema validation:\n{details}")]
    Schema { origin: String, details: String },

    /// The configuration is not an object of string arrays (or string values
    /// for hierarchies).
    #[error("wrong configuration shape: {0}")]
    WrongShape(String),

    #[error("base type name must not be empty")]
    EmptyBaseType,

    #[error("invalid base type {0}")]
    InvalidBaseType(InvalidTypeName),

    #[error("invalid capability marker for base type '{base}': {error}")]
    InvalidMarker { base: String, error: InvalidTypeName },

    /// Two keys normalize to the same fully-qualified name.
    #[error("duplicate base type '{0}'")]
    DuplicateBaseType(String),

    #[error("invalid class hierarchy entry {0}")]
    InvalidHierarchyName(InvalidTypeName),

    #[error("duplicate class hierarchy entry '{0}'")]
    DuplicateHierarchyEntry(String),
}
