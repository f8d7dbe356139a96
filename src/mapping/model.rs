//! Raw configuration documents and the file loaders that validate them.
//!
//! The raw aliases mirror the JSON shape one-to-one and carry no guarantees;
//! `CapabilityMapping::try_from` turns them into validated values.

use crate::mapping::error::ConfigurationError;
use crate::mapping::index::CapabilityMapping;
use crate::schema_loader::{CAPABILITY_MAPPING_SCHEMA, load_document, parse_document};
use indexmap::IndexMap;
use std::path::Path;

/// `{ "<base type>": ["<marker>", ...] }` exactly as written.
pub type RawCapabilityMapping = IndexMap<String, Vec<String>>;

/// `{ "<class>": "<parent>" }` exactly as written.
pub type RawClassHierarchy = IndexMap<String, String>;

/// Load a capability mapping from a JSON file.
///
/// The document is checked against the bundled schema before identifiers are
/// validated, so shape errors are reported together with the file name.
pub fn load_mapping_from_path(path: &Path) -> Result<CapabilityMapping, ConfigurationError> {
    let document = load_document(path, &CAPABILITY_MAPPING_SCHEMA)?;
    CapabilityMapping::try_from(document)
}

/// Load a capability mapping from JSON text; `origin` labels errors.
pub fn load_mapping_from_str(
    text: &str,
    origin: &str,
) -> Result<CapabilityMapping, ConfigurationError> {
    let document = parse_document(text, origin, &CAPABILITY_MAPPING_SCHEMA)?;
    CapabilityMapping::try_from(document)
}
