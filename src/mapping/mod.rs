//! Capability mapping configuration.
//!
//! This module owns the only fallible step of the rule: turning a
//! `{ base type: [markers] }` document into a validated `CapabilityMapping`.
//! `TypeName` is the shared identifier type used by declarations and
//! ancestry chains as well.

pub mod error;
pub mod identity;
pub mod index;
pub mod model;

pub use error::ConfigurationError;
pub use identity::{InvalidTypeName, TypeName};
pub use index::CapabilityMapping;
pub use model::{
    RawCapabilityMapping, RawClassHierarchy, load_mapping_from_path, load_mapping_from_str,
};
