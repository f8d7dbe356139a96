//! Shared library for the trait-grafting rewrite rule.
//!
//! The crate exposes the validated capability mapping, the class declaration
//! model handed over by the parser, the ancestry resolver seam, and the rule
//! that ties them together. A rewriting host parses sources, feeds each class
//! declaration to `TraitInjectionRule::apply`, and prints back whatever comes
//! out as `Outcome::Mutated`; this crate never reads or writes source files.

use anyhow::{Context, Result, ensure};

pub mod ancestry;
pub mod declaration;
pub mod mapping;
pub mod rule;
mod schema_loader;

pub use ancestry::{AncestryChain, AncestryResolver, StaticHierarchy};
pub use declaration::{CapabilityUse, ClassDeclaration, ClassStmt};
pub use mapping::{
    CapabilityMapping, ConfigurationError, InvalidTypeName, RawCapabilityMapping,
    RawClassHierarchy, TypeName, load_mapping_from_path, load_mapping_from_str,
};
pub use rule::{Outcome, Rule, TraitInjectionRule};

/// Parse class declarations from host input: a JSON array, or any number of
/// whitespace-separated objects (a single object and NDJSON included).
///
/// Objects may span lines. A failing declaration is reported by the line it
/// starts on. Input without a single declaration is an error.
pub fn parse_declaration_stream(input: &str) -> Result<Vec<ClassDeclaration>> {
    let declarations = if input.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<ClassDeclaration>>(input)
            .context("Unable to parse JSON array of class declarations")?
    } else {
        let mut declarations = Vec::new();
        let mut stream =
            serde_json::Deserializer::from_str(input).into_iter::<ClassDeclaration>();
        while let Some(next) = stream.next() {
            let offset = stream.byte_offset();
            let decl = next.with_context(|| {
                format!(
                    "Unable to parse class declaration starting on line {}",
                    line_of_next_value(input, offset)
                )
            })?;
            declarations.push(decl);
        }
        declarations
    };

    ensure!(!declarations.is_empty(), "stdin contained no class declarations");
    Ok(declarations)
}

/// 1-based line of the first non-whitespace byte at or after `offset`.
fn line_of_next_value(input: &str, offset: usize) -> usize {
    let rest = &input[offset..];
    let start = offset + (rest.len() - rest.trim_start().len());
    input[..start].matches('\n').count() + 1
}
