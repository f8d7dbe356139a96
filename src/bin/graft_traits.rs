//! Applies the trait-injection rule to class declarations read from stdin.
//!
//! Declarations arrive as JSON (one object, an array, or NDJSON) produced by
//! an external parser. Each one is emitted as a JSON line tagged `mutated` or
//! `unchanged`; a printer downstream turns mutated declarations back into
//! source. Logs go to stderr and honor `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use traitgraft::{
    AncestryResolver, ClassDeclaration, Outcome, StaticHierarchy, TraitInjectionRule,
    load_mapping_from_path, parse_declaration_stream,
};

#[derive(Parser, Debug)]
#[command(
    name = "graft-traits",
    version,
    about = "Add configured traits to classes extending a configured base type"
)]
struct Cli {
    /// JSON file mapping base types to the traits they imply.
    #[arg(long)]
    config: PathBuf,

    /// JSON file mapping classes to their direct parents. Without it only
    /// the parent written in each declaration is known.
    #[arg(long)]
    hierarchy: Option<PathBuf>,

    /// Emit only declarations that changed.
    #[arg(long)]
    only_mutated: bool,
}

#[derive(Serialize)]
struct Record<'a> {
    outcome: &'static str,
    declaration: &'a ClassDeclaration,
}

fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mapping = load_mapping_from_path(&cli.config)
        .with_context(|| format!("loading capability mapping {}", cli.config.display()))?;
    let hierarchy = match &cli.hierarchy {
        Some(path) => StaticHierarchy::load_from_path(path)
            .with_context(|| format!("loading class hierarchy {}", path.display()))?,
        None => StaticHierarchy::new(),
    };
    tracing::info!(
        base_types = mapping.len(),
        known_classes = hierarchy.len(),
        "configuration loaded"
    );

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading class declarations from stdin")?;
    let declarations = parse_declaration_stream(&input)?;

    let rule = TraitInjectionRule::new(mapping, hierarchy);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mutated = emit_outcomes(&rule, &declarations, cli.only_mutated, &mut out)?;
    out.flush()?;

    tracing::info!(
        declarations = declarations.len(),
        mutated,
        "rule applied"
    );
    Ok(())
}

fn emit_outcomes<R: AncestryResolver>(
    rule: &TraitInjectionRule<R>,
    declarations: &[ClassDeclaration],
    only_mutated: bool,
    out: &mut impl Write,
) -> Result<usize> {
    let mut mutated = 0;
    for declaration in declarations {
        let outcome = rule.apply(declaration);
        let record = match &outcome {
            Outcome::Mutated(changed) => {
                mutated += 1;
                Record {
                    outcome: "mutated",
                    declaration: changed,
                }
            }
            Outcome::Unchanged if only_mutated => continue,
            Outcome::Unchanged => Record {
                outcome: "unchanged",
                declaration,
            },
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(mutated)
}
