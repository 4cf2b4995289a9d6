//! fluentgen: fluent builder generation from a host type checker.
//!
//! The type resolution engine lives in [`fluentgen_resolver`] and is
//! re-exported here. This crate adds the generator-side ambient pieces:
//! the config file ([`config`]) and tracing setup ([`tracing_config`]).

pub mod config;
pub mod tracing_config;

pub use fluentgen_resolver::*;

use anyhow::Context;
use std::path::Path;

/// Build an engine over `checker` configured from a loaded generator config.
pub fn resolver_for<'a, C>(
    checker: &'a C,
    config: &config::GeneratorConfig,
) -> anyhow::Result<TypeResolver<'a, C>>
where
    C: TypeIntrospection + ?Sized,
{
    let options = config::resolve_resolver_options(config)?;
    tracing::debug!(?options, "configured resolver");
    Ok(TypeResolver::builder(checker).options(options).build())
}

/// Load a type snapshot exported by the host checker.
pub fn load_snapshot(path: &Path) -> anyhow::Result<TypeSnapshot> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read type snapshot: {}", path.display()))?;
    TypeSnapshot::from_json(&source)
        .with_context(|| format!("failed to parse type snapshot: {}", path.display()))
}

#[cfg(test)]
#[path = "../tests/lib_tests.rs"]
mod tests;
