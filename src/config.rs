//! Generator configuration file (`fluentgen.json`).
//!
//! The file is JSON with camelCase keys; comments and trailing commas are
//! tolerated. A config may `extends` another file relative to itself, and the
//! child's values win field by field.
//!
//! ```jsonc
//! {
//!   "extends": "./base.json",
//!   "include": ["src/**/*.ts"],
//!   "resolver": {
//!     "maxDepth": 40,
//!     "resolveTemplateLiterals": "false", // strings are accepted for booleans
//!   },
//! }
//! ```

use anyhow::{Context, Result, anyhow, bail};
use fluentgen_resolver::ResolverOptions;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Booleans may be written as `true` or as a string such as `"yes"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    let Some(flag) = Option::<Flag>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match flag {
        Flag::Bool(value) => Ok(Some(value)),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!(
                "invalid boolean value '{text}', expected true or false"
            ))),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
}

/// The `resolver` section. Every field is optional; unset fields take the
/// engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub expand_utility_types: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub resolve_mapped_types: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub resolve_conditional_types: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub resolve_template_literals: Option<bool>,
    #[serde(default)]
    pub template_expansion_limit: Option<usize>,
}

/// Validate the `resolver` section and lay it over the engine defaults.
pub fn resolve_resolver_options(config: &GeneratorConfig) -> Result<ResolverOptions> {
    let mut options = ResolverOptions::default();
    let Some(section) = config.resolver.as_ref() else {
        return Ok(options);
    };

    if let Some(max_depth) = section.max_depth {
        if max_depth == 0 {
            bail!("resolver.maxDepth must be at least 1");
        }
        options.max_depth = max_depth;
    }
    if let Some(limit) = section.template_expansion_limit {
        if limit == 0 {
            bail!("resolver.templateExpansionLimit must be at least 1");
        }
        options.template_expansion_limit = limit;
    }
    if let Some(enabled) = section.expand_utility_types {
        options.expand_utility_types = enabled;
    }
    if let Some(enabled) = section.resolve_mapped_types {
        options.resolve_mapped_types = enabled;
    }
    if let Some(enabled) = section.resolve_conditional_types {
        options.resolve_conditional_types = enabled;
    }
    if let Some(enabled) = section.resolve_template_literals {
        options.resolve_template_literals = enabled;
    }
    Ok(options)
}

pub fn parse_config(source: &str) -> Result<GeneratorConfig> {
    let normalized = normalize_jsonc(source);
    serde_json::from_str(&normalized).context("failed to parse generator config JSON")
}

/// Read `path`, following `extends` chains.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let mut chain = FxHashSet::default();
    load_config_chain(path, &mut chain)
}

fn load_config_chain(path: &Path, chain: &mut FxHashSet<PathBuf>) -> Result<GeneratorConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !chain.insert(canonical.clone()) {
        bail!("config extends cycle at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = extends_path(path, &extends)?;
        tracing::debug!(base = %base_path.display(), "loading base config");
        let base = load_config_chain(&base_path, chain)?;
        config = merge_configs(base, config);
    }

    chain.remove(&canonical);
    Ok(config)
}

fn extends_path(current: &Path, extends: &str) -> Result<PathBuf> {
    let dir = current
        .parent()
        .ok_or_else(|| anyhow!("config {} has no parent directory", current.display()))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    Ok(if candidate.is_absolute() {
        candidate
    } else {
        dir.join(candidate)
    })
}

fn merge_configs(base: GeneratorConfig, child: GeneratorConfig) -> GeneratorConfig {
    let resolver = match (base.resolver, child.resolver) {
        (Some(base), Some(child)) => Some(ResolverConfig {
            max_depth: child.max_depth.or(base.max_depth),
            expand_utility_types: child.expand_utility_types.or(base.expand_utility_types),
            resolve_mapped_types: child.resolve_mapped_types.or(base.resolve_mapped_types),
            resolve_conditional_types: child
                .resolve_conditional_types
                .or(base.resolve_conditional_types),
            resolve_template_literals: child
                .resolve_template_literals
                .or(base.resolve_template_literals),
            template_expansion_limit: child
                .template_expansion_limit
                .or(base.template_expansion_limit),
        }),
        (base, child) => child.or(base),
    };
    GeneratorConfig {
        extends: None,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        output_dir: child.output_dir.or(base.output_dir),
        resolver,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Text { escaped: bool },
    LineComment,
    BlockComment,
}

/// Strip `//` and `/* */` comments and drop commas that directly precede a
/// closing bracket. String contents are left untouched; newlines inside
/// comments are kept so serde error positions still match the file.
fn normalize_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Code;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            Scan::LineComment => {
                if ch == '\n' {
                    out.push(ch);
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Scan::Code;
                } else if ch == '\n' {
                    out.push(ch);
                }
            }
            Scan::Text { escaped } => {
                out.push(ch);
                state = match ch {
                    _ if escaped => Scan::Text { escaped: false },
                    '\\' => Scan::Text { escaped: true },
                    '"' => Scan::Code,
                    _ => state,
                };
            }
            Scan::Code => match (ch, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    state = Scan::LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = Scan::BlockComment;
                }
                ('"', _) => {
                    out.push(ch);
                    state = Scan::Text { escaped: false };
                }
                _ => out.push(ch),
            },
        }
    }

    drop_trailing_commas(&out)
}

/// Runs on comment-free input.
fn drop_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_text = false;
    let mut escaped = false;
    for (i, ch) in input.char_indices() {
        if in_text {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_text = false;
            }
        } else if ch == '"' {
            in_text = true;
        } else if ch == ',' {
            let next = input[i + 1..].trim_start().chars().next();
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
