//! Engine options.
//!
//! The engine consumes these values; loading them from a config file is the
//! caller's concern.

use fluentgen_common::limits::{MAX_RESOLUTION_DEPTH, TEMPLATE_LITERAL_EXPANSION_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Frames deeper than this fail with `MaxDepthExceeded`.
    pub max_depth: u32,
    /// Pick/Omit/Partial/Required/Readonly/Record/Exclude/Extract/NonNullable.
    pub expand_utility_types: bool,
    pub resolve_mapped_types: bool,
    pub resolve_conditional_types: bool,
    pub resolve_template_literals: bool,
    /// Ceiling on the number of template literal combinations.
    pub template_expansion_limit: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_RESOLUTION_DEPTH,
            expand_utility_types: true,
            resolve_mapped_types: true,
            resolve_conditional_types: true,
            resolve_template_literals: true,
            template_expansion_limit: TEMPLATE_LITERAL_EXPANSION_LIMIT,
        }
    }
}

impl ResolverOptions {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// All expander stages off: only category resolvers run.
    pub fn categories_only() -> Self {
        Self {
            expand_utility_types: false,
            resolve_mapped_types: false,
            resolve_conditional_types: false,
            resolve_template_literals: false,
            ..Self::default()
        }
    }
}
