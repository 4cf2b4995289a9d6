//! Centralized limits and thresholds for type resolution.
//!
//! Every recursion bound and expansion cap used by the resolver lives here so
//! that defaults are tuned in one place and configuration layers can refer to
//! them by name.
//!
//! # Categories
//!
//! - **Recursion Depths**: bounds on nested `resolve_type` frames
//! - **Capacity Limits**: caps on combinatorial expansion and visited-set size

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Default maximum depth for a single type resolution chain.
///
/// A root resolution starts at depth 0 and each nested type (property,
/// union member, array element, type argument) adds one. Once a frame's depth
/// exceeds this bound the whole chain fails with `MaxDepthExceeded`.
///
/// # TypeScript example
///
/// ```typescript
/// // Structurally deep, but not cyclic, so the visited set cannot cut it:
/// type Deep = { a: { b: { c: { d: { /* ... 30+ levels ... */ } } } } };
///
/// // Recursive generic that produces a fresh canonical text at each level:
/// type Nest<T> = { inner: Nest<T[]> };
/// type Boom = Nest<string>;
/// ```
pub const MAX_RESOLUTION_DEPTH: u32 = 30;

/// Maximum depth when walking a resolved union to extract literal values.
///
/// Template literal placeholders and key sets for selection utilities are
/// flattened through nested unions. Deeper nesting than this aborts the
/// extraction and the caller falls back to a symbolic result.
pub const MAX_LITERAL_EXTRACTION_DEPTH: u32 = 50;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Maximum number of canonical type texts on the active visited path.
///
/// The visited path only holds the ancestry of the current frame, so in
/// practice it is bounded by [`MAX_RESOLUTION_DEPTH`]. This limit protects
/// against a misconfigured depth bound.
pub const MAX_VISITED_ENTRIES: u32 = 10_000;

/// Maximum template literal expansion size.
///
/// Template literal types can produce a combinatorial explosion of string
/// literal types. When the cartesian product of all placeholder value sets
/// exceeds this limit, the resolver keeps a symbolic node carrying the raw
/// template text instead of enumerating every combination.
///
/// # TypeScript example
///
/// ```typescript
/// type Digit = "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9";
/// type Pin = `${Digit}${Digit}${Digit}${Digit}`;
/// // 10 × 10 × 10 × 10 = 10,000 strings, at the limit
///
/// type Code = `${Digit}${Digit}-${Digit}${Digit}${Digit}`;
/// // 100,000 strings → stays symbolic
/// ```
pub const TEMPLATE_LITERAL_EXPANSION_LIMIT: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visited_capacity_covers_depth() {
        assert!(MAX_VISITED_ENTRIES >= MAX_RESOLUTION_DEPTH);
    }

    #[test]
    fn test_expansion_limit_allows_small_products() {
        assert!(TEMPLATE_LITERAL_EXPANSION_LIMIT >= 6);
    }
}
