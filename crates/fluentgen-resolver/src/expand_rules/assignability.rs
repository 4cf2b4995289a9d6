//! Approximate assignability over resolved types.
//!
//! Used by Exclude/Extract/NonNullable and by conditional branch selection.
//! A source is assignable to a target when:
//!
//! - both render to the same canonical text
//! - the target is `any`
//! - the source is `never`
//! - the target is a union containing an assignable member (recursively)
//! - the source is a union and every member is assignable
//!
//! This does not attempt structural subtyping: `{ a: string; b: number }`
//! is not assignable to `{ a: string }` here.

use crate::types::TypeInfo;

pub fn is_assignable_approx(source: &TypeInfo, target: &TypeInfo) -> bool {
    if target.is_any() || matches!(source, TypeInfo::Never) {
        return true;
    }
    if let TypeInfo::Union { members } = source {
        return members
            .iter()
            .all(|member| is_assignable_approx(member, target));
    }
    if source.to_string() == target.to_string() {
        return true;
    }
    match target {
        TypeInfo::Union { members } => members
            .iter()
            .any(|member| is_assignable_approx(source, member)),
        _ => false,
    }
}
