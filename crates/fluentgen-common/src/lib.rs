//! Common types and utilities shared by the fluentgen crates.
//!
//! This crate provides:
//! - Centralized limits and thresholds for type resolution
//! - JS-compatible number formatting used when literal values become text

// Centralized limits and thresholds
pub mod limits;

// Number text helpers
pub mod numbers;
pub use numbers::js_number_to_string;
