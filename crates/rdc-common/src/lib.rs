//! Shared utilities for the retail data centralisation workspace.
//!
//! This crate provides common helpers used across the workspace,
//! including Polars `AnyValue` conversions and small text and parsing helpers.

pub mod polars;
pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use polars::{any_to_string, format_numeric};
pub use text::{digits_only, parse_f64, parse_i64, remove_all};
