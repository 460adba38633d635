//! Shared utilities for the nc-gcode crates.
//!
//! This crate provides the numeric formatting rules shared by the forward and
//! reverse conversions, plus Polars `AnyValue` helpers.

pub mod numeric;
pub mod polars;

pub use numeric::{format_fixed, format_numeric, parse_f64, parse_i64, round_to};
pub use polars::{any_to_f64, any_to_i64, any_to_string, any_to_string_list};
