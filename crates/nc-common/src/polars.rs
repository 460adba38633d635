//! Polars `AnyValue` utility functions.
//!
//! The reverse serializer reads table cells through these helpers so that a
//! table built elsewhere (other integer widths, `Float32`, numeric strings)
//! is handled the same way as one produced by the forward conversion.

use polars::prelude::AnyValue;

use crate::numeric::{format_numeric, parse_f64, parse_i64};

/// Renders a cell as text.
///
/// `Null` becomes an empty string and floats lose their trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use nc_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
/// assert_eq!(any_to_string(AnyValue::String("G01")), "G01");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_owned(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Reads a cell as `f64`.
///
/// Numeric strings are parsed; other non-numeric values yield `None`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null | AnyValue::Boolean(_) => None,
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        other => other.extract::<f64>(),
    }
}

/// Reads a cell as `i64`.
///
/// Floats qualify only when they carry no fraction, so `10.0` reads as `10`
/// and `10.5` as `None`.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null | AnyValue::Boolean(_) => None,
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        AnyValue::Float32(v) => whole(f64::from(v)),
        AnyValue::Float64(v) => whole(v),
        other => other.extract::<i64>(),
    }
}

fn whole(v: f64) -> Option<i64> {
    (v.fract() == 0.0 && v.abs() < 9.0e18).then_some(v as i64)
}

/// Converts a list `AnyValue` to its non-null elements rendered as strings.
///
/// Returns `None` for `Null` and for values that are not lists.
pub fn any_to_string_list(value: AnyValue<'_>) -> Option<Vec<String>> {
    match value {
        AnyValue::List(series) => Some(
            series
                .iter()
                .filter(|item| !matches!(item, AnyValue::Null))
                .map(any_to_string)
                .collect(),
        ),
        _ => None,
    }
}
