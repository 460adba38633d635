//! Number formatting and parsing.

/// Formats a floating-point number without trailing fractional zeros.
///
/// Uses the shortest representation that parses back to the same value, so
/// the output is safe to feed back into the tokenizer.
///
/// # Examples
///
/// ```
/// use nc_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    trim_fraction(format!("{v}"))
}

/// Rounds `v` to `precision` fractional digits and formats it without
/// trailing zeros.
///
/// # Examples
///
/// ```
/// use nc_common::format_fixed;
///
/// assert_eq!(format_fixed(10.0, 3), "10");
/// assert_eq!(format_fixed(1.23456, 3), "1.235");
/// assert_eq!(format_fixed(-0.0001, 3), "0");
/// ```
pub fn format_fixed(v: f64, precision: usize) -> String {
    trim_fraction(format!("{v:.precision$}"))
}

/// Rounds `v` to `precision` fractional digits.
pub fn round_to(v: f64, precision: usize) -> f64 {
    let exponent = i32::try_from(precision).unwrap_or(i32::MAX);
    let factor = 10f64.powi(exponent);
    if !factor.is_finite() {
        return v;
    }
    (v * factor).round() / factor
}

fn trim_fraction(s: String) -> String {
    let trimmed = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match trimmed {
        "" | "-0" | "-" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(-2.25), "-2.25");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(10.0, 3), "10");
        assert_eq!(format_fixed(0.1 + 0.2, 3), "0.3");
        assert_eq!(format_fixed(1.23456, 3), "1.235");
        assert_eq!(format_fixed(-1.6, 0), "-2");
        assert_eq!(format_fixed(-0.0004, 3), "0");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(10.0, 3), 10.0);
        assert_eq!(round_to(0.1 + 0.2, 3), 0.3);
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.25"), Some(3.25));
        assert_eq!(parse_f64("  -3.25  "), Some(-3.25));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("4.2"), None);
    }
}
