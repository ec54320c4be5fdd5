//! Numeric parsing and rendering helpers for text cells.

/// Formats a floating-point number without trailing zeros (`3.0` renders as `3`).
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        // -0.0 renders as "-0"
        return "0".to_string();
    }
    format!("{v}")
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_numeric_drops_trailing_zeros() {
        assert_eq!(format_numeric(3.0), "3");
        assert_eq!(format_numeric(3.5), "3.5");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(-2.0), "-2");
        assert_eq!(format_numeric(-0.0), "0");
    }

    #[test]
    fn parse_helpers_reject_blank() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64(" 2.5 "), Some(2.5));
        assert_eq!(parse_i64("9000"), Some(9000));
        assert_eq!(parse_i64("9000.0"), None);
        assert_eq!(parse_i64("abc"), None);
    }
}
