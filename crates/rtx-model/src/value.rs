//! Cleaned response values and imputation flags.

use std::fmt;

use crate::numeric::{format_numeric, parse_f64};

/// A response value after dictionary cleaning.
///
/// Mapped values become numbers when their text parses; everything else
/// (including unmapped raw values) stays text. The empty text is the blank
/// value used for unanswered questions.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CleanedValue {
    pub fn blank() -> Self {
        Self::Text(String::new())
    }

    /// Coerces dictionary text: float when it contains a decimal point,
    /// otherwise integer, otherwise the text itself.
    pub fn from_cleaned_text(text: &str) -> Self {
        let trimmed = text.trim();
        if text.contains('.') {
            if let Ok(value) = trimmed.parse::<f64>() {
                return Self::Float(value);
            }
        } else if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }
        Self::Text(text.to_string())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// Numeric reading used by rollups and movement.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => parse_f64(text),
        }
    }
}

impl Default for CleanedValue {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Display for CleanedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_numeric(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Whether a long-frame value was carried forward from an earlier assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Imputation {
    /// Value was missing and filled from the latest prior answer.
    Yes,
    /// Value was answered in this assessment.
    No,
    /// Value is missing and no prior answer exists.
    NeverSeen,
}

impl Imputation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::NeverSeen => "",
        }
    }

    /// Reads a persisted flag; anything other than yes/no is treated as never seen.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ => Self::NeverSeen,
        }
    }
}

impl fmt::Display for Imputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a yes/true/y style cell as a boolean.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_text_coercion() {
        assert_eq!(CleanedValue::from_cleaned_text("3"), CleanedValue::Int(3));
        assert_eq!(CleanedValue::from_cleaned_text("0"), CleanedValue::Int(0));
        assert_eq!(
            CleanedValue::from_cleaned_text("2.5"),
            CleanedValue::Float(2.5)
        );
        assert_eq!(
            CleanedValue::from_cleaned_text("Stable"),
            CleanedValue::Text("Stable".to_string())
        );
        assert_eq!(
            CleanedValue::from_cleaned_text("1.2.3"),
            CleanedValue::Text("1.2.3".to_string())
        );
    }

    #[test]
    fn display_renders_numbers_plainly() {
        assert_eq!(CleanedValue::Int(4).to_string(), "4");
        assert_eq!(CleanedValue::Float(4.0).to_string(), "4");
        assert_eq!(CleanedValue::Float(4.25).to_string(), "4.25");
        assert_eq!(CleanedValue::blank().to_string(), "");
    }

    #[test]
    fn numeric_reading_of_text() {
        assert_eq!(CleanedValue::Text("3".into()).as_f64(), Some(3.0));
        assert_eq!(CleanedValue::Text("n/a".into()).as_f64(), None);
        assert_eq!(CleanedValue::blank().as_f64(), None);
        assert!(CleanedValue::blank().is_blank());
        assert!(!CleanedValue::Int(0).is_blank());
    }

    #[test]
    fn imputation_flags_render() {
        assert_eq!(Imputation::Yes.as_str(), "Yes");
        assert_eq!(Imputation::No.as_str(), "No");
        assert_eq!(Imputation::NeverSeen.as_str(), "");
        assert_eq!(Imputation::parse("yes"), Imputation::Yes);
        assert_eq!(Imputation::parse(""), Imputation::NeverSeen);
    }

    #[test]
    fn flags_accept_yes_like_text() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag(" y "));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("No"));
    }
}
