#![deny(unsafe_code)]

//! Composite identifiers for assessment events and answered questions.
//!
//! A [`TreatmentInstanceCode`] is `{ClientID}-{M-D-YYYY-HH-mm}`; the matching
//! [`QuestionTreatmentInstanceCode`] appends `-{QuestionCode}`. Both compare
//! and hash on the formatted text, so two events for one client within the
//! same minute are the same instance.

use std::fmt;

use chrono::NaiveDateTime;

/// Minute-granularity timestamp format without leading zeros on month/day.
const INSTANCE_TIMESTAMP_FORMAT: &str = "%-m-%-d-%Y-%H-%M";

/// Formats an instant the way it appears inside instance codes.
pub fn format_instance_timestamp(instant: NaiveDateTime) -> String {
    instant.format(INSTANCE_TIMESTAMP_FORMAT).to_string()
}

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TreatmentInstanceCode(String);

impl TreatmentInstanceCode {
    pub fn derive(client_id: &str, instant: NaiveDateTime) -> Self {
        Self(format!("{client_id}-{}", format_instance_timestamp(instant)))
    }

    /// Wraps a code read back from a previously produced frame.
    pub fn from_formatted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn question(&self, question_code: &str) -> QuestionTreatmentInstanceCode {
        QuestionTreatmentInstanceCode(format!("{}-{question_code}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TreatmentInstanceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct QuestionTreatmentInstanceCode(String);

impl QuestionTreatmentInstanceCode {
    pub fn derive(client_id: &str, instant: NaiveDateTime, question_code: &str) -> Self {
        TreatmentInstanceCode::derive(client_id, instant).question(question_code)
    }

    pub fn from_formatted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionTreatmentInstanceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
