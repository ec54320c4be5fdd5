//! Per-run counts reported alongside the produced frames.

use serde::Serialize;

use crate::datetime::ParsedInstant;

const MAX_FALLBACK_SAMPLES: usize = 5;

/// Date fallbacks observed by one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackTally {
    pub count: usize,
    /// First few offending texts, for the run summary.
    pub samples: Vec<String>,
}

impl FallbackTally {
    /// Count `parsed` if it is a fallback, remembering the raw text.
    pub fn observe(&mut self, parsed: ParsedInstant, raw: &str) {
        if !parsed.is_fallback() {
            return;
        }
        self.count += 1;
        if self.samples.len() < MAX_FALLBACK_SAMPLES && !self.samples.iter().any(|s| s == raw) {
            self.samples.push(raw.to_string());
        }
    }
}

/// Date fallbacks of one stage, labelled for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFallbacks {
    pub stage: &'static str,
    #[serde(flatten)]
    pub tally: FallbackTally,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub survey_mappings: usize,
    pub value_mappings: usize,
    pub question_triples: usize,
    pub skeleton_rows: usize,
    pub dropped_activity_rows: usize,
    pub response_rows: usize,
    pub unknown_survey_rows: usize,
    pub answered_rows: usize,
    pub imputed_rows: usize,
    pub never_seen_rows: usize,
    pub long_rows: usize,
    pub client_date_rows: usize,
    pub yoy_rows: usize,
    pub wide_rows: usize,
    pub date_fallbacks: Vec<StageFallbacks>,
}

impl PipelineReport {
    pub fn total_date_fallbacks(&self) -> usize {
        self.date_fallbacks.iter().map(|stage| stage.tally.count).sum()
    }

    pub(crate) fn record_fallbacks(&mut self, stage: &'static str, tally: FallbackTally) {
        self.date_fallbacks.push(StageFallbacks { stage, tally });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn tally_counts_only_fallbacks_and_dedupes_samples() {
        let instant = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut tally = FallbackTally::default();
        tally.observe(ParsedInstant::Parsed(instant), "2024-01-01");
        tally.observe(ParsedInstant::Fallback(instant), "bad");
        tally.observe(ParsedInstant::Fallback(instant), "bad");
        assert_eq!(tally.count, 2);
        assert_eq!(tally.samples, vec!["bad".to_string()]);
    }
}
