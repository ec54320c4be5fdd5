//! Pipeline configuration: accepted surveys, program years, rollups and the
//! wide pivot layout.
//!
//! [`PipelineConfig::default`] carries the production settings; a TOML file
//! may override any section.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Self-sufficiency survey tracked by the wide pivot and category rollups.
pub const SELF_SUFFICIENCY_SURVEY_CODE: &str = "9000";

const SELF_SUFFICIENCY_QUESTIONS: [&str; 23] = [
    "emo-mgmt",
    "mental-health",
    "self-comp",
    "budget",
    "financial-struct",
    "goals",
    "hlth-ins-access",
    "house-upkeep",
    "time-mgmt",
    "transport",
    "understanding-serv",
    "food",
    "rent-ready",
    "legal",
    "safety",
    "phys-health",
    "sub-use",
    "support-sys",
    "career-res",
    "education",
    "emp-stablility",
    "future-hopes",
    "income-met",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Daily-activity treatment codes that produce skeleton rows.
    pub accepted_treatment_codes: Vec<i64>,
    /// Program years in chronological order.
    pub program_years: Vec<ProgramYear>,
    /// Custom rollup categories keyed by treatment code.
    pub aggregations: BTreeMap<String, Vec<AggregationCategory>>,
    pub wide_pivot: WidePivotConfig,
}

/// A fiscal-style reporting window, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramYear {
    pub label: String,
    pub start: NaiveDate,
    /// Last day of the window; the whole day is included.
    pub end: NaiveDate,
    /// Label of the preceding year used as fallback for a starting assessment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationCategory {
    pub name: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidePivotConfig {
    pub treatment_code: String,
    pub question_codes: Vec<String>,
}

impl ProgramYear {
    pub fn new(label: &str, start: NaiveDate, end: NaiveDate, previous: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            start,
            end,
            previous: previous.map(str::to_string),
        }
    }

    pub fn window_start(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn window_end(&self) -> NaiveDateTime {
        // 23:59:59 is always a valid time of day
        self.end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN))
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.window_start() <= instant && instant <= self.window_end()
    }
}

impl AggregationCategory {
    pub fn new(name: &str, questions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            questions: questions.iter().map(|q| (*q).to_string()).collect(),
        }
    }
}

impl Default for WidePivotConfig {
    fn default() -> Self {
        Self {
            treatment_code: SELF_SUFFICIENCY_SURVEY_CODE.to_string(),
            question_codes: SELF_SUFFICIENCY_QUESTIONS
                .iter()
                .map(|q| (*q).to_string())
                .collect(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            accepted_treatment_codes: vec![9000, 1000, 1001],
            program_years: default_program_years(),
            aggregations: BTreeMap::from([(
                SELF_SUFFICIENCY_SURVEY_CODE.to_string(),
                default_self_sufficiency_categories(),
            )]),
            wide_pivot: WidePivotConfig::default(),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn default_program_years() -> Vec<ProgramYear> {
    vec![
        ProgramYear::new("2024", ymd(2022, 1, 1), ymd(2024, 9, 30), None),
        ProgramYear::new("2025", ymd(2024, 10, 1), ymd(2025, 9, 30), Some("2024")),
        ProgramYear::new("2026", ymd(2025, 10, 1), ymd(2026, 9, 30), Some("2025")),
    ]
}

fn default_self_sufficiency_categories() -> Vec<AggregationCategory> {
    vec![
        AggregationCategory::new(
            "Emotional & Mental Health",
            &["emo-mgmt", "mental-health", "self-comp"],
        ),
        AggregationCategory::new(
            "Life Skills",
            &[
                "budget",
                "financial-struct",
                "goals",
                "hlth-ins-access",
                "house-upkeep",
                "time-mgmt",
                "transport",
                "understanding-serv",
            ],
        ),
        AggregationCategory::new("Safety & Stability", &["food", "rent-ready", "legal", "safety"]),
        AggregationCategory::new("Self Care", &["phys-health", "sub-use", "support-sys"]),
        AggregationCategory::new(
            "Sustainable Work",
            &[
                "career-res",
                "education",
                "emp-stablility",
                "future-hopes",
                "income-met",
            ],
        ),
        AggregationCategory::new(
            "Safety & Stability + Self-Care + Sustainable Work",
            &[
                "food",
                "rent-ready",
                "legal",
                "safety",
                "phys-health",
                "sub-use",
                "support-sys",
                "career-res",
                "education",
                "emp-stablility",
                "future-hopes",
                "income-met",
            ],
        ),
    ]
}

impl PipelineConfig {
    pub fn accepts_treatment_code(&self, code: i64) -> bool {
        self.accepted_treatment_codes.contains(&code)
    }

    pub fn program_year(&self, label: &str) -> Option<&ProgramYear> {
        self.program_years.iter().find(|year| year.label == label)
    }

    pub fn categories_for(&self, treatment_code: &str) -> &[AggregationCategory] {
        self.aggregations
            .get(treatment_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check the configuration for inconsistencies before running.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.accepted_treatment_codes.is_empty() {
            return Err(invalid("accepted_treatment_codes is empty"));
        }
        let mut seen = BTreeSet::new();
        for year in &self.program_years {
            if year.label.trim().is_empty() {
                return Err(invalid("program year label is blank"));
            }
            if year.start > year.end {
                return Err(invalid(format!(
                    "program year {} starts after it ends",
                    year.label
                )));
            }
            if let Some(previous) = &year.previous
                && !seen.contains(previous.as_str())
            {
                return Err(invalid(format!(
                    "program year {} refers to unknown or later predecessor {previous}",
                    year.label
                )));
            }
            if !seen.insert(year.label.as_str()) {
                return Err(invalid(format!("duplicate program year {}", year.label)));
            }
        }
        let mut windows: Vec<&ProgramYear> = self.program_years.iter().collect();
        windows.sort_by_key(|year| year.start);
        for pair in windows.windows(2) {
            if pair[0].end >= pair[1].start {
                return Err(invalid(format!(
                    "program years {} and {} overlap",
                    pair[0].label, pair[1].label
                )));
            }
        }
        for (code, categories) in &self.aggregations {
            let mut names = BTreeSet::new();
            for category in categories {
                if !names.insert(category.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate category {} for treatment code {code}",
                        category.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert!(config.accepts_treatment_code(9000));
        assert!(config.accepts_treatment_code(1001));
        assert!(!config.accepts_treatment_code(2000));
        assert_eq!(config.categories_for("9000").len(), 6);
        assert!(config.categories_for("1000").is_empty());
        assert_eq!(config.wide_pivot.question_codes.len(), 23);
    }

    #[test]
    fn program_year_window_is_inclusive() {
        let config = PipelineConfig::default();
        let year = config.program_year("2024").unwrap();
        let last_second = ymd(2024, 9, 30).and_hms_opt(23, 59, 59).unwrap();
        let next_day = ymd(2024, 10, 1).and_time(NaiveTime::MIN);
        assert!(year.contains(ymd(2022, 1, 1).and_time(NaiveTime::MIN)));
        assert!(year.contains(last_second));
        assert!(!year.contains(next_day));
        assert!(config.program_year("2025").unwrap().contains(next_day));
    }

    #[test]
    fn overlapping_years_are_rejected() {
        let mut config = PipelineConfig::default();
        config.program_years[1].start = ymd(2024, 9, 1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut config = PipelineConfig::default();
        config.program_years[0].end = ymd(2021, 12, 31);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("starts after it ends"));
    }

    #[test]
    fn duplicate_year_label_is_rejected() {
        let mut config = PipelineConfig::default();
        config.program_years[2].label = "2024".to_string();
        config.program_years[2].previous = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate program year 2024"));
    }

    #[test]
    fn empty_accepted_codes_are_rejected() {
        let config = PipelineConfig {
            accepted_treatment_codes: Vec::new(),
            ..PipelineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("accepted_treatment_codes is empty"));
    }

    #[test]
    fn unknown_predecessor_is_rejected() {
        let mut config = PipelineConfig::default();
        config.program_years[2].previous = Some("2023".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown or later predecessor 2023"));
    }

    #[test]
    fn later_predecessor_is_rejected() {
        let mut config = PipelineConfig::default();
        config.program_years[1].previous = Some("2026".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown or later predecessor 2026"));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut config = PipelineConfig::default();
        let first = config.aggregations["9000"][0].clone();
        config
            .aggregations
            .get_mut("9000")
            .unwrap()
            .push(first);
        assert!(config.validate().is_err());
    }
}
