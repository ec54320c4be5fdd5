//! Tests for configuration overrides.

use chrono::NaiveDate;
use rtx_model::{PipelineConfig, ProgramYear};

#[test]
fn partial_toml_keeps_defaults_for_missing_sections() {
    let text = r#"
accepted_treatment_codes = [9000]

[wide_pivot]
treatment_code = "1000"
question_codes = ["q1", "q2"]
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();
    assert_eq!(config.accepted_treatment_codes, vec![9000]);
    assert_eq!(config.wide_pivot.treatment_code, "1000");
    assert_eq!(config.wide_pivot.question_codes, vec!["q1", "q2"]);
    assert_eq!(config.program_years, PipelineConfig::default().program_years);
    assert_eq!(config.categories_for("9000").len(), 6);
    config.validate().unwrap();
}

#[test]
fn program_years_can_be_replaced_per_tenant() {
    let text = r#"
[[program_years]]
label = "FY1"
start = "2023-07-01"
end = "2024-06-30"

[[program_years]]
label = "FY2"
start = "2024-07-01"
end = "2025-06-30"
previous = "FY1"

[[aggregations.1000]]
name = "Core"
questions = ["a", "b"]
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();
    config.validate().unwrap();
    assert_eq!(
        config.program_years[1],
        ProgramYear::new(
            "FY2",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            Some("FY1"),
        )
    );
    assert_eq!(config.categories_for("1000")[0].questions, vec!["a", "b"]);
    // Replacing the map drops the default 9000 categories.
    assert!(config.categories_for("9000").is_empty());
}

#[test]
fn default_config_serializes_to_loadable_toml() {
    let text = toml::to_string_pretty(&PipelineConfig::default()).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, PipelineConfig::default());
}
