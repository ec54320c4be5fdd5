//! Expected (client, assessment, question) universe from the daily activity export.

use rtx_model::schema::daily_activity;
use rtx_model::{
    PipelineConfig, QuestionTreatmentInstanceCode, Table, TreatmentInstanceCode, parse_i64,
};
use tracing::info;

use crate::datetime::{ParsedInstant, parse_datetime};
use crate::error::Result;
use crate::mapping::DictionaryMappings;
use crate::report::FallbackTally;

/// One expected question of one assessment event.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonRow {
    pub patient_id: String,
    /// Treatment date text as exported.
    pub treatment_date: String,
    pub treatment_code: i64,
    pub survey_name: String,
    pub question_code: String,
    pub treatment_instant: ParsedInstant,
    pub instance_code: TreatmentInstanceCode,
    pub question_instance_code: QuestionTreatmentInstanceCode,
}

#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub rows: Vec<SkeletonRow>,
    /// Activity rows dropped for an unparseable or unaccepted treatment code.
    pub dropped_activity_rows: usize,
    pub date_fallbacks: FallbackTally,
}

/// Expand every accepted daily-activity row into one row per registered question.
///
/// # Errors
///
/// Fails when the export lacks `PatientID`, `TreatmentCode` or `TreatmentDT`.
pub fn build_skeleton(
    daily_activity: &Table,
    mappings: &DictionaryMappings,
    config: &PipelineConfig,
) -> Result<Skeleton> {
    let patient_col = daily_activity.column(daily_activity::PATIENT_ID)?;
    let code_col = daily_activity.column(daily_activity::TREATMENT_CODE)?;
    let date_col = daily_activity.column(daily_activity::TREATMENT_DT)?;

    let mut skeleton = Skeleton::default();
    for row in &daily_activity.rows {
        let Some(treatment_code) = parse_i64(&row[code_col]) else {
            skeleton.dropped_activity_rows += 1;
            continue;
        };
        if !config.accepts_treatment_code(treatment_code) {
            skeleton.dropped_activity_rows += 1;
            continue;
        }
        let patient_id = &row[patient_col];
        let treatment_date = &row[date_col];
        let parsed = parse_datetime(treatment_date);
        skeleton.date_fallbacks.observe(parsed, treatment_date);
        let instance_code = TreatmentInstanceCode::derive(patient_id, parsed.instant());

        let code_text = treatment_code.to_string();
        for triple in mappings.questions_for(&code_text) {
            skeleton.rows.push(SkeletonRow {
                patient_id: patient_id.clone(),
                treatment_date: treatment_date.clone(),
                treatment_code,
                survey_name: triple.survey_name.clone(),
                question_code: triple.question_code.clone(),
                treatment_instant: parsed,
                question_instance_code: instance_code.question(&triple.question_code),
                instance_code: instance_code.clone(),
            });
        }
    }
    info!(
        activity_rows = daily_activity.height(),
        dropped_activity_rows = skeleton.dropped_activity_rows,
        skeleton_rows = skeleton.rows.len(),
        "built skeleton"
    );
    Ok(skeleton)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::with_columns(name, headers);
        for row in rows {
            table.push_row(row.iter().map(|c| (*c).to_string()).collect());
        }
        table
    }

    fn mappings() -> DictionaryMappings {
        let dictionary = table(
            "dictionary",
            &[
                "TreatmentCode",
                "Document",
                "QuestionCode",
                "RawValue",
                "CleanedValue",
            ],
            &[
                &["9000", "Self Sufficiency", "emo-mgmt", "", ""],
                &["9000", "Self Sufficiency", "budget", "", ""],
                &["1000", "Intake", "housing", "", ""],
                &["2000", "Exit", "housing", "", ""],
            ],
        );
        DictionaryMappings::from_table(&dictionary).unwrap()
    }

    fn activity(rows: &[&[&str]]) -> Table {
        table(
            "daily_activity",
            &["PatientID", "TreatmentCode", "TreatmentDT"],
            rows,
        )
    }

    #[test]
    fn one_row_per_registered_question() {
        let daily = activity(&[&["C1", "9000", "6/1/2024 2:30:00 PM"]]);
        let skeleton = build_skeleton(&daily, &mappings(), &PipelineConfig::default()).unwrap();
        let questions: Vec<&str> = skeleton
            .rows
            .iter()
            .map(|row| row.question_code.as_str())
            .collect();
        assert_eq!(questions, vec!["emo-mgmt", "budget"]);
        assert_eq!(skeleton.rows[0].instance_code.as_str(), "C1-6-1-2024-14-30");
        assert_eq!(
            skeleton.rows[1].question_instance_code.as_str(),
            "C1-6-1-2024-14-30-budget"
        );
        assert_eq!(skeleton.rows[0].treatment_date, "6/1/2024 2:30:00 PM");
        assert_eq!(skeleton.date_fallbacks.count, 0);
    }

    #[test]
    fn unaccepted_codes_produce_no_rows() {
        let daily = activity(&[
            &["C1", "2000", "2024-06-01"],
            &["C1", "", "2024-06-01"],
            &["C1", "nine", "2024-06-01"],
            &["C2", " 1000 ", "2024-06-01"],
        ]);
        let skeleton = build_skeleton(&daily, &mappings(), &PipelineConfig::default()).unwrap();
        assert_eq!(skeleton.rows.len(), 1);
        assert_eq!(skeleton.rows[0].patient_id, "C2");
        assert_eq!(skeleton.rows[0].treatment_code, 1000);
        assert_eq!(skeleton.dropped_activity_rows, 3);
    }

    #[test]
    fn unparseable_dates_are_counted() {
        let daily = activity(&[&["C1", "9000", "not a date"]]);
        let skeleton = build_skeleton(&daily, &mappings(), &PipelineConfig::default()).unwrap();
        assert_eq!(skeleton.rows.len(), 2);
        assert_eq!(skeleton.date_fallbacks.count, 1);
        assert!(skeleton.rows[0].treatment_instant.is_fallback());
    }

    #[test]
    fn missing_activity_column_is_fatal() {
        let daily = table("daily_activity", &["PatientID", "TreatmentCode"], &[]);
        let err = build_skeleton(&daily, &mappings(), &PipelineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("TreatmentDT"));
    }
}
