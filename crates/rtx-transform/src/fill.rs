//! Forward-filling of unanswered questions from earlier assessments.

use std::collections::HashMap;

use rtx_model::{CleanedValue, Imputation};
use tracing::info;

use crate::join::JoinedRow;
use crate::skeleton::SkeletonRow;

#[derive(Debug, Clone, PartialEq)]
pub struct FilledRow {
    pub skeleton: SkeletonRow,
    pub value: CleanedValue,
    pub imputation: Imputation,
}

/// Sort by client, question and assessment instant, then carry the latest
/// answered value into each unanswered row of the same client and question.
///
/// Rows before the first answer of their series stay blank with
/// [`Imputation::NeverSeen`].
pub fn forward_fill(mut rows: Vec<JoinedRow>) -> Vec<FilledRow> {
    rows.sort_by(|a, b| {
        a.skeleton
            .patient_id
            .cmp(&b.skeleton.patient_id)
            .then_with(|| a.skeleton.question_code.cmp(&b.skeleton.question_code))
            .then_with(|| {
                a.skeleton
                    .treatment_instant
                    .instant()
                    .cmp(&b.skeleton.treatment_instant.instant())
            })
    });

    let mut last_known: HashMap<(String, String), CleanedValue> = HashMap::new();
    let mut filled = Vec::with_capacity(rows.len());
    for JoinedRow { skeleton, value } in rows {
        let key = (skeleton.patient_id.clone(), skeleton.question_code.clone());
        let (value, imputation) = if value.is_blank() {
            match last_known.get(&key) {
                Some(previous) => (previous.clone(), Imputation::Yes),
                None => (value, Imputation::NeverSeen),
            }
        } else {
            last_known.insert(key, value.clone());
            (value, Imputation::No)
        };
        filled.push(FilledRow {
            skeleton,
            value,
            imputation,
        });
    }

    let imputed = filled
        .iter()
        .filter(|row| row.imputation == Imputation::Yes)
        .count();
    info!(
        rows = filled.len(),
        imputed_rows = imputed,
        "forward-filled values"
    );
    filled
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rtx_model::TreatmentInstanceCode;

    use super::*;
    use crate::datetime::ParsedInstant;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn joined(patient: &str, question: &str, d: u32, value: CleanedValue) -> JoinedRow {
        let instance_code = TreatmentInstanceCode::derive(patient, day(d));
        JoinedRow {
            skeleton: SkeletonRow {
                patient_id: patient.to_string(),
                treatment_date: format!("2024-06-{d:02} 09:00:00"),
                treatment_code: 9000,
                survey_name: "Self Sufficiency".to_string(),
                question_code: question.to_string(),
                treatment_instant: ParsedInstant::Parsed(day(d)),
                question_instance_code: instance_code.question(question),
                instance_code,
            },
            value,
        }
    }

    #[test]
    fn carries_latest_answer_forward() {
        let rows = vec![
            joined("C1", "q", 20, CleanedValue::blank()),
            joined("C1", "q", 3, CleanedValue::blank()),
            joined("C1", "q", 10, CleanedValue::Int(4)),
            joined("C1", "q", 15, CleanedValue::Int(2)),
        ];
        let filled = forward_fill(rows);
        let summary: Vec<(String, &str)> = filled
            .iter()
            .map(|row| (row.value.to_string(), row.imputation.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (String::new(), ""),
                ("4".to_string(), "No"),
                ("2".to_string(), "No"),
                ("2".to_string(), "Yes"),
            ]
        );
    }

    #[test]
    fn series_are_independent_per_client_and_question() {
        let rows = vec![
            joined("C1", "a", 1, CleanedValue::Int(1)),
            joined("C1", "b", 2, CleanedValue::blank()),
            joined("C2", "a", 2, CleanedValue::blank()),
        ];
        let filled = forward_fill(rows);
        assert!(
            filled
                .iter()
                .skip(1)
                .all(|row| row.imputation == Imputation::NeverSeen)
        );
    }

    #[test]
    fn zero_is_an_answer() {
        let rows = vec![
            joined("C1", "q", 1, CleanedValue::Int(0)),
            joined("C1", "q", 2, CleanedValue::blank()),
        ];
        let filled = forward_fill(rows);
        assert_eq!(filled[1].value, CleanedValue::Int(0));
        assert_eq!(filled[1].imputation, Imputation::Yes);
    }
}
