//! Left join of observed responses onto the expected skeleton.

use std::collections::HashMap;

use rtx_model::{CleanedValue, QuestionTreatmentInstanceCode};
use tracing::info;

use crate::responses::ResponseRow;
use crate::skeleton::SkeletonRow;

/// A skeleton row with the cleaned value observed for it, blank when unanswered.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub skeleton: SkeletonRow,
    pub value: CleanedValue,
}

/// Question instance code to cleaned value.
///
/// Unlike the dictionary maps, the first response seen for a key is kept and
/// later duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct ResponseLookup {
    values: HashMap<QuestionTreatmentInstanceCode, CleanedValue>,
}

impl ResponseLookup {
    pub fn from_responses(rows: &[ResponseRow]) -> Self {
        let mut values = HashMap::with_capacity(rows.len());
        for row in rows {
            values
                .entry(row.question_instance_code.clone())
                .or_insert_with(|| row.cleaned_value.clone());
        }
        Self { values }
    }

    pub fn get(&self, key: &QuestionTreatmentInstanceCode) -> Option<&CleanedValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Attach the observed value to every skeleton row by exact key equality.
pub fn join_responses(skeleton: Vec<SkeletonRow>, responses: &[ResponseRow]) -> Vec<JoinedRow> {
    let lookup = ResponseLookup::from_responses(responses);
    let joined: Vec<JoinedRow> = skeleton
        .into_iter()
        .map(|row| {
            let value = lookup
                .get(&row.question_instance_code)
                .cloned()
                .unwrap_or_default();
            JoinedRow {
                skeleton: row,
                value,
            }
        })
        .collect();
    let answered = joined.iter().filter(|row| !row.value.is_blank()).count();
    info!(
        lookup_keys = lookup.len(),
        joined_rows = joined.len(),
        answered_rows = answered,
        "joined responses onto skeleton"
    );
    joined
}
