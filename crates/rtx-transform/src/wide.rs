//! One row per client assessment with a column per tracked question.

use std::collections::HashMap;

use rtx_model::schema::WIDE_LEADING_COLUMNS;
use rtx_model::{CleanedValue, Table, WidePivotConfig};
use tracing::info;

use crate::stage::LongFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub treatment_date: String,
    /// Question code to value; later long rows overwrite earlier ones.
    pub values: HashMap<String, CleanedValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideFrame {
    pub question_codes: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideFrame {
    pub const TABLE_NAME: &'static str = "wide_frame";

    /// Pivot the long rows of the configured treatment code.
    ///
    /// Rows are grouped by client and assessment date text and sorted by
    /// that text, so dates order lexicographically rather than chronologically.
    pub fn build(long: &LongFrame, config: &WidePivotConfig) -> Self {
        let mut rows: Vec<WideRow> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();
        for row in long
            .rows
            .iter()
            .filter(|row| row.treatment_code == config.treatment_code)
        {
            let i = *index
                .entry((row.patient_id.as_str(), row.treatment_date.as_str()))
                .or_insert_with(|| {
                    rows.push(WideRow {
                        patient_id: row.patient_id.clone(),
                        first_name: row.first_name.clone(),
                        last_name: row.last_name.clone(),
                        treatment_date: row.treatment_date.clone(),
                        values: HashMap::new(),
                    });
                    rows.len() - 1
                });
            rows[i]
                .values
                .insert(row.question_code.clone(), row.value.clone());
        }
        rows.sort_by(|a, b| {
            a.patient_id
                .cmp(&b.patient_id)
                .then_with(|| a.treatment_date.cmp(&b.treatment_date))
        });
        info!(
            treatment_code = %config.treatment_code,
            wide_rows = rows.len(),
            "built wide frame"
        );
        Self {
            question_codes: config.question_codes.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_table(&self) -> Table {
        let headers = WIDE_LEADING_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.question_codes.iter().cloned())
            .collect();
        let mut table = Table::new(Self::TABLE_NAME, headers);
        for row in &self.rows {
            let mut cells = vec![
                row.patient_id.clone(),
                row.first_name.clone(),
                row.last_name.clone(),
                row.treatment_date.clone(),
            ];
            cells.extend(self.question_codes.iter().map(|question| {
                row.values
                    .get(question)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }));
            table.push_row(cells);
        }
        table
    }
}
