//! Staging of filled rows into the canonical long frame.

use std::collections::HashMap;

use rtx_model::schema::{LONG_FRAME_COLUMNS, responses};
use rtx_model::{
    CleanedValue, Imputation, QuestionTreatmentInstanceCode, Table, TreatmentInstanceCode,
};
use tracing::{info, warn};

use crate::datetime::ParsedInstant;
use crate::error::{Result, TransformError};
use crate::fill::FilledRow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientName {
    pub first_name: String,
    pub last_name: String,
}

/// Client id to display name, taken from the response export.
#[derive(Debug, Clone, Default)]
pub struct ClientNameMap {
    names: HashMap<String, ClientName>,
}

impl ClientNameMap {
    /// First row per client wins; rows without a client id are skipped.
    ///
    /// The name columns are optional. Without them every name is blank.
    ///
    /// # Errors
    ///
    /// Fails when the export has no `ClientID` column.
    pub fn from_responses(table: &Table) -> Result<Self> {
        let id_col = table.column(responses::CLIENT_ID)?;
        let first_col = table.find_column(responses::FIRST_NAME);
        let last_col = table.find_column(responses::LAST_NAME);
        if first_col.is_none() || last_col.is_none() {
            warn!(
                table = %table.name,
                "response export has no client name columns, names will be blank"
            );
        }

        let mut names = HashMap::new();
        for row in &table.rows {
            let client_id = &row[id_col];
            if client_id.is_empty() {
                continue;
            }
            names.entry(client_id.clone()).or_insert_with(|| ClientName {
                first_name: first_col.map(|col| row[col].clone()).unwrap_or_default(),
                last_name: last_col.map(|col| row[col].clone()).unwrap_or_default(),
            });
        }
        Ok(Self { names })
    }

    pub fn get(&self, client_id: &str) -> Option<&ClientName> {
        self.names.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One row of the long frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub question_instance_code: QuestionTreatmentInstanceCode,
    pub instance_code: TreatmentInstanceCode,
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub treatment_code: String,
    pub survey_name: String,
    /// Assessment date text as exported by the daily activity report.
    pub treatment_date: String,
    /// Instant parsed from `treatment_date` when the row was staged; `None`
    /// for rows read back from a table.
    pub treatment_instant: Option<ParsedInstant>,
    pub question_code: String,
    pub value: CleanedValue,
    pub imputation: Imputation,
}

/// The staged long frame: one row per client, assessment and question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongFrame {
    pub rows: Vec<LongRow>,
}

impl LongFrame {
    pub const TABLE_NAME: &'static str = "long_frame";

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::with_columns(Self::TABLE_NAME, &LONG_FRAME_COLUMNS);
        for row in &self.rows {
            table.push_row(vec![
                row.question_instance_code.to_string(),
                row.instance_code.to_string(),
                row.patient_id.clone(),
                row.first_name.clone(),
                row.last_name.clone(),
                row.treatment_code.clone(),
                row.survey_name.clone(),
                row.treatment_date.clone(),
                row.question_code.clone(),
                row.value.to_string(),
                row.imputation.as_str().to_string(),
            ]);
        }
        table
    }

    /// Read a long frame back from a persisted table.
    ///
    /// Values are kept as text; numeric readings happen where they are summed.
    ///
    /// # Errors
    ///
    /// Fails when one of the long-frame columns is missing. An empty table
    /// is [`TransformError::EmptyInput`].
    pub fn from_table(table: &Table) -> Result<Self> {
        let cols = LONG_FRAME_COLUMNS
            .iter()
            .map(|column| table.column(column))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if table.is_empty() {
            return Err(TransformError::EmptyInput {
                table: table.name.clone(),
            });
        }
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let cell = |i: usize| row[cols[i]].clone();
                LongRow {
                    question_instance_code: QuestionTreatmentInstanceCode::from_formatted(cell(0)),
                    instance_code: TreatmentInstanceCode::from_formatted(cell(1)),
                    patient_id: cell(2),
                    first_name: cell(3),
                    last_name: cell(4),
                    treatment_code: cell(5),
                    survey_name: cell(6),
                    treatment_date: cell(7),
                    treatment_instant: None,
                    question_code: cell(8),
                    value: CleanedValue::Text(cell(9)),
                    imputation: Imputation::parse(&row[cols[10]]),
                }
            })
            .collect();
        Ok(Self { rows })
    }
}

/// Attach client names and project filled rows onto the long-frame schema.
pub fn stage(filled: Vec<FilledRow>, names: &ClientNameMap) -> LongFrame {
    let blank = ClientName::default();
    let rows: Vec<LongRow> = filled
        .into_iter()
        .map(|filled| {
            let FilledRow {
                skeleton,
                value,
                imputation,
            } = filled;
            let name = names.get(&skeleton.patient_id).unwrap_or(&blank);
            LongRow {
                question_instance_code: skeleton.question_instance_code,
                instance_code: skeleton.instance_code,
                first_name: name.first_name.clone(),
                last_name: name.last_name.clone(),
                patient_id: skeleton.patient_id,
                treatment_code: skeleton.treatment_code.to_string(),
                survey_name: skeleton.survey_name,
                treatment_date: skeleton.treatment_date,
                treatment_instant: Some(skeleton.treatment_instant),
                question_code: skeleton.question_code,
                value,
                imputation,
            }
        })
        .collect();
    info!(
        long_rows = rows.len(),
        named_clients = names.len(),
        "staged long frame"
    );
    LongFrame { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses_table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::with_columns("responses", headers);
        for row in rows {
            table.push_row(row.iter().map(|c| (*c).to_string()).collect());
        }
        table
    }

    #[test]
    fn first_name_row_wins() {
        let table = responses_table(
            &["ClientID", "FirstName", "LastName"],
            &[
                &["C1", "Ada", "Lovelace"],
                &["C1", "Augusta", "King"],
                &["", "Nobody", "Here"],
            ],
        );
        let names = ClientNameMap::from_responses(&table).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("C1").unwrap().first_name, "Ada");
    }

    #[test]
    fn name_columns_are_optional() {
        let table = responses_table(&["ClientID"], &[&["C1"]]);
        let names = ClientNameMap::from_responses(&table).unwrap();
        assert_eq!(names.get("C1"), Some(&ClientName::default()));
    }

    #[test]
    fn long_frame_reads_back_from_its_table() {
        let instance_code = TreatmentInstanceCode::from_formatted("C1-6-1-2024-14-30");
        let frame = LongFrame {
            rows: vec![LongRow {
                question_instance_code: instance_code.question("emo-mgmt"),
                instance_code,
                patient_id: "C1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                treatment_code: "9000".to_string(),
                survey_name: "Self Sufficiency".to_string(),
                treatment_date: "6/1/2024 2:30:00 PM".to_string(),
                treatment_instant: None,
                question_code: "emo-mgmt".to_string(),
                value: CleanedValue::Text("3".to_string()),
                imputation: Imputation::No,
            }],
        };
        let table = frame.to_table();
        assert_eq!(table.headers[0], "QuestionTreatmentInstanceCode");
        assert_eq!(LongFrame::from_table(&table).unwrap(), frame);
    }

    #[test]
    fn empty_long_frame_table_is_rejected() {
        let table = Table::with_columns("long_frame", &LONG_FRAME_COLUMNS);
        assert!(matches!(
            LongFrame::from_table(&table),
            Err(TransformError::EmptyInput { .. })
        ));
    }
}
