//! Year-over-year long frame with total and category rollups.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;
use rtx_model::schema::{
    CATEGORY_QUESTION_PREFIX, NO_CLIENT_DATE_MARKER, OVERALL_PERIOD, TOTAL_QUESTION_CODE,
    YOY_FRAME_COLUMNS,
};
use rtx_model::{CleanedValue, PipelineConfig, Table, TreatmentInstanceCode, format_numeric};
use tracing::info;

use crate::client_dates::{ClientDateFrame, ClientDateRow, PeriodWindow};
use crate::datetime::format_canonical;
use crate::error::{Result, TransformError};
use crate::stage::LongFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct YoyRow {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub survey_name: String,
    pub treatment_code: String,
    /// A question code, `__TOTAL__`, or `__CAT__:{category}`.
    pub question_code: String,
    pub program_year: String,
    pub start_value: CleanedValue,
    pub end_value: CleanedValue,
    pub movement: Option<f64>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub start_instance: Option<TreatmentInstanceCode>,
    pub end_instance: Option<TreatmentInstanceCode>,
    pub eligible: bool,
}

/// Result of the year-over-year pivot.
#[derive(Debug, Clone, PartialEq)]
pub enum YoyFrame {
    /// The client date frame had no rows; nothing to pivot.
    NoClientDates,
    Rows(Vec<YoyRow>),
}

impl YoyFrame {
    pub const TABLE_NAME: &'static str = "yoy_frame";

    pub fn rows(&self) -> &[YoyRow] {
        match self {
            Self::NoClientDates => &[],
            Self::Rows(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn to_table(&self) -> Table {
        let Self::Rows(rows) = self else {
            return Table::with_columns(Self::TABLE_NAME, &[NO_CLIENT_DATE_MARKER]);
        };
        let mut table = Table::with_columns(Self::TABLE_NAME, &YOY_FRAME_COLUMNS);
        for row in rows {
            table.push_row(vec![
                row.patient_id.clone(),
                row.first_name.clone(),
                row.last_name.clone(),
                row.survey_name.clone(),
                row.treatment_code.clone(),
                row.question_code.clone(),
                row.program_year.clone(),
                row.start_value.to_string(),
                row.end_value.to_string(),
                row.movement.map(format_numeric).unwrap_or_default(),
                row.start_date.map(format_canonical).unwrap_or_default(),
                row.end_date.map(format_canonical).unwrap_or_default(),
                row.start_instance
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                row.end_instance
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                row.eligible.to_string(),
            ]);
        }
        table
    }
}

/// Values of the long frame indexed by assessment and question.
struct ValueIndex {
    values: HashMap<(String, String), CleanedValue>,
    questions_by_treatment: HashMap<String, BTreeSet<String>>,
}

impl ValueIndex {
    fn new(long: &LongFrame) -> Self {
        let mut values = HashMap::new();
        let mut questions_by_treatment: HashMap<String, BTreeSet<String>> = HashMap::new();
        for row in &long.rows {
            if row.instance_code.is_empty()
                || row.treatment_code.is_empty()
                || row.question_code.is_empty()
            {
                continue;
            }
            values
                .entry((
                    row.instance_code.as_str().to_string(),
                    row.question_code.clone(),
                ))
                .or_insert_with(|| row.value.clone());
            questions_by_treatment
                .entry(row.treatment_code.clone())
                .or_default()
                .insert(row.question_code.clone());
        }
        Self {
            values,
            questions_by_treatment,
        }
    }

    fn questions(&self, treatment_code: &str) -> Vec<&str> {
        self.questions_by_treatment
            .get(treatment_code)
            .map(|questions| questions.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn value(
        &self,
        instance: Option<&TreatmentInstanceCode>,
        question_code: &str,
    ) -> CleanedValue {
        instance
            .and_then(|instance| {
                self.values
                    .get(&(instance.as_str().to_string(), question_code.to_string()))
            })
            .cloned()
            .unwrap_or_default()
    }
}

/// Sum of the numeric values, or `None` when none of them is numeric.
pub fn sum_numeric<'a>(values: impl IntoIterator<Item = &'a CleanedValue>) -> Option<f64> {
    values
        .into_iter()
        .filter_map(CleanedValue::as_f64)
        .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
}

/// `end - start` when both sides are numeric.
pub fn movement(start: &CleanedValue, end: &CleanedValue) -> Option<f64> {
    Some(end.as_f64()? - start.as_f64()?)
}

struct PeriodContext<'a> {
    client: &'a ClientDateRow,
    label: &'a str,
    window: &'a PeriodWindow,
}

impl PeriodContext<'_> {
    fn start_instance(&self) -> Option<&TreatmentInstanceCode> {
        self.window.start.as_ref().map(|instance| &instance.code)
    }

    fn end_instance(&self) -> Option<&TreatmentInstanceCode> {
        self.window.end.as_ref().map(|instance| &instance.code)
    }

    fn row(
        &self,
        question_code: String,
        start_value: CleanedValue,
        end_value: CleanedValue,
    ) -> YoyRow {
        YoyRow {
            patient_id: self.client.patient_id.clone(),
            first_name: self.client.first_name.clone(),
            last_name: self.client.last_name.clone(),
            survey_name: self.client.survey_name.clone(),
            treatment_code: self.client.treatment_code.clone(),
            question_code,
            program_year: self.label.to_string(),
            movement: movement(&start_value, &end_value),
            start_value,
            end_value,
            start_date: self.window.start.as_ref().map(|instance| instance.instant),
            end_date: self.window.end.as_ref().map(|instance| instance.instant),
            start_instance: self.start_instance().cloned(),
            end_instance: self.end_instance().cloned(),
            eligible: self.window.eligible,
        }
    }

    fn rollup(&self, index: &ValueIndex, question_code: String, questions: &[&str]) -> YoyRow {
        let sum_at = |instance: Option<&TreatmentInstanceCode>| {
            let values: Vec<CleanedValue> = questions
                .iter()
                .map(|question| index.value(instance, question))
                .collect();
            sum_numeric(&values)
                .map(CleanedValue::Float)
                .unwrap_or_default()
        };
        let start = sum_at(self.start_instance());
        let end = sum_at(self.end_instance());
        self.row(question_code, start, end)
    }
}

/// Pivot the client date frame into per-question, total and category rows
/// for every program year and the all-time period.
///
/// # Errors
///
/// Returns [`TransformError::EmptyInput`] when the client date frame has rows
/// but the long frame is empty.
pub fn build_yoy_frame(
    client_dates: &ClientDateFrame,
    long: &LongFrame,
    config: &PipelineConfig,
) -> Result<YoyFrame> {
    if client_dates.is_empty() {
        return Ok(YoyFrame::NoClientDates);
    }
    if long.is_empty() {
        return Err(TransformError::EmptyInput {
            table: LongFrame::TABLE_NAME.to_string(),
        });
    }

    let index = ValueIndex::new(long);
    let periods: Vec<&str> = config
        .program_years
        .iter()
        .map(|year| year.label.as_str())
        .chain([OVERALL_PERIOD])
        .collect();

    let mut rows = Vec::new();
    for client in &client_dates.rows {
        if client.patient_id.is_empty() || client.treatment_code.is_empty() {
            continue;
        }
        let questions = index.questions(&client.treatment_code);
        let categories = config.categories_for(&client.treatment_code);
        for &label in &periods {
            let default_window = PeriodWindow::default();
            let ctx = PeriodContext {
                client,
                label,
                window: client.period(label).unwrap_or(&default_window),
            };
            for &question in &questions {
                rows.push(ctx.row(
                    question.to_string(),
                    index.value(ctx.start_instance(), question),
                    index.value(ctx.end_instance(), question),
                ));
            }
            rows.push(ctx.rollup(&index, TOTAL_QUESTION_CODE.to_string(), &questions));
            for category in categories {
                let members: Vec<&str> =
                    category.questions.iter().map(String::as_str).collect();
                rows.push(ctx.rollup(
                    &index,
                    format!("{CATEGORY_QUESTION_PREFIX}{}", category.name),
                    &members,
                ));
            }
        }
    }
    info!(
        yoy_rows = rows.len(),
        periods = periods.len(),
        "built year-over-year frame"
    );
    Ok(YoyFrame::Rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_is_blank_only_without_numeric_values() {
        let values = [
            CleanedValue::Int(2),
            CleanedValue::Text("n/a".to_string()),
            CleanedValue::Text("1.5".to_string()),
            CleanedValue::blank(),
        ];
        assert_eq!(sum_numeric(&values), Some(3.5));
        assert_eq!(sum_numeric(&[CleanedValue::blank()]), None);
        assert_eq!(sum_numeric(&[CleanedValue::Int(0)]), Some(0.0));
        assert_eq!(sum_numeric(std::iter::empty()), None);
    }

    #[test]
    fn movement_requires_both_sides() {
        assert_eq!(
            movement(&CleanedValue::Int(3), &CleanedValue::Float(4.5)),
            Some(1.5)
        );
        assert_eq!(movement(&CleanedValue::Int(3), &CleanedValue::blank()), None);
        assert_eq!(
            movement(&CleanedValue::Text("x".to_string()), &CleanedValue::Int(1)),
            None
        );
    }

    #[test]
    fn empty_client_dates_yield_marker() {
        let frame = build_yoy_frame(
            &ClientDateFrame::default(),
            &LongFrame::default(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(frame, YoyFrame::NoClientDates);
        assert_eq!(
            frame.to_table().headers,
            vec!["No client_date_frame data".to_string()]
        );
    }
}
