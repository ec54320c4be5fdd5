//! Cleaning of the per-question response export.

use chrono::NaiveDateTime;
use rtx_model::schema::responses;
use rtx_model::{CleanedValue, QuestionTreatmentInstanceCode, Table, TreatmentInstanceCode};
use tracing::{debug, info};

use crate::datetime::{combine_date_and_time, parse_datetime, parse_time_of_day};
use crate::error::Result;
use crate::mapping::DictionaryMappings;
use crate::report::FallbackTally;

/// One answered question with its derived keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRow {
    pub client_id: String,
    pub survey_name: String,
    pub question_code: String,
    pub raw_value: String,
    /// Treatment code of the survey, empty when the survey name is unknown.
    pub treatment_code: String,
    pub cleaned_value: CleanedValue,
    pub instant: NaiveDateTime,
    pub instance_code: TreatmentInstanceCode,
    pub question_instance_code: QuestionTreatmentInstanceCode,
}

#[derive(Debug, Clone, Default)]
pub struct Responses {
    pub rows: Vec<ResponseRow>,
    pub unknown_survey_rows: usize,
    pub date_fallbacks: FallbackTally,
}

struct ResponseColumns {
    client_id: usize,
    date: usize,
    time: usize,
    document: usize,
    code: usize,
    value: usize,
}

impl ResponseColumns {
    fn locate(table: &Table) -> Result<Self> {
        Ok(Self {
            client_id: table.column(responses::CLIENT_ID)?,
            date: table.column(responses::DATE)?,
            time: table.column(responses::TIME)?,
            document: table.column(responses::DOCUMENT)?,
            code: table.column(responses::CODE)?,
            value: table.column(responses::VALUE)?,
        })
    }
}

/// Clean every response row and derive its instance codes.
///
/// The instant keeps the calendar day of the `Date` cell and the hour and
/// minute of the `Time` cell. Unknown survey names and unmapped raw values
/// are not errors.
///
/// # Errors
///
/// Fails when one of the required response columns is missing.
pub fn process_responses(table: &Table, mappings: &DictionaryMappings) -> Result<Responses> {
    let cols = ResponseColumns::locate(table)?;
    let mut processed = Responses::default();
    for row in &table.rows {
        let client_id = &row[cols.client_id];
        let survey_name = &row[cols.document];
        let question_code = &row[cols.code];
        let raw_value = &row[cols.value];

        let treatment_code = mappings.surveys.code_for(survey_name);
        if treatment_code.is_empty() {
            processed.unknown_survey_rows += 1;
        }

        let date = parse_datetime(&row[cols.date]);
        processed.date_fallbacks.observe(date, &row[cols.date]);
        let time = parse_time_of_day(&row[cols.time]);
        processed.date_fallbacks.observe(time, &row[cols.time]);
        let instant = combine_date_and_time(date.instant(), time.instant());

        let instance_code = TreatmentInstanceCode::derive(client_id, instant);
        processed.rows.push(ResponseRow {
            client_id: client_id.clone(),
            survey_name: survey_name.clone(),
            question_code: question_code.clone(),
            raw_value: raw_value.clone(),
            treatment_code: treatment_code.to_string(),
            cleaned_value: mappings.values.clean(raw_value),
            instant,
            question_instance_code: instance_code.question(question_code),
            instance_code,
        });
    }
    if processed.unknown_survey_rows > 0 {
        debug!(
            unknown_survey_rows = processed.unknown_survey_rows,
            "responses with survey names missing from the dictionary"
        );
    }
    info!(response_rows = processed.rows.len(), "processed responses");
    Ok(processed)
}
