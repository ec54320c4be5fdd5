//! Survey and value dictionaries built from the assessment dictionary export.

use std::collections::{HashMap, HashSet};

use rtx_model::schema::dictionary;
use rtx_model::{CleanedValue, Table};
use tracing::debug;

use crate::error::Result;

/// Survey name to treatment code; later rows overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct SurveyCodeMapping {
    codes: HashMap<String, String>,
}

impl SurveyCodeMapping {
    pub fn insert(&mut self, survey_name: &str, treatment_code: &str) {
        self.codes
            .insert(survey_name.to_string(), treatment_code.to_string());
    }

    /// Treatment code for a survey name, or an empty string when unknown.
    pub fn code_for(&self, survey_name: &str) -> &str {
        self.codes.get(survey_name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Raw response text to cleaned value; later rows overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ValueCleaningMap {
    values: HashMap<String, CleanedValue>,
}

impl ValueCleaningMap {
    /// Record a mapping unless either side is empty. `"0"` is a valid target.
    pub fn insert(&mut self, raw_value: &str, cleaned_value: &str) {
        if raw_value.is_empty() || cleaned_value.is_empty() {
            return;
        }
        self.values.insert(
            raw_value.to_string(),
            CleanedValue::from_cleaned_text(cleaned_value),
        );
    }

    pub fn get(&self, raw_value: &str) -> Option<&CleanedValue> {
        self.values.get(raw_value)
    }

    /// Cleaned value for `raw_value`, passing unmapped text through.
    pub fn clean(&self, raw_value: &str) -> CleanedValue {
        self.values
            .get(raw_value)
            .cloned()
            .unwrap_or_else(|| CleanedValue::Text(raw_value.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A question registered against a survey in the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTriple {
    pub treatment_code: String,
    pub survey_name: String,
    pub question_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct DictionaryMappings {
    pub surveys: SurveyCodeMapping,
    pub values: ValueCleaningMap,
    /// Unique (treatment code, question code) pairs in first-seen order,
    /// carrying the survey name of their first row.
    pub questions: Vec<QuestionTriple>,
}

impl DictionaryMappings {
    /// Build all dictionary lookups in one pass over the export.
    ///
    /// # Errors
    ///
    /// Fails when one of the dictionary columns is missing.
    pub fn from_table(table: &Table) -> Result<Self> {
        let code_col = table.column(dictionary::TREATMENT_CODE)?;
        let document_col = table.column(dictionary::DOCUMENT)?;
        let question_col = table.column(dictionary::QUESTION_CODE)?;
        let raw_col = table.column(dictionary::RAW_VALUE)?;
        let cleaned_col = table.column(dictionary::CLEANED_VALUE)?;

        let mut mappings = Self::default();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        for row in &table.rows {
            let treatment_code = &row[code_col];
            let survey_name = &row[document_col];
            let question_code = &row[question_col];

            if !survey_name.is_empty() && !treatment_code.is_empty() {
                mappings.surveys.insert(survey_name, treatment_code);
            }
            mappings.values.insert(&row[raw_col], &row[cleaned_col]);

            if seen_pairs.insert((treatment_code.clone(), question_code.clone())) {
                mappings.questions.push(QuestionTriple {
                    treatment_code: treatment_code.clone(),
                    survey_name: survey_name.clone(),
                    question_code: question_code.clone(),
                });
            }
        }
        debug!(
            survey_mappings = mappings.surveys.len(),
            value_mappings = mappings.values.len(),
            question_triples = mappings.questions.len(),
            "built dictionary mappings"
        );
        Ok(mappings)
    }

    /// Questions registered for `treatment_code`, compared as text.
    pub fn questions_for<'a>(
        &'a self,
        treatment_code: &'a str,
    ) -> impl Iterator<Item = &'a QuestionTriple> + 'a {
        self.questions
            .iter()
            .filter(move |triple| triple.treatment_code == treatment_code)
    }
}
