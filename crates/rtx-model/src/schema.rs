//! Column names of the raw exports and of the produced frames.

/// Assessment dictionary export.
pub mod dictionary {
    pub const TREATMENT_CODE: &str = "TreatmentCode";
    pub const DOCUMENT: &str = "Document";
    pub const QUESTION_CODE: &str = "QuestionCode";
    pub const RAW_VALUE: &str = "RawValue";
    pub const CLEANED_VALUE: &str = "CleanedValue";
}

/// Client daily summary export.
pub mod daily_activity {
    pub const PATIENT_ID: &str = "PatientID";
    pub const TREATMENT_CODE: &str = "TreatmentCode";
    pub const TREATMENT_DT: &str = "TreatmentDT";
}

/// Treatment thread (per-question response) export.
pub mod responses {
    pub const CLIENT_ID: &str = "ClientID";
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const DOCUMENT: &str = "Document";
    pub const CODE: &str = "Code";
    pub const VALUE: &str = "Value";
    pub const FIRST_NAME: &str = "FirstName";
    pub const LAST_NAME: &str = "LastName";
}

pub const QUESTION_TREATMENT_INSTANCE_CODE: &str = "QuestionTreatmentInstanceCode";
pub const TREATMENT_INSTANCE_CODE: &str = "TreatmentInstanceCode";
pub const PATIENT_ID: &str = "PatientID";
pub const FIRST_NAME: &str = "FirstName";
pub const LAST_NAME: &str = "LastName";
pub const TREATMENT_CODE: &str = "TreatmentCode";
pub const SURVEY_NAME: &str = "SurveyName";
pub const TREATMENT_DATE: &str = "TreatmentDate";
pub const QUESTION_CODE: &str = "QuestionCode";
pub const VALUE: &str = "Value";
pub const IS_IMPUTED: &str = "IsImputed";

/// Long frame columns, in output order.
pub const LONG_FRAME_COLUMNS: [&str; 11] = [
    QUESTION_TREATMENT_INSTANCE_CODE,
    TREATMENT_INSTANCE_CODE,
    PATIENT_ID,
    FIRST_NAME,
    LAST_NAME,
    TREATMENT_CODE,
    SURVEY_NAME,
    TREATMENT_DATE,
    QUESTION_CODE,
    VALUE,
    IS_IMPUTED,
];

/// Leading columns of the wide frame; one column per tracked question follows.
pub const WIDE_LEADING_COLUMNS: [&str; 4] = [PATIENT_ID, FIRST_NAME, LAST_NAME, TREATMENT_DATE];

/// Year-over-year frame columns, in output order.
pub const YOY_FRAME_COLUMNS: [&str; 15] = [
    PATIENT_ID,
    FIRST_NAME,
    LAST_NAME,
    SURVEY_NAME,
    TREATMENT_CODE,
    QUESTION_CODE,
    "ProgramYear",
    "StartValue",
    "EndValue",
    "Movement",
    "StartAssessmentDate",
    "EndAssessmentDate",
    "StartTreatmentInstanceCode",
    "EndTreatmentInstanceCode",
    "IsEligibleDenominator",
];

/// Leading identity columns of the client date frame.
pub const CLIENT_DATE_LEADING_COLUMNS: [&str; 5] =
    [PATIENT_ID, FIRST_NAME, LAST_NAME, TREATMENT_CODE, SURVEY_NAME];

/// Period label used for the all-time window.
pub const OVERALL_PERIOD: &str = "OVERALL";
/// Pseudo question code of the all-questions rollup.
pub const TOTAL_QUESTION_CODE: &str = "__TOTAL__";
/// Prefix of category rollup pseudo question codes.
pub const CATEGORY_QUESTION_PREFIX: &str = "__CAT__:";

/// Header of the marker table emitted when no client date rows exist.
pub const NO_DATA_MARKER: &str = "No data";
/// Header of the marker table emitted for a YoY frame without client date rows.
pub const NO_CLIENT_DATE_MARKER: &str = "No client_date_frame data";
