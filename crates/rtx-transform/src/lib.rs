//! Reconciliation and reshaping of assessment exports.
//!
//! Stages, in run order:
//!
//! - **mapping**: survey, value and question dictionaries
//! - **skeleton**: every question expected for every accepted assessment
//! - **responses**: cleaned answers keyed by question instance code
//! - **join** / **fill**: observed values on the skeleton, carried forward
//! - **stage**: the canonical long frame with client names
//! - **client_dates**: start and end assessments per reporting window
//! - **yoy**: per-question, total and category movement per window
//! - **wide**: one row per assessment for a single survey
//!
//! [`run_pipeline`] chains them and returns a [`PipelineReport`].

pub mod client_dates;
pub mod datetime;
pub mod error;
pub mod fill;
pub mod join;
pub mod mapping;
pub mod pipeline;
pub mod report;
pub mod responses;
pub mod skeleton;
pub mod stage;
pub mod wide;
pub mod yoy;

pub use client_dates::{AssessmentInstance, ClientDateFrame, ClientDateRow, PeriodWindow};
pub use datetime::{ParsedInstant, format_canonical, parse_datetime, parse_time_of_day};
pub use error::{Result, TransformError};
pub use mapping::DictionaryMappings;
pub use pipeline::{
    PipelineInputs, PipelineOutput, YoyRecomputation, recompute_yoy, run_pipeline,
};
pub use report::{FallbackTally, PipelineReport, StageFallbacks};
pub use stage::{ClientNameMap, LongFrame, LongRow};
pub use wide::WideFrame;
pub use yoy::{YoyFrame, YoyRow, build_yoy_frame};
