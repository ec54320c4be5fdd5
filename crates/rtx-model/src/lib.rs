//! Core types shared by the assessment export pipeline.
//!
//! - **table**: rectangular text tables as exchanged with the I/O layer
//! - **ids**: treatment instance identifiers derived from client and timestamp
//! - **value**: cleaned response values and imputation flags
//! - **config**: program years, rollup categories and pivot settings
//! - **schema**: column names of the input exports and produced frames

pub mod config;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod schema;
pub mod table;
pub mod value;

pub use config::{AggregationCategory, PipelineConfig, ProgramYear, WidePivotConfig};
pub use error::{ModelError, Result};
pub use ids::{QuestionTreatmentInstanceCode, TreatmentInstanceCode, format_instance_timestamp};
pub use numeric::{format_numeric, parse_f64, parse_i64};
pub use table::Table;
pub use value::{CleanedValue, Imputation, parse_flag};
