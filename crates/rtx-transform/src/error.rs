use rtx_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("required input {table} has no data rows")]
    EmptyInput { table: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
