use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("table {table} has no header row")]
    MissingHeader { table: String },
    #[error("table {table} is missing required column {column}")]
    MissingColumn { table: String, column: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
