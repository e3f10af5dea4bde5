use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to connect to directory database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Directory query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Unexpected value '{value}' in column {column}")]
    InvalidValue { column: &'static str, value: String },
}
