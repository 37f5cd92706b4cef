//! Error types for database operations.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("database error: {0}")]
    Database(String),

    /// No scenario row with the given id.
    #[error("scenario not found: {0}")]
    ScenarioNotFound(u32),

    /// Scenario creation produced no usable id.
    #[error("scenario creation failed")]
    CreationFailed,
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}
