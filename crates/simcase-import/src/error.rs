//! Error types for simcase-import

use thiserror::Error;

/// Import error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown scenario type: {0:?}")]
    UnknownScenarioType(String),

    #[error("unknown supplies: {}", .0.join(", "))]
    UnknownPresidi(Vec<String>),

    #[error("unknown materials: {0:?}")]
    UnknownMateriali(Vec<i64>),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("manifest parse error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Archive(#[from] simcase_archive::Error),

    #[error(transparent)]
    Db(#[from] simcase_db::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
