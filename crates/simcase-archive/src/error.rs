//! Error types for simcase-archive

use thiserror::Error;

/// Archive handling error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("manifest not found in archive")]
    ManifestMissing,

    #[error("archive read failure: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("read failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid media name: {0}")]
    InvalidMediaName(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
