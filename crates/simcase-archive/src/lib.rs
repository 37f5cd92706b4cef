//! Simcase archive - scenario archive handling
//!
//! Extraction of uploaded scenario archives (one manifest plus media files)
//! and the filesystem implementation of the media store contract.

mod error;
mod extract;
mod media;

pub use error::{Error, Result};
pub use extract::{extract, extract_bytes, ExtractedArchive, MANIFEST_NAME, MEDIA_PREFIX};
pub use media::FsMediaStore;
