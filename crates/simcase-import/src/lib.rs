//! Simcase import - archive-based scenario import
//!
//! Reconstructs a full scenario entity graph from an untrusted ZIP/JSON
//! payload: archive extraction, lenient manifest parsing, catalog
//! validation, one transactional write, then post-commit media writes.

mod error;
mod importer;
mod manifest;
mod validator;

pub use error::{Error, Result};
pub use importer::ScenarioImporter;
pub use manifest::Manifest;
pub use validator::CatalogValidator;
