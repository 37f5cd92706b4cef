//! Scenario import pipeline.
//!
//! Archive extraction and manifest validation happen before any persistence
//! call; the whole entity graph is then written in one transaction
//! ([`Store::create_scenario`]); media files are written only after that
//! transaction has committed, and a per-file store failure never turns a
//! created scenario into a failure.

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::validator::CatalogValidator;
use indexmap::IndexMap;
use simcase_core::{MediaStore, ScenarioKind};
use simcase_db::Store;

/// Imports scenarios from uploaded archives.
pub struct ScenarioImporter<'a, M: MediaStore> {
    store: &'a Store,
    media: &'a M,
    validator: CatalogValidator,
}

impl<'a, M: MediaStore> ScenarioImporter<'a, M> {
    pub fn new(store: &'a Store, media: &'a M) -> Self {
        Self {
            store,
            media,
            validator: CatalogValidator::new(),
        }
    }

    /// Import a scenario archive. Returns the new scenario id.
    pub fn import_archive(&self, bytes: &[u8]) -> Result<u32> {
        let extracted = simcase_archive::extract_bytes(bytes)?;
        let manifest = Manifest::from_slice(&extracted.manifest)?;
        self.import_manifest(&manifest, &extracted.media)
    }

    /// Import a parsed manifest plus its extracted media files.
    pub fn import_manifest(
        &self,
        manifest: &Manifest,
        media: &IndexMap<String, Vec<u8>>,
    ) -> Result<u32> {
        let tipo = manifest.tipo().ok_or(Error::MissingField("tipo"))?;
        let kind = ScenarioKind::parse(tipo)
            .ok_or_else(|| Error::UnknownScenarioType(tipo.to_string()))?;

        let mut seed = manifest.seed(kind)?;
        seed.presidi = self.validator.resolve_presidi(&manifest.presidi())?;
        seed.materiali = self.validator.resolve_materiali(&manifest.materiali())?;

        let scenario_id = self.store.create_scenario(&seed)?;

        // the transaction is committed; media writes are best-effort
        for (name, bytes) in media {
            if let Err(e) = self.media.store(name, bytes) {
                tracing::warn!(
                    scenario_id,
                    file = %name,
                    error = %e,
                    "media write failed after import commit"
                );
            }
        }
        Ok(scenario_id)
    }
}
