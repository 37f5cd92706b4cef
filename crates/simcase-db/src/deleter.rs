//! Scenario deletion facade: transactional row removal, then best-effort
//! media cleanup.

use crate::deletion::{DeleteReport, DeleteStep, DELETE_STEPS};
use crate::error::Result;
use crate::store::Store;
use simcase_core::MediaStore;

/// Deletes a scenario and, strictly after the database transaction commits,
/// its media files.
///
/// Media removal is best-effort: the committed database state is already
/// authoritative, so a file-store failure is logged and never propagated.
/// If the transaction fails, no media call is made at all.
pub struct ScenarioDeleter<'a, M: MediaStore> {
    store: &'a Store,
    media: &'a M,
}

impl<'a, M: MediaStore> ScenarioDeleter<'a, M> {
    pub fn new(store: &'a Store, media: &'a M) -> Self {
        Self { store, media }
    }

    /// Delete the scenario. The error carries a human-readable reason; an
    /// unknown id fails with nothing touched.
    pub fn delete(&self, scenario_id: u32) -> Result<DeleteReport> {
        self.delete_with_steps(scenario_id, DELETE_STEPS)
    }

    pub(crate) fn delete_with_steps(
        &self,
        scenario_id: u32,
        steps: &[(&'static str, DeleteStep)],
    ) -> Result<DeleteReport> {
        let report = self.store.delete_scenario_with_steps(scenario_id, steps)?;

        if !report.media.is_empty() {
            if let Err(e) = self.media.delete(&report.media) {
                tracing::warn!(
                    scenario_id,
                    error = %e,
                    files = report.media.len(),
                    "media removal failed after delete commit"
                );
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use simcase_core::{RefertoSeed, ScenarioKind, ScenarioSeed};
    use std::io;
    use std::sync::Mutex;

    /// Records delete calls; optionally fails them.
    #[derive(Default)]
    struct RecordingMediaStore {
        deleted: Mutex<Vec<Vec<String>>>,
        fail_delete: bool,
    }

    impl MediaStore for RecordingMediaStore {
        fn store(&self, name: &str, _bytes: &[u8]) -> io::Result<String> {
            Ok(name.to_string())
        }

        fn delete(&self, names: &[String]) -> io::Result<()> {
            self.deleted.lock().unwrap().push(names.to_vec());
            if self.fail_delete {
                return Err(io::Error::new(io::ErrorKind::Other, "store offline"));
            }
            Ok(())
        }
    }

    fn seed_with_media() -> ScenarioSeed {
        let mut seed = ScenarioSeed::new(ScenarioKind::Quick);
        seed.titolo = "Caso con media".to_string();
        seed.referti = vec![RefertoSeed {
            tipo: "RX".to_string(),
            media: Some("rx_torace.jpg".to_string()),
            referto_testuale: String::new(),
        }];
        seed
    }

    #[test]
    fn test_media_deleted_after_successful_delete() {
        let store = Store::in_memory().unwrap();
        let media = RecordingMediaStore::default();
        let id = store.create_scenario(&seed_with_media()).unwrap();

        let deleter = ScenarioDeleter::new(&store, &media);
        let report = deleter.delete(id).unwrap();

        assert_eq!(report.media, vec!["rx_torace.jpg".to_string()]);
        let calls = media.deleted.lock().unwrap();
        assert_eq!(calls.as_slice(), &[vec!["rx_torace.jpg".to_string()]]);
    }

    #[test]
    fn test_no_media_call_when_delete_fails() {
        let store = Store::in_memory().unwrap();
        let media = RecordingMediaStore::default();

        let deleter = ScenarioDeleter::new(&store, &media);
        let err = deleter.delete(42).unwrap_err();

        assert!(matches!(err, Error::ScenarioNotFound(42)));
        assert!(media.deleted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_media_call_when_transaction_fails() {
        use crate::deletion::{DeleteCtx, DeleteStep, DELETE_STEPS};
        use native_db::transaction::RwTransaction;

        let store = Store::in_memory().unwrap();
        let media = RecordingMediaStore::default();
        let id = store.create_scenario(&seed_with_media()).unwrap();

        // a trailing failure: every row step ran and resolved the media
        // names, but the transaction never commits
        fn failing(_rw: &RwTransaction, _ctx: &mut DeleteCtx) -> crate::error::Result<u64> {
            Err(Error::Database("guasto simulato".to_string()))
        }
        let mut steps: Vec<(&'static str, DeleteStep)> = DELETE_STEPS.to_vec();
        steps.push(("guasto", failing));

        let deleter = ScenarioDeleter::new(&store, &media);
        let err = deleter.delete_with_steps(id, &steps).unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        // rolled back, so the media files must stay untouched
        assert!(media.deleted.lock().unwrap().is_empty());
        assert!(store.scenario_exists(id).unwrap());
    }

    #[test]
    fn test_media_failure_does_not_fail_delete() {
        let store = Store::in_memory().unwrap();
        let media = RecordingMediaStore {
            fail_delete: true,
            ..RecordingMediaStore::default()
        };
        let id = store.create_scenario(&seed_with_media()).unwrap();

        let deleter = ScenarioDeleter::new(&store, &media);
        let report = deleter.delete(id).unwrap();

        // database state is final; the store failure is only logged
        assert!(!store.scenario_exists(id).unwrap());
        assert_eq!(report.media.len(), 1);
    }

    #[test]
    fn test_no_media_call_when_scenario_has_no_media() {
        let store = Store::in_memory().unwrap();
        let media = RecordingMediaStore::default();

        let mut seed = ScenarioSeed::new(ScenarioKind::Quick);
        seed.titolo = "Senza media".to_string();
        let id = store.create_scenario(&seed).unwrap();

        ScenarioDeleter::new(&store, &media).delete(id).unwrap();
        assert!(media.deleted.lock().unwrap().is_empty());
    }
}
