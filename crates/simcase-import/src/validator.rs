//! Catalog validation for externally supplied reference values.

use crate::error::{Error, Result};
use simcase_core::catalog;

/// Checks supply names and material ids against the fixed catalogs.
///
/// Every offending value is collected before failing, so one error names
/// them all.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogValidator;

impl CatalogValidator {
    pub fn new() -> Self {
        Self
    }

    /// Resolve supply names to catalog ids. Unknown names abort with a
    /// validation error listing all of them.
    pub fn resolve_presidi(&self, nomi: &[String]) -> Result<Vec<u32>> {
        let mut ids = Vec::with_capacity(nomi.len());
        let mut unknown = Vec::new();
        for nome in nomi {
            match catalog::presidio_by_nome(nome) {
                Some(presidio) => ids.push(presidio.id),
                None => unknown.push(nome.clone()),
            }
        }
        if !unknown.is_empty() {
            return Err(Error::UnknownPresidi(unknown));
        }
        Ok(ids)
    }

    /// Check material ids against the catalog. Ids arrive signed, exactly
    /// as written in the manifest; negative or unknown ones abort with a
    /// validation error listing them verbatim.
    pub fn resolve_materiali(&self, ids: &[i64]) -> Result<Vec<u32>> {
        let mut resolved = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();
        for id in ids {
            match u32::try_from(*id)
                .ok()
                .filter(|id| catalog::materiale_by_id(*id).is_some())
            {
                Some(id) => resolved.push(id),
                None => unknown.push(*id),
            }
        }
        if !unknown.is_empty() {
            return Err(Error::UnknownMateriali(unknown));
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_presidi() {
        let validator = CatalogValidator::new();
        let ids = validator
            .resolve_presidi(&["Defibrillatore".to_string(), "Ecografo".to_string()])
            .unwrap();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn test_unknown_presidi_all_listed() {
        let validator = CatalogValidator::new();
        let err = validator
            .resolve_presidi(&[
                "Defibrillatore".to_string(),
                "Macchina del caffe".to_string(),
                "Telecomando".to_string(),
            ])
            .unwrap_err();
        match err {
            Error::UnknownPresidi(unknown) => {
                assert_eq!(unknown, vec!["Macchina del caffe", "Telecomando"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_materiali_listed() {
        let validator = CatalogValidator::new();
        let err = validator.resolve_materiali(&[1, 99]).unwrap_err();
        assert!(matches!(err, Error::UnknownMateriali(ids) if ids == vec![99]));
    }

    #[test]
    fn test_negative_materiale_reported_as_written() {
        let validator = CatalogValidator::new();
        let err = validator.resolve_materiali(&[-3, 2]).unwrap_err();
        assert!(matches!(err, Error::UnknownMateriali(ids) if ids == vec![-3]));
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let validator = CatalogValidator::new();
        assert!(validator.resolve_presidi(&[]).unwrap().is_empty());
        assert!(validator.resolve_materiali(&[]).unwrap().is_empty());
    }
}
