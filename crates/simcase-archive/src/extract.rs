//! Scenario archive extraction.
//!
//! A scenario archive is a ZIP with exactly one manifest entry plus any
//! number of media entries under the media folder. Extraction scans every
//! entry; the missing-manifest check runs only after the whole archive has
//! been read.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::io::{Cursor, Read, Seek};

/// Manifest entry name, matched case-insensitively on the full entry name.
pub const MANIFEST_NAME: &str = "scenario.json";

/// Media entries live under this folder; the key in the media map is the
/// entry name with the prefix stripped.
pub const MEDIA_PREFIX: &str = "media/";

/// Preallocation cap per entry. The declared uncompressed size comes from
/// the untrusted archive and may lie; `read_to_end` grows adaptively past
/// this, so a forged multi-gigabyte size cannot force an eager reservation.
const PREALLOC_CAP: u64 = 64 * 1024;

fn initial_capacity(declared: u64) -> usize {
    declared.min(PREALLOC_CAP) as usize
}

/// Decompressed archive payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArchive {
    /// Raw manifest bytes, parsed by the importer.
    pub manifest: Vec<u8>,
    /// Media filename -> bytes. Empty is valid.
    pub media: IndexMap<String, Vec<u8>>,
}

/// Extract a scenario archive from a seekable byte stream.
pub fn extract<R: Read + Seek>(reader: R) -> Result<ExtractedArchive> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut manifest: Option<Vec<u8>> = None;
    let mut media = IndexMap::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        if name.eq_ignore_ascii_case(MANIFEST_NAME) {
            let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
            entry.read_to_end(&mut bytes)?;
            manifest = Some(bytes);
        } else if let Some(relative) = name.strip_prefix(MEDIA_PREFIX) {
            if relative.is_empty() {
                continue;
            }
            let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
            entry.read_to_end(&mut bytes)?;
            media.insert(relative.to_string(), bytes);
        }
    }

    let manifest = manifest.ok_or(Error::ManifestMissing)?;
    Ok(ExtractedArchive { manifest, media })
}

/// Extract a scenario archive from an in-memory buffer.
pub fn extract_bytes(bytes: &[u8]) -> Result<ExtractedArchive> {
    extract(Cursor::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in entries {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_manifest_and_media() {
        let bytes = build_zip(&[
            ("scenario.json", br#"{"tipo":"Quick Scenario"}"#),
            ("media/ecg.png", b"\x89PNG"),
            ("media/rx/torace.jpg", b"\xff\xd8"),
        ]);

        let extracted = extract_bytes(&bytes).unwrap();
        assert_eq!(extracted.manifest, br#"{"tipo":"Quick Scenario"}"#);
        assert_eq!(extracted.media.len(), 2);
        assert_eq!(extracted.media["ecg.png"], b"\x89PNG");
        assert_eq!(extracted.media["rx/torace.jpg"], b"\xff\xd8");
    }

    #[test]
    fn test_extract_manifest_case_insensitive() {
        let bytes = build_zip(&[("SCENARIO.JSON", b"{}")]);
        let extracted = extract_bytes(&bytes).unwrap();
        assert_eq!(extracted.manifest, b"{}");
    }

    #[test]
    fn test_extract_zero_media_is_valid() {
        let bytes = build_zip(&[("scenario.json", b"{}")]);
        let extracted = extract_bytes(&bytes).unwrap();
        assert!(extracted.media.is_empty());
    }

    #[test]
    fn test_extract_missing_manifest() {
        let bytes = build_zip(&[("media/ecg.png", b"\x89PNG"), ("readme.txt", b"x")]);
        let err = extract_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::ManifestMissing));
    }

    #[test]
    fn test_extract_skips_directory_entries_and_bare_prefix() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.add_directory("media/", options).unwrap();
        writer.start_file("scenario.json", options).unwrap();
        writer.write_all(b"{}").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let extracted = extract_bytes(&bytes).unwrap();
        assert!(extracted.media.is_empty());
    }

    #[test]
    fn test_extract_ignores_unrelated_entries() {
        let bytes = build_zip(&[
            ("scenario.json", b"{}"),
            ("notes/appunti.txt", b"fuori dal manifest"),
        ]);
        let extracted = extract_bytes(&bytes).unwrap();
        assert!(extracted.media.is_empty());
    }

    #[test]
    fn test_entry_capacity_caps_declared_size() {
        // the declared size field is untrusted; a lying entry must not
        // drive the reservation past the cap
        assert_eq!(initial_capacity(12), 12);
        assert_eq!(initial_capacity(PREALLOC_CAP), PREALLOC_CAP as usize);
        assert_eq!(
            initial_capacity(8 * 1024 * 1024 * 1024),
            PREALLOC_CAP as usize
        );
        assert_eq!(initial_capacity(u64::MAX), PREALLOC_CAP as usize);
    }

    #[test]
    fn test_extract_entry_larger_than_prealloc_cap() {
        let payload = vec![0xabu8; PREALLOC_CAP as usize * 3];
        let bytes = build_zip(&[("scenario.json", b"{}"), ("media/video.mp4", &payload)]);

        let extracted = extract_bytes(&bytes).unwrap();
        assert_eq!(extracted.media["video.mp4"], payload);
    }

    #[test]
    fn test_extract_malformed_archive() {
        let err = extract_bytes(b"not a zip at all").unwrap_err();
        assert!(matches!(err, Error::Zip(_)));
    }
}
