//! Filesystem media store.

use crate::error::{Error, Result};
use simcase_core::MediaStore;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Media store backed by a flat directory tree under a root path.
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve a stored name to a path under the root, rejecting names that
    /// would escape it.
    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            !matches!(c, Component::Normal(_))
        });
        if name.is_empty() || escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                Error::InvalidMediaName(name.to_string()),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for FsMediaStore {
    fn store(&self, name: &str, bytes: &[u8]) -> io::Result<String> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(name.to_string())
    }

    fn delete(&self, names: &[String]) -> io::Result<()> {
        for name in names {
            let path = self.resolve(name)?;
            match fs::remove_file(&path) {
                Ok(()) => {}
                // already gone counts as removed
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path()).unwrap();

        let stored = store.store("ecg.png", b"\x89PNG").unwrap();
        assert_eq!(stored, "ecg.png");
        assert_eq!(fs::read(dir.path().join("ecg.png")).unwrap(), b"\x89PNG");

        store.delete(&["ecg.png".to_string()]).unwrap();
        assert!(!dir.path().join("ecg.png").exists());
    }

    #[test]
    fn test_store_nested_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path()).unwrap();

        store.store("rx/torace.jpg", b"\xff\xd8").unwrap();
        assert!(dir.path().join("rx/torace.jpg").exists());
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path()).unwrap();
        store.delete(&["assente.png".to_string()]).unwrap();
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path()).unwrap();

        assert!(store.store("../fuga.png", b"x").is_err());
        assert!(store.store("/etc/passwd", b"x").is_err());
        assert!(store.store("", b"x").is_err());
    }
}
