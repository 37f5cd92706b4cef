//! Media store contract.

use std::io;

/// Blob storage for scenario media files.
///
/// The store gives no atomicity guarantee; callers order their calls so that
/// database state is committed before any media is written or removed.
pub trait MediaStore {
    /// Store `bytes` under `name`, returning the name actually used.
    fn store(&self, name: &str, bytes: &[u8]) -> io::Result<String>;

    /// Remove the named files. Missing files count as already removed.
    fn delete(&self, names: &[String]) -> io::Result<()>;
}
