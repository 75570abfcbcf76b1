//! Reference trait implementations used by this crate's own tests and
//! available to callers writing their own.

use crate::model::{Identifier, LicenseInfo, Provenance};
use crate::provider::{FileArchiver, LicenseInfoProvider};
use crate::{LicenseResolverError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// An in-memory [`LicenseInfoProvider`] backed by a plain map, for tests and
/// small scripted callers that already have every package's license info in
/// hand.
#[derive(Debug, Default)]
pub struct InMemoryLicenseInfoProvider {
    entries: RwLock<HashMap<Identifier, LicenseInfo>>,
}

impl InMemoryLicenseInfoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Identifier, info: LicenseInfo) {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(id, info);
    }
}

impl LicenseInfoProvider for InMemoryLicenseInfoProvider {
    fn get(&self, id: &Identifier) -> Result<LicenseInfo> {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| LicenseResolverError::unknown_package(id))
    }
}

/// A [`FileArchiver`] that copies a package's source tree out of a local
/// directory tree keyed by [`Provenance::storage_key`], for tests that
/// stage fixture files on disk instead of fetching a real archive.
#[derive(Debug, Clone)]
pub struct FsFileArchiver {
    root: std::path::PathBuf,
}

impl FsFileArchiver {
    /// `root` must contain one subdirectory per provenance, named by
    /// [`crate::model::StorageKey::storage_key`] with `/` replaced by `_`.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileArchiver for FsFileArchiver {
    fn unpack(&self, provenance: &Provenance, destination: &Path) -> Result<()> {
        use crate::model::StorageKey;
        let key = provenance
            .storage_key()
            .ok_or_else(|| LicenseResolverError::config("cannot archive an Unknown provenance"))?
            .replace('/', "_");
        let source = self.root.join(key);
        copy_dir_recursive(&source, destination)
    }
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<()> {
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_provider_round_trips_inserted_info() {
        let mut provider = InMemoryLicenseInfoProvider::new();
        let id = Identifier::new("Cargo", "", "demo", "1.0");
        provider.insert(id.clone(), LicenseInfo::default());
        assert!(provider.get(&id).is_ok());
    }

    #[test]
    fn in_memory_provider_errors_for_unknown_id() {
        let provider = InMemoryLicenseInfoProvider::new();
        let id = Identifier::new("Cargo", "", "missing", "1.0");
        assert!(provider.get(&id).is_err());
    }

    #[test]
    fn fs_archiver_copies_directory_tree() {
        let temp = tempfile::tempdir().unwrap();
        let source_root = temp.path().join("archives");
        let provenance = Provenance::artifact("https://example.com/demo.tar.gz", "abc123");
        let key = {
            use crate::model::StorageKey;
            provenance.storage_key().unwrap().replace('/', "_")
        };
        let package_dir = source_root.join(&key);
        std::fs::create_dir_all(package_dir.join("src")).unwrap();
        std::fs::write(package_dir.join("LICENSE"), b"MIT").unwrap();
        std::fs::write(package_dir.join("src/lib.rs"), b"// code").unwrap();

        let archiver = FsFileArchiver::new(source_root);
        let destination = temp.path().join("out");
        std::fs::create_dir_all(&destination).unwrap();
        archiver.unpack(&provenance, &destination).unwrap();

        assert!(destination.join("LICENSE").exists());
        assert!(destination.join("src/lib.rs").exists());
    }
}
