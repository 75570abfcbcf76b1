//! Provenance: the origin of scanned content (spec §3, glossary).
//!
//! Represented as a tagged variant per spec §9's design note ("Subclass-style
//! variants for provenance and SPDX expressions: represent as tagged
//! variants... except `storage_key()` on provenance, which is well-modelled
//! as a capability trait").

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The origin of a scan result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// No specific origin is known.
    Unknown,
    /// A downloaded source artifact (e.g. a tarball).
    Artifact { url: String, hash: String },
    /// A VCS checkout.
    Repository {
        vcs_type: String,
        url: String,
        revision: String,
        resolved_revision: String,
        /// Sub-path within the repository this provenance refers to, if any.
        path: String,
    },
}

impl Provenance {
    /// A fresh artifact provenance.
    pub fn artifact(url: impl Into<String>, hash: impl Into<String>) -> Self {
        Self::Artifact {
            url: url.into(),
            hash: hash.into(),
        }
    }

    /// A fresh repository provenance.
    pub fn repository(
        vcs_type: impl Into<String>,
        url: impl Into<String>,
        revision: impl Into<String>,
        resolved_revision: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Repository {
            vcs_type: vcs_type.into(),
            url: url.into(),
            revision: revision.into(),
            resolved_revision: resolved_revision.into(),
            path: path.into(),
        }
    }

    /// The VCS-relative subdirectory this provenance points at, used to
    /// refine curations/excludes without re-scanning (spec §4.6) and to
    /// anchor `resolve_license_files` (spec §4.7).
    pub fn vcs_path(&self) -> &str {
        match self {
            Self::Repository { path, .. } => path,
            Self::Unknown | Self::Artifact { .. } => "",
        }
    }

    /// A stable sort key used for deterministic iteration order (spec §5:
    /// "by provenance storage key"). `Unknown` sorts before any known
    /// provenance since it carries no storage key of its own.
    fn sort_key(&self) -> String {
        match self.storage_key() {
            Some(key) => key,
            None => String::new(),
        }
    }
}

impl PartialOrd for Provenance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Provenance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage_key() {
            Some(key) => write!(f, "{key}"),
            None => write!(f, "unknown"),
        }
    }
}

/// Capability trait producing a stable storage key for a provenance,
/// modelled as a trait per spec §9 rather than as an inherent method on a
/// base class, since only known provenances have one.
pub trait StorageKey {
    /// A stable storage key, or `None` for [`Provenance::Unknown`] (spec §3).
    fn storage_key(&self) -> Option<String>;
}

impl StorageKey for Provenance {
    fn storage_key(&self) -> Option<String> {
        match self {
            Self::Unknown => None,
            Self::Artifact { url, hash } => Some(format!("source-artifact|{url}|{hash}")),
            Self::Repository {
                vcs_type,
                url,
                resolved_revision,
                ..
            } => {
                // Trailing pipe preserved for back-compatibility with earlier
                // schemas, per spec §3.
                Some(format!("vcs|{vcs_type}|{url}|{resolved_revision}|"))
            }
        }
    }
}

impl Provenance {
    /// `SHA-1(storage_key)`, hex-encoded, as used to key the
    /// `ProvenanceFileStorage` backing a [`crate::provider::FileArchiver`]
    /// (spec §6). The trailing pipe of a repository storage key is part of
    /// the hash input, per spec §6.
    pub fn storage_hash(&self) -> Option<String> {
        use sha1::{Digest, Sha1};
        self.storage_key().map(|key| {
            let mut hasher = Sha1::new();
            hasher.update(key.as_bytes());
            hex_encode(&hasher.finalize())
        })
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_has_no_storage_key() {
        assert_eq!(Provenance::Unknown.storage_key(), None);
        assert_eq!(Provenance::Unknown.storage_hash(), None);
    }

    #[test]
    fn artifact_storage_key_matches_spec_format() {
        let p = Provenance::artifact("https://example.com/a.tar.gz", "abc123");
        assert_eq!(
            p.storage_key().unwrap(),
            "source-artifact|https://example.com/a.tar.gz|abc123"
        );
    }

    #[test]
    fn repository_storage_key_keeps_trailing_pipe() {
        let p = Provenance::repository("git", "https://example.com/repo.git", "main", "deadbeef", "sub/dir");
        assert_eq!(
            p.storage_key().unwrap(),
            "vcs|git|https://example.com/repo.git|deadbeef|"
        );
    }

    #[test]
    fn storage_hash_is_sha1_hex_of_storage_key() {
        let p = Provenance::artifact("u", "h");
        let hash = p.storage_hash().unwrap();
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn unknown_sorts_before_known_provenances() {
        let mut provenances = vec![
            Provenance::artifact("u", "h"),
            Provenance::Unknown,
            Provenance::repository("git", "u", "r", "rr", ""),
        ];
        provenances.sort();
        assert_eq!(provenances[0], Provenance::Unknown);
    }
}
