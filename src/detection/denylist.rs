//! Signature denylist: exact digest membership for known-bad content.
//!
//! The denylist is loaded once at startup and never mutated afterward, so it
//! can be shared across any number of concurrent scans without locking.
//! SHA-256 is the primary digest; MD5 entries are accepted for legacy feeds.

use crate::core::error::{Error, Result};
use crate::utils::hash::ContentDigests;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// EICAR test file SHA256 hash.
///
/// The industry-standard harmless test file; shipping it built in lets the
/// scanner be verified end to end without a signature feed.
pub const EICAR_SHA256: &str = "275a021bbfb6489e54d471899f7db9d1663fc695ec2fe2a2c4538aabf651fd0f";

/// EICAR test file MD5 hash.
pub const EICAR_MD5: &str = "44d88612fea8a8f36de82e1278abb02f";

/// Immutable set of known-malicious content digests.
#[derive(Debug, Clone, Default)]
pub struct SignatureDenylist {
    sha256: HashSet<String>,
    md5: HashSet<String>,
}

impl SignatureDenylist {
    /// Create an empty denylist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a denylist with the built-in entries (EICAR test file).
    pub fn builtin() -> Self {
        let mut list = Self::default();
        list.insert_sha256(EICAR_SHA256);
        list.insert_md5(EICAR_MD5);
        list
    }

    /// Load a denylist from a JSON file, merged over the built-in entries.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::DenylistLoad(format!("{}: {}", path.display(), e)))?;

        let file: DenylistFile = serde_json::from_str(&contents)
            .map_err(|e| Error::DenylistLoad(format!("Failed to parse denylist: {}", e)))?;

        let mut list = Self::builtin();
        for hash in file.sha256 {
            list.insert_sha256(&hash);
        }
        for hash in file.md5 {
            list.insert_md5(&hash);
        }

        log::debug!(
            "Loaded denylist from {}: {} entries",
            path.display(),
            list.len()
        );
        Ok(list)
    }

    /// Add a SHA-256 digest. Only used during construction.
    pub fn insert_sha256(&mut self, hash: &str) {
        self.sha256.insert(hash.to_lowercase());
    }

    /// Add an MD5 digest. Only used during construction.
    pub fn insert_md5(&mut self, hash: &str) {
        self.md5.insert(hash.to_lowercase());
    }

    /// Check a SHA-256 digest for membership (case-insensitive).
    pub fn contains_sha256(&self, hash: &str) -> bool {
        self.sha256.contains(&hash.to_lowercase())
    }

    /// Check an MD5 digest for membership (case-insensitive).
    pub fn contains_md5(&self, hash: &str) -> bool {
        self.md5.contains(&hash.to_lowercase())
    }

    /// Check content digests against the denylist.
    pub fn matches(&self, digests: &ContentDigests) -> bool {
        self.contains_sha256(&digests.sha256) || self.contains_md5(&digests.md5)
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.sha256.len() + self.md5.len()
    }

    /// Whether the denylist has no entries.
    pub fn is_empty(&self) -> bool {
        self.sha256.is_empty() && self.md5.is_empty()
    }
}

/// Denylist file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenylistFile {
    /// Feed version (e.g., "2026.08.27")
    pub version: String,
    /// Timestamp of last update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Known-bad SHA-256 digests
    #[serde(default)]
    pub sha256: Vec<String>,
    /// Known-bad MD5 digests (legacy feeds)
    #[serde(default)]
    pub md5: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// EICAR test file standard string.
    const EICAR_STRING: &str =
        "X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR-STANDARD-ANTIVIRUS-TEST-FILE!$H+H*";

    #[test]
    fn test_builtin_matches_eicar() {
        let list = SignatureDenylist::builtin();
        let digests = hash::digest_bytes(EICAR_STRING.as_bytes());
        assert!(list.matches(&digests));
    }

    #[test]
    fn test_membership_is_exact() {
        let mut list = SignatureDenylist::empty();
        let digests = hash::digest_bytes(b"malicious payload");
        list.insert_sha256(&digests.sha256);

        assert!(list.matches(&digests));

        // Changing one byte of content changes the digest and flips the match
        let other = hash::digest_bytes(b"malicious payloae");
        assert!(!list.matches(&other));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut list = SignatureDenylist::empty();
        list.insert_sha256("ABCDEF0123456789");
        assert!(list.contains_sha256("abcdef0123456789"));
        assert!(list.contains_sha256("ABCDEF0123456789"));
    }

    #[test]
    fn test_md5_legacy_entries() {
        let mut list = SignatureDenylist::empty();
        let digests = hash::digest_bytes(b"legacy sample");
        list.insert_md5(&digests.md5);
        assert!(list.matches(&digests));
    }

    #[test]
    fn test_load_from_file() {
        let digests = hash::digest_bytes(b"feed entry");
        let file = DenylistFile {
            version: "2026.08.27".to_string(),
            updated_at: None,
            sha256: vec![digests.sha256.clone()],
            md5: vec![],
        };

        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(serde_json::to_string(&file).unwrap().as_bytes())
            .unwrap();

        let list = SignatureDenylist::load(tmp.path()).unwrap();
        assert!(list.matches(&digests));
        // Built-in entries survive the merge
        assert!(list.contains_sha256(EICAR_SHA256));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SignatureDenylist::load(Path::new("/nonexistent/denylist.json"));
        assert!(matches!(result, Err(Error::DenylistLoad(_))));
    }
}
