//! Quarantine: relocating blocked files out of their original location.
//!
//! The move is rename-first for atomicity, with a copy-verify-delete
//! fallback across filesystems; the source is never removed without a
//! confirmed copy. Name collisions get a numeric suffix instead of
//! overwriting an existing quarantined file.

use crate::core::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Quarantine directory manager.
#[derive(Debug, Clone)]
pub struct Quarantine {
    dir: PathBuf,
}

impl Quarantine {
    /// Create a quarantine rooted at the given directory.
    ///
    /// The directory is created lazily on first isolation, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The quarantine directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Move a file into the quarantine directory, preserving its base name.
    ///
    /// Returns the destination path. The operation either completes fully or
    /// leaves the source untouched.
    pub fn isolate(&self, path: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::DirectoryAccess {
            path: self.dir.clone(),
            source: e,
        })?;

        let basename = path
            .file_name()
            .ok_or_else(|| Error::quarantine(path, "path has no file name"))?;

        let dest = self.unique_destination(basename);
        self.safe_move(path, &dest)?;

        log::info!(
            "Quarantined {} -> {}",
            path.display(),
            dest.display()
        );
        Ok(dest)
    }

    /// Pick a destination that does not collide with an existing item.
    ///
    /// `name`, then `name.1`, `name.2`, and so on.
    fn unique_destination(&self, basename: &std::ffi::OsStr) -> PathBuf {
        let candidate = self.dir.join(basename);
        if !candidate.exists() {
            return candidate;
        }

        let mut counter = 1u32;
        loop {
            let mut suffixed = basename.to_os_string();
            suffixed.push(format!(".{}", counter));
            let candidate = self.dir.join(&suffixed);
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Move a file with rename-first, copy-then-delete fallback.
    fn safe_move(&self, source: &Path, dest: &Path) -> Result<()> {
        // Fast path: atomic rename on the same filesystem
        if fs::rename(source, dest).is_ok() {
            return Ok(());
        }

        fs::copy(source, dest)
            .map_err(|e| Error::quarantine(source, format!("copy failed: {}", e)))?;

        // Verify before removing the source
        let source_size = fs::metadata(source)
            .map_err(|e| Error::file_read(source, e))?
            .len();
        let dest_size = fs::metadata(dest)
            .map_err(|e| Error::file_read(dest, e))?
            .len();

        if source_size != dest_size {
            let _ = fs::remove_file(dest);
            return Err(Error::quarantine(source, "copy verification failed"));
        }

        fs::remove_file(source)
            .map_err(|e| Error::quarantine(source, format!("failed to remove original: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_isolate_moves_file() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("sample.bin");
        fs::write(&source, b"payload").unwrap();

        let quarantine = Quarantine::new(tmp.path().join("vault"));
        let dest = quarantine.isolate(&source).unwrap();

        assert!(!source.exists());
        assert!(dest.exists());
        assert_eq!(dest, tmp.path().join("vault").join("sample.bin"));
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_isolate_creates_dir_idempotently() {
        let tmp = TempDir::new().unwrap();
        let vault = tmp.path().join("vault");
        let quarantine = Quarantine::new(&vault);

        for i in 0..2 {
            let source = tmp.path().join(format!("file{}.bin", i));
            fs::write(&source, b"x").unwrap();
            quarantine.isolate(&source).unwrap();
        }

        assert!(vault.is_dir());
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let tmp = TempDir::new().unwrap();
        let vault = tmp.path().join("vault");
        let quarantine = Quarantine::new(&vault);

        let first = tmp.path().join("a").join("same.bin");
        let second = tmp.path().join("b").join("same.bin");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, b"one").unwrap();
        fs::write(&second, b"two").unwrap();

        let d1 = quarantine.isolate(&first).unwrap();
        let d2 = quarantine.isolate(&second).unwrap();

        assert_eq!(d1, vault.join("same.bin"));
        assert_eq!(d2, vault.join("same.bin.1"));
        assert_eq!(fs::read(&d1).unwrap(), b"one");
        assert_eq!(fs::read(&d2).unwrap(), b"two");
    }

    #[test]
    fn test_isolate_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let quarantine = Quarantine::new(tmp.path().join("vault"));

        let result = quarantine.isolate(&tmp.path().join("gone.bin"));
        assert!(result.is_err());
    }
}
