//! Hash calculation utilities.

use crate::core::error::{Error, Result};
use md5::{Digest, Md5};
use sha2::Sha256;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Buffer size for reading files (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Content digests for denylist lookup and audit logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigests {
    /// SHA-256 hash (primary)
    pub sha256: String,
    /// MD5 hash (legacy feed compatibility)
    pub md5: String,
}

/// Calculate SHA-256 and MD5 digests of a byte buffer in one pass.
pub fn digest_bytes(data: &[u8]) -> ContentDigests {
    let mut sha256_hasher = Sha256::new();
    let mut md5_hasher = Md5::new();
    sha256_hasher.update(data);
    md5_hasher.update(data);

    ContentDigests {
        sha256: hex::encode(sha256_hasher.finalize()),
        md5: hex::encode(md5_hasher.finalize()),
    }
}

/// Calculate SHA-256 of a byte buffer.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate both digests of a file without loading it whole.
pub fn digest_file(path: &Path) -> Result<ContentDigests> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut sha256_hasher = Sha256::new();
    let mut md5_hasher = Md5::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::file_read(path, e))?;
        if bytes_read == 0 {
            break;
        }
        sha256_hasher.update(&buffer[..bytes_read]);
        md5_hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentDigests {
        sha256: hex::encode(sha256_hasher.finalize()),
        md5: hex::encode(md5_hasher.finalize()),
    })
}
