//! Append-only log of enforcement actions taken against processes.

use crate::core::error::{Error, Result};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only action log.
///
/// Each termination gets one line: an RFC 3339 timestamp followed by the
/// lowercased process name. The file handle is shared behind a mutex so
/// concurrent sweeps append whole lines.
pub struct ActionLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ActionLog {
    /// Open the action log for appending, creating it if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::ActionLogWrite {
                path: path.clone(),
                source: e,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a terminated process.
    pub fn record_termination(&self, name: &str) -> Result<()> {
        let line = format!(
            "{} Terminated suspected malware: {}\n",
            Utc::now().to_rfc3339(),
            name.to_lowercase()
        );

        let mut file = self.file.lock().map_err(|_| Error::Io(
            "action log mutex poisoned".to_string(),
        ))?;
        file.write_all(line.as_bytes())
            .map_err(|e| Error::ActionLogWrite {
                path: self.path.clone(),
                source: e,
            })?;
        file.flush().map_err(|e| Error::ActionLogWrite {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}
