//! Host process listing and termination.
//!
//! Linux reads `/proc` directly; macOS shells out to `ps` and Windows to
//! `tasklist`. Termination goes through `kill`/`taskkill` and is requested,
//! not awaited.

use crate::core::error::{Error, Result};
use crate::sweeper::{ProcessControl, TerminationStatus};

/// A running process as seen by the sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: u32,
    /// Process name
    pub name: String,
}

impl ProcessInfo {
    /// Create a new process info entry.
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}

/// Process enumeration and termination backed by the host OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcesses;

impl SystemProcesses {
    /// Create a new system process controller.
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "linux")]
    fn list(&self) -> Result<Vec<ProcessInfo>> {
        use std::fs;

        let mut processes = Vec::new();

        let entries = fs::read_dir("/proc")
            .map_err(|e| Error::ProcessEnumeration(format!("cannot read /proc: {}", e)))?;

        for entry in entries.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let name_str = file_name.to_string_lossy();

            // Only numeric directories are PIDs
            if let Ok(pid) = name_str.parse::<u32>() {
                // Processes can exit between readdir and the comm read
                if let Ok(comm) = fs::read_to_string(format!("/proc/{}/comm", pid)) {
                    let name = comm.trim().to_string();
                    if !name.is_empty() {
                        processes.push(ProcessInfo::new(pid, name));
                    }
                }
            }
        }

        Ok(processes)
    }

    #[cfg(target_os = "macos")]
    fn list(&self) -> Result<Vec<ProcessInfo>> {
        use std::process::Command;

        let output = Command::new("ps")
            .args(["-axo", "pid=,comm="])
            .output()
            .map_err(|e| Error::ProcessEnumeration(format!("failed to run ps: {}", e)))?;

        if !output.status.success() {
            return Err(Error::ProcessEnumeration(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut processes = Vec::new();

        for line in stdout.lines() {
            let mut parts = line.split_whitespace();
            if let Some(pid) = parts.next().and_then(|p| p.parse::<u32>().ok()) {
                let name = parts.collect::<Vec<_>>().join(" ");
                if !name.is_empty() {
                    // ps reports the full path; keep the base name
                    let name = name.rsplit('/').next().unwrap_or(&name).to_string();
                    processes.push(ProcessInfo::new(pid, name));
                }
            }
        }

        Ok(processes)
    }

    #[cfg(target_os = "windows")]
    fn list(&self) -> Result<Vec<ProcessInfo>> {
        use std::process::Command;

        let output = Command::new("tasklist")
            .args(["/FO", "CSV", "/NH"])
            .output()
            .map_err(|e| Error::ProcessEnumeration(format!("failed to run tasklist: {}", e)))?;

        if !output.status.success() {
            return Err(Error::ProcessEnumeration(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut processes = Vec::new();

        for line in stdout.lines() {
            // CSV row: "name","pid","session name","session#","mem usage"
            let fields: Vec<&str> = line
                .split("\",\"")
                .map(|f| f.trim_matches('"'))
                .collect();
            if fields.len() >= 2 {
                if let Ok(pid) = fields[1].parse::<u32>() {
                    processes.push(ProcessInfo::new(pid, fields[0]));
                }
            }
        }

        Ok(processes)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    fn list(&self) -> Result<Vec<ProcessInfo>> {
        Err(Error::ProcessEnumeration(
            "process enumeration not supported on this platform".to_string(),
        ))
    }

    #[cfg(unix)]
    fn kill(&self, pid: u32) -> TerminationStatus {
        use std::process::Command;

        let output = match Command::new("kill").arg(pid.to_string()).output() {
            Ok(o) => o,
            Err(e) => return TerminationStatus::Failed(e.to_string()),
        };

        if output.status.success() {
            return TerminationStatus::Terminated;
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
        if stderr.contains("no such process") {
            TerminationStatus::NotFound
        } else if stderr.contains("not permitted") || stderr.contains("permission denied") {
            TerminationStatus::PermissionDenied
        } else {
            TerminationStatus::Failed(stderr.trim().to_string())
        }
    }

    #[cfg(windows)]
    fn kill(&self, pid: u32) -> TerminationStatus {
        use std::process::Command;

        let output = match Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .output()
        {
            Ok(o) => o,
            Err(e) => return TerminationStatus::Failed(e.to_string()),
        };

        if output.status.success() {
            return TerminationStatus::Terminated;
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
        if stderr.contains("not found") {
            TerminationStatus::NotFound
        } else if stderr.contains("access is denied") {
            TerminationStatus::PermissionDenied
        } else {
            TerminationStatus::Failed(stderr.trim().to_string())
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn kill(&self, _pid: u32) -> TerminationStatus {
        TerminationStatus::Failed("process termination not supported on this platform".to_string())
    }
}

impl ProcessControl for SystemProcesses {
    fn enumerate(&self) -> Result<Vec<ProcessInfo>> {
        self.list()
    }

    fn terminate(&self, pid: u32) -> TerminationStatus {
        self.kill(pid)
    }
}
