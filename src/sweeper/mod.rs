//! Process sweeper: finds and terminates processes with flagged names.
//!
//! Matching is case-insensitive substring over a configurable name list.
//! A sweep records an outcome for every flagged process; one termination
//! failure never aborts the rest of the sweep.

pub mod action_log;
pub mod enumerate;

pub use action_log::ActionLog;
pub use enumerate::{ProcessInfo, SystemProcesses};

use crate::core::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Abstraction over process listing and termination.
///
/// The production implementation is [`SystemProcesses`]; tests substitute
/// a fake to exercise sweep logic without touching real processes.
pub trait ProcessControl: Send + Sync {
    /// List currently running processes.
    fn enumerate(&self) -> Result<Vec<ProcessInfo>>;

    /// Request termination of the given process.
    fn terminate(&self, pid: u32) -> TerminationStatus;
}

/// Result of a single termination attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    /// The termination request was accepted
    Terminated,
    /// The process was gone before the request landed
    NotFound,
    /// Insufficient privileges to terminate
    PermissionDenied,
    /// Any other failure, with the underlying message
    Failed(String),
}

impl TerminationStatus {
    /// Whether the process was actually terminated.
    pub fn is_terminated(&self) -> bool {
        matches!(self, TerminationStatus::Terminated)
    }
}

impl std::fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationStatus::Terminated => write!(f, "terminated"),
            TerminationStatus::NotFound => write!(f, "not found"),
            TerminationStatus::PermissionDenied => write!(f, "permission denied"),
            TerminationStatus::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Case-insensitive substring matcher over flagged process names.
#[derive(Debug, Clone)]
pub struct FlaggedNames {
    patterns: Vec<String>,
}

impl FlaggedNames {
    /// Names flagged out of the box.
    pub fn default_names() -> Vec<String> {
        ["encryptor", "ransom", "miner", "trojan", "backdoor"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Build a matcher from a pattern list. Patterns are lowercased once.
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Whether a process name contains any flagged pattern.
    pub fn matches(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.patterns.iter().any(|p| lowered.contains(p.as_str()))
    }

    /// The configured patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for FlaggedNames {
    fn default() -> Self {
        Self::new(Self::default_names())
    }
}

/// Outcome for one flagged process in a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Process ID
    pub pid: u32,
    /// Process name as enumerated
    pub name: String,
    /// What happened to it
    pub status: TerminationStatus,
}

/// Summary of one sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Unique sweep identifier
    pub sweep_id: String,
    /// When the sweep started
    pub started_at: DateTime<Utc>,
    /// How many processes were enumerated
    pub processes_seen: usize,
    /// One entry per flagged process
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    /// Number of processes actually terminated.
    pub fn terminated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_terminated())
            .count()
    }
}

/// Sweeps running processes against a flagged-name list.
pub struct ProcessSweeper {
    control: Box<dyn ProcessControl>,
    flagged: FlaggedNames,
}

impl ProcessSweeper {
    /// Create a sweeper over the given process controller and name list.
    pub fn new(control: Box<dyn ProcessControl>, flagged: FlaggedNames) -> Self {
        Self { control, flagged }
    }

    /// List flagged processes without terminating anything.
    pub fn flagged_processes(&self) -> Result<Vec<ProcessInfo>> {
        let processes = self.control.enumerate()?;
        Ok(processes
            .into_iter()
            .filter(|p| self.flagged.matches(&p.name))
            .collect())
    }

    /// Enumerate, match, and terminate flagged processes.
    ///
    /// Enumeration failure is an error; individual termination failures are
    /// recorded in the report and never abort the sweep.
    pub fn sweep(&self) -> Result<SweepReport> {
        let started_at = Utc::now();
        let processes = self.control.enumerate()?;
        let processes_seen = processes.len();

        let mut outcomes = Vec::new();
        for process in processes {
            if !self.flagged.matches(&process.name) {
                continue;
            }

            log::warn!(
                "Flagged process: {} (pid {})",
                process.name,
                process.pid
            );
            let status = self.control.terminate(process.pid);
            match &status {
                TerminationStatus::Terminated => {
                    log::info!("Terminated {} (pid {})", process.name, process.pid);
                }
                other => {
                    log::warn!(
                        "Could not terminate {} (pid {}): {}",
                        process.name,
                        process.pid,
                        other
                    );
                }
            }
            outcomes.push(SweepOutcome {
                pid: process.pid,
                name: process.name,
                status,
            });
        }

        Ok(SweepReport {
            sweep_id: Uuid::new_v4().to_string(),
            started_at,
            processes_seen,
            outcomes,
        })
    }
}
