//! Core type definitions used throughout Filewarden.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of scanning a single file.
///
/// Operational failures are not verdicts; they travel through
/// [`crate::core::error::Error`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No signature match and no heuristic detection
    Safe,
    /// Content digest found in the signature denylist
    BlockedSignature,
    /// Classifier probability exceeded the threat threshold
    BlockedHeuristic,
}

impl Verdict {
    /// Whether this verdict requires the file to be quarantined.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::BlockedSignature | Verdict::BlockedHeuristic)
    }

    /// Get string representation for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::BlockedSignature => "blocked_signature",
            Verdict::BlockedHeuristic => "blocked_heuristic",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Safe => write!(f, "Safe"),
            Verdict::BlockedSignature => write!(f, "Blocked (signature)"),
            Verdict::BlockedHeuristic => write!(f, "Blocked (heuristic)"),
        }
    }
}

/// Statistical features derived from file content.
///
/// The ordered triple fed to a threat classifier: byte count, Shannon
/// entropy in [0, 8], and printable-ASCII ratio in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// File size in bytes
    pub size: u64,
    /// Shannon entropy of the byte distribution
    pub entropy: f64,
    /// Fraction of bytes in the printable ASCII range [32, 126]
    pub printable_ratio: f64,
}

impl FeatureVector {
    /// The features as an ordered slice, for model input.
    pub fn as_array(&self) -> [f64; 3] {
        [self.size as f64, self.entropy, self.printable_ratio]
    }
}

/// Full result of one file scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Path that was scanned (original location)
    pub path: PathBuf,
    /// Final verdict
    pub verdict: Verdict,
    /// SHA-256 digest of the content, for audit
    pub sha256: String,
    /// Content size in bytes
    pub size: u64,
    /// Derived features, when the heuristic stage ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
    /// Classifier probability; `None` means the classifier was unavailable
    /// or never reached, which is distinct from "model says safe"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_probability: Option<f64>,
    /// Where the file was relocated, when the verdict blocked it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarantined_to: Option<PathBuf>,
    /// When the scan ran
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    /// Create a report for the given path and digest, defaulting to Safe.
    pub fn new(path: PathBuf, sha256: String, size: u64) -> Self {
        Self {
            path,
            verdict: Verdict::Safe,
            sha256,
            size,
            features: None,
            threat_probability: None,
            quarantined_to: None,
            scanned_at: Utc::now(),
        }
    }

    /// One-line summary for log output.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{}: {}", self.path.display(), self.verdict)];
        if let Some(p) = self.threat_probability {
            parts.push(format!("p={:.2}", p));
        }
        if let Some(ref dest) = self.quarantined_to {
            parts.push(format!("quarantined to {}", dest.display()));
        }
        parts.join(", ")
    }
}
