//! File scanner: signature lookup, heuristic scoring, quarantine.
//!
//! One scan reads the file once, checks the content digest against the
//! denylist, then (when a model is configured) scores the derived feature
//! vector. A blocked verdict relocates the file before the report is
//! returned, so the quarantine invariant holds by the time the caller sees
//! the verdict.

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{ScanReport, Verdict};
use crate::detection::classifier::{ClassifierOutcome, FeatureClassifier, LogisticModel};
use crate::detection::denylist::SignatureDenylist;
use crate::quarantine::Quarantine;
use crate::utils::hash;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Orchestrates signature and heuristic checks against a file path.
pub struct FileScanner {
    denylist: Arc<SignatureDenylist>,
    classifier: FeatureClassifier,
    quarantine: Quarantine,
}

impl FileScanner {
    /// Build a scanner from configuration.
    ///
    /// Loads the denylist (file-backed or built-in) and the classifier model
    /// when one is configured; a missing model path is a normal setup, not
    /// an error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let denylist = match config.detection.denylist_path {
            Some(ref path) => SignatureDenylist::load(path)?,
            None => SignatureDenylist::builtin(),
        };

        let classifier = match config.detection.model_path {
            Some(ref path) => {
                let model = LogisticModel::load(path)?;
                log::debug!("Classifier model loaded from {}", path.display());
                FeatureClassifier::new(Box::new(model))
            }
            None => {
                log::debug!("No classifier model configured, heuristic stage disabled");
                FeatureClassifier::disabled()
            }
        }
        .with_threshold(config.detection.threat_threshold);

        Ok(Self::new(
            Arc::new(denylist),
            classifier,
            Quarantine::new(config.quarantine.dir()),
        ))
    }

    /// Build a scanner from explicit parts.
    pub fn new(
        denylist: Arc<SignatureDenylist>,
        classifier: FeatureClassifier,
        quarantine: Quarantine,
    ) -> Self {
        Self {
            denylist,
            classifier,
            quarantine,
        }
    }

    /// Whether the heuristic stage will run.
    pub fn classifier_available(&self) -> bool {
        self.classifier.is_available()
    }

    /// Scan a file and quarantine it on a blocked verdict.
    ///
    /// Read and relocation failures surface as errors, never as verdicts.
    pub fn scan(&self, path: &Path) -> Result<ScanReport> {
        let content = fs::read(path).map_err(|e| Error::file_read(path, e))?;

        let digests = hash::digest_bytes(&content);
        let mut report = ScanReport::new(
            path.to_path_buf(),
            digests.sha256.clone(),
            content.len() as u64,
        );

        if self.denylist.matches(&digests) {
            log::warn!(
                "Signature match for {} (sha256 {})",
                path.display(),
                digests.sha256
            );
            report.verdict = Verdict::BlockedSignature;
            report.quarantined_to = Some(self.quarantine.isolate(path)?);
            return Ok(report);
        }

        let features = FeatureClassifier::extract_features(&content);
        report.features = Some(features);

        match self.classifier.classify(&features)? {
            ClassifierOutcome::Unavailable => {
                // Distinct from "model says safe": probability stays None
                log::debug!("{}: no classifier, signature stage only", path.display());
            }
            ClassifierOutcome::Scored {
                probability,
                malicious,
            } => {
                report.threat_probability = Some(probability);
                if malicious {
                    log::warn!(
                        "Heuristic block for {} (p={:.3})",
                        path.display(),
                        probability
                    );
                    report.verdict = Verdict::BlockedHeuristic;
                    report.quarantined_to = Some(self.quarantine.isolate(path)?);
                    return Ok(report);
                }
            }
        }

        log::debug!("{}: safe", path.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FeatureVector;
    use crate::detection::classifier::ThreatModel;
    use std::fs;
    use tempfile::TempDir;

    struct FixedModel(f64);

    impl ThreatModel for FixedModel {
        fn predict_threat_probability(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn scanner_with(
        tmp: &TempDir,
        denylist: SignatureDenylist,
        classifier: FeatureClassifier,
    ) -> FileScanner {
        FileScanner::new(
            Arc::new(denylist),
            classifier,
            Quarantine::new(tmp.path().join("quarantined_files")),
        )
    }

    fn write_sample(tmp: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_signature_match_quarantines() {
        let tmp = TempDir::new().unwrap();
        let content = b"known bad payload";
        let digests = hash::digest_bytes(content);

        let mut denylist = SignatureDenylist::empty();
        denylist.insert_sha256(&digests.sha256);

        let scanner = scanner_with(&tmp, denylist, FeatureClassifier::disabled());
        let path = write_sample(&tmp, "bad.bin", content);

        let report = scanner.scan(&path).unwrap();
        assert_eq!(report.verdict, Verdict::BlockedSignature);
        assert!(!path.exists());

        let dest = report.quarantined_to.unwrap();
        assert_eq!(dest, tmp.path().join("quarantined_files").join("bad.bin"));
        assert!(dest.exists());
    }

    #[test]
    fn test_clean_file_without_classifier_is_safe() {
        let tmp = TempDir::new().unwrap();
        let scanner = scanner_with(
            &tmp,
            SignatureDenylist::empty(),
            FeatureClassifier::disabled(),
        );
        let path = write_sample(&tmp, "clean.txt", b"nothing to see here");

        let report = scanner.scan(&path).unwrap();
        assert_eq!(report.verdict, Verdict::Safe);
        assert!(report.threat_probability.is_none());
        assert!(report.quarantined_to.is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_heuristic_block_relocates() {
        let tmp = TempDir::new().unwrap();
        let scanner = scanner_with(
            &tmp,
            SignatureDenylist::empty(),
            FeatureClassifier::new(Box::new(FixedModel(0.90))),
        );
        let path = write_sample(&tmp, "packed.bin", b"\x00\x01\x02high entropy stand-in");

        let report = scanner.scan(&path).unwrap();
        assert_eq!(report.verdict, Verdict::BlockedHeuristic);
        assert_eq!(report.threat_probability, Some(0.90));
        assert!(!path.exists());
        assert!(report.quarantined_to.unwrap().exists());
    }

    #[test]
    fn test_heuristic_below_threshold_is_safe() {
        let tmp = TempDir::new().unwrap();
        let scanner = scanner_with(
            &tmp,
            SignatureDenylist::empty(),
            FeatureClassifier::new(Box::new(FixedModel(0.50))),
        );
        let path = write_sample(&tmp, "fine.bin", b"ordinary content");

        let report = scanner.scan(&path).unwrap();
        assert_eq!(report.verdict, Verdict::Safe);
        assert_eq!(report.threat_probability, Some(0.50));
        assert!(path.exists());
    }

    #[test]
    fn test_missing_path_is_error_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let scanner = scanner_with(
            &tmp,
            SignatureDenylist::builtin(),
            FeatureClassifier::disabled(),
        );

        let result = scanner.scan(&tmp.path().join("nope.bin"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
        // No quarantine directory appears on an errored scan
        assert!(!tmp.path().join("quarantined_files").exists());
    }

    #[test]
    fn test_safe_scan_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let scanner = scanner_with(
            &tmp,
            SignatureDenylist::empty(),
            FeatureClassifier::disabled(),
        );
        let path = write_sample(&tmp, "stable.txt", b"same bytes");

        let first = scanner.scan(&path).unwrap();
        let second = scanner.scan(&path).unwrap();
        assert_eq!(first.verdict, Verdict::Safe);
        assert_eq!(second.verdict, Verdict::Safe);
        assert_eq!(first.sha256, second.sha256);
        assert!(path.exists());
    }

    #[test]
    fn test_signature_takes_priority_over_heuristic() {
        let tmp = TempDir::new().unwrap();
        let content = b"listed and also scored";
        let digests = hash::digest_bytes(content);

        let mut denylist = SignatureDenylist::empty();
        denylist.insert_sha256(&digests.sha256);

        let scanner = scanner_with(
            &tmp,
            denylist,
            FeatureClassifier::new(Box::new(FixedModel(0.99))),
        );
        let path = write_sample(&tmp, "both.bin", content);

        let report = scanner.scan(&path).unwrap();
        assert_eq!(report.verdict, Verdict::BlockedSignature);
        // Heuristic stage never ran
        assert!(report.threat_probability.is_none());
        assert!(report.features.is_none());
    }
}
