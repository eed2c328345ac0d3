//! Feature-based threat classification.
//!
//! Derives a [`FeatureVector`] (size, entropy, printable ratio) from file
//! content and asks an externally supplied binary model for a threat
//! probability. The model is injected at construction; running without one
//! is a valid configuration, reported as [`ClassifierOutcome::Unavailable`]
//! rather than as safety or as an error.

use crate::core::error::{Error, Result};
use crate::core::types::FeatureVector;
use crate::detection::entropy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Probability above which content is classified as malicious.
pub const DEFAULT_THREAT_THRESHOLD: f64 = 0.85;

/// A pre-trained binary classifier over file features.
///
/// Implementations return a probability in [0, 1] that the content is
/// malicious. The model artifact itself (training, serialization format) is
/// external to this crate.
pub trait ThreatModel: Send + Sync {
    /// Estimate the probability that content with these features is malicious.
    fn predict_threat_probability(&self, features: &FeatureVector) -> Result<f64>;
}

/// Result of the heuristic stage for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifierOutcome {
    /// No model is configured; callers must not read this as "safe"
    Unavailable,
    /// The model produced a probability
    Scored {
        /// Threat probability in [0, 1]
        probability: f64,
        /// Whether the probability exceeded the threshold
        malicious: bool,
    },
}

impl ClassifierOutcome {
    /// The probability, when the model ran.
    pub fn probability(&self) -> Option<f64> {
        match self {
            ClassifierOutcome::Unavailable => None,
            ClassifierOutcome::Scored { probability, .. } => Some(*probability),
        }
    }

    /// Whether this outcome classifies the content as malicious.
    pub fn is_malicious(&self) -> bool {
        matches!(self, ClassifierOutcome::Scored { malicious: true, .. })
    }
}

/// Feature extraction plus optional model scoring.
pub struct FeatureClassifier {
    model: Option<Box<dyn ThreatModel>>,
    threshold: f64,
}

impl FeatureClassifier {
    /// Create a classifier with no model; every buffer scores `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            model: None,
            threshold: DEFAULT_THREAT_THRESHOLD,
        }
    }

    /// Create a classifier backed by the given model.
    pub fn new(model: Box<dyn ThreatModel>) -> Self {
        Self {
            model: Some(model),
            threshold: DEFAULT_THREAT_THRESHOLD,
        }
    }

    /// Set the malicious-probability threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Whether a model is configured.
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Derive the feature vector for a byte buffer.
    pub fn extract_features(data: &[u8]) -> FeatureVector {
        FeatureVector {
            size: data.len() as u64,
            entropy: entropy::shannon_entropy(data),
            printable_ratio: entropy::printable_ratio(data),
        }
    }

    /// Score a feature vector against the configured model, if any.
    pub fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutcome> {
        let model = match self.model {
            Some(ref m) => m,
            None => return Ok(ClassifierOutcome::Unavailable),
        };

        let probability = model.predict_threat_probability(features)?;
        if !probability.is_finite() {
            return Err(Error::ModelInference(format!(
                "model returned non-finite probability: {}",
                probability
            )));
        }

        let probability = probability.clamp(0.0, 1.0);
        Ok(ClassifierOutcome::Scored {
            probability,
            malicious: probability > self.threshold,
        })
    }
}

/// Logistic regression over the feature vector, loadable from JSON.
///
/// A minimal stand-in for an externally trained artifact: three weights,
/// a bias, and optional per-feature normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Weights for (size, entropy, printable_ratio)
    pub weights: [f64; 3],
    /// Intercept term
    pub bias: f64,
    /// Per-feature divisors applied before the dot product
    #[serde(default = "LogisticModel::default_scale")]
    pub scale: [f64; 3],
}

impl LogisticModel {
    fn default_scale() -> [f64; 3] {
        [1.0, 1.0, 1.0]
    }

    /// Load model weights from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;

        let model: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ModelLoad(format!("Failed to parse model file: {}", e)))?;

        if model.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(Error::ModelLoad(
                "model scale values must be finite and nonzero".to_string(),
            ));
        }

        Ok(model)
    }
}

impl ThreatModel for LogisticModel {
    fn predict_threat_probability(&self, features: &FeatureVector) -> Result<f64> {
        let x = features.as_array();
        let mut z = self.bias;
        for i in 0..3 {
            z += self.weights[i] * (x[i] / self.scale[i]);
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model returning a fixed probability, for exercising the threshold.
    pub(crate) struct FixedModel(pub f64);

    impl ThreatModel for FixedModel {
        fn predict_threat_probability(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_extract_features() {
        let fv = FeatureClassifier::extract_features(b"hello");
        assert_eq!(fv.size, 5);
        assert_eq!(fv.printable_ratio, 1.0);
        assert!(fv.entropy > 0.0 && fv.entropy <= 8.0);
    }

    #[test]
    fn test_extract_features_empty() {
        let fv = FeatureClassifier::extract_features(b"");
        assert_eq!(fv.size, 0);
        assert_eq!(fv.entropy, 0.0);
        assert_eq!(fv.printable_ratio, 0.0);
    }

    #[test]
    fn test_unavailable_without_model() {
        let classifier = FeatureClassifier::disabled();
        let fv = FeatureClassifier::extract_features(b"anything");
        let outcome = classifier.classify(&fv).unwrap();
        assert_eq!(outcome, ClassifierOutcome::Unavailable);
        assert!(!outcome.is_malicious());
        assert!(outcome.probability().is_none());
    }

    #[test]
    fn test_threshold_boundary() {
        let fv = FeatureClassifier::extract_features(b"x");

        let hot = FeatureClassifier::new(Box::new(FixedModel(0.90)));
        assert!(hot.classify(&fv).unwrap().is_malicious());

        let cold = FeatureClassifier::new(Box::new(FixedModel(0.50)));
        assert!(!cold.classify(&fv).unwrap().is_malicious());

        // Threshold is strict: exactly 0.85 is not malicious
        let edge = FeatureClassifier::new(Box::new(FixedModel(0.85)));
        assert!(!edge.classify(&fv).unwrap().is_malicious());
    }

    #[test]
    fn test_custom_threshold() {
        let fv = FeatureClassifier::extract_features(b"x");
        let classifier = FeatureClassifier::new(Box::new(FixedModel(0.6))).with_threshold(0.5);
        assert!(classifier.classify(&fv).unwrap().is_malicious());
    }

    #[test]
    fn test_non_finite_probability_is_error() {
        let fv = FeatureClassifier::extract_features(b"x");
        let classifier = FeatureClassifier::new(Box::new(FixedModel(f64::NAN)));
        assert!(matches!(
            classifier.classify(&fv),
            Err(Error::ModelInference(_))
        ));
    }

    #[test]
    fn test_logistic_model() {
        let model = LogisticModel {
            weights: [0.0, 1.0, 0.0],
            bias: -6.5,
            scale: [1.0, 1.0, 1.0],
        };

        // Low entropy: probability well under 0.5
        let low = FeatureVector {
            size: 100,
            entropy: 1.0,
            printable_ratio: 0.5,
        };
        assert!(model.predict_threat_probability(&low).unwrap() < 0.5);

        // Near-max entropy: probability well over 0.5
        let high = FeatureVector {
            size: 100,
            entropy: 7.9,
            printable_ratio: 0.5,
        };
        assert!(model.predict_threat_probability(&high).unwrap() > 0.5);
    }

    #[test]
    fn test_logistic_model_roundtrip() {
        let model = LogisticModel {
            weights: [0.1, 0.2, -0.3],
            bias: 0.5,
            scale: [1024.0, 8.0, 1.0],
        };
        let json = serde_json::to_string(&model).unwrap();
        let parsed: LogisticModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.weights, model.weights);
        assert_eq!(parsed.scale, model.scale);
    }
}
