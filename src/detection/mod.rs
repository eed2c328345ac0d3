//! Detection engines: signature denylist and feature heuristics.

pub mod classifier;
pub mod denylist;
pub mod entropy;

pub use classifier::{ClassifierOutcome, FeatureClassifier, LogisticModel, ThreatModel};
pub use denylist::SignatureDenylist;
