//! Filewarden: a small antivirus core with signature, heuristic, and
//! process-sweep stages
//!
//! This crate provides file scanning against a hash denylist, an optional
//! feature-based classifier, quarantine relocation for blocked files, and a
//! sweeper that terminates processes whose names match a flagged list.

pub mod core;
pub mod detection;
pub mod quarantine;
pub mod scanner;
pub mod sweeper;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::core::types::*;
