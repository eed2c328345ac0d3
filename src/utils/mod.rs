//! Shared utilities: hashing and logging.

pub mod hash;
pub mod logging;
