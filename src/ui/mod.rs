//! User interface layer.

pub mod cli;
