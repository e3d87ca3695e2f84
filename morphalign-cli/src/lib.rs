//! Command-line interface for morphalign
//!
//! This library backs the `morphalign` binary: corpus discovery,
//! configuration files, progress reporting, and the subcommands driving
//! the annotation engine.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod progress;

pub use error::{CliError, CliResult};
