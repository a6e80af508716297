//! CLI module for pidgan
//!
//! Command handlers and output helpers for the `pidgan` binary.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

pub use crate::config::Cli;
