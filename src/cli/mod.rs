//! CLI command handlers

mod commands;
mod logging;

pub use commands::{load_dataset, run_command};
pub use logging::LogLevel;

pub use crate::config::Cli;
