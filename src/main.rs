//! Contienda CLI
//!
//! # Usage
//!
//! ```bash
//! # Train from a run spec
//! contienda train run.yaml
//!
//! # Train with overrides
//! contienda train run.yaml --epochs 500 --history out/history.json
//!
//! # Validate a run spec
//! contienda validate run.yaml --detailed
//!
//! # Show a run spec with defaults filled in
//! contienda info run.yaml --format yaml
//! ```

use clap::Parser;
use contienda::cli::{run_command, Cli, LogLevel};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter())))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
