//! CLI argument parsing
//!
//! ```bash
//! contienda train run.yaml
//! contienda train run.yaml --epochs 200 --history out/history.json
//! contienda validate run.yaml
//! contienda info run.yaml --format json
//! ```

use super::schema::RunSpec;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Contienda: adversarial training of generator/discriminator pairs
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "contienda")]
#[command(version)]
#[command(about = "Train GANs and progressive-growing GANs from YAML run specs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train from a YAML run spec
    Train(TrainArgs),

    /// Validate a run spec without training
    Validate(ValidateArgs),

    /// Display a run spec with defaults filled in
    Info(InfoArgs),
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override the history output path
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Override the model seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Validate and build the networks, skip training
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Print a configuration summary after validating
    #[arg(short, long)]
    pub detailed: bool,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Parse CLI arguments (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a run spec
pub fn apply_overrides(spec: &mut RunSpec, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.train.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.training.train.batch_size = batch_size;
    }
    if let Some(history) = &args.history {
        spec.history = Some(history.clone());
    }
    if let Some(seed) = args.seed {
        match spec.trainer {
            super::TrainerKind::Gan => spec.gan.get_or_insert_with(Default::default).seed = Some(seed),
            super::TrainerKind::Progressive => {
                spec.progressive.get_or_insert_with(Default::default).seed = Some(seed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerKind;

    #[test]
    fn test_parse_train_command() {
        let cli = parse_args(["contienda", "train", "run.yaml"]).unwrap();
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.config, PathBuf::from("run.yaml"));
                assert!(!args.dry_run);
                assert_eq!(args.epochs, None);
            }
            other => panic!("expected train, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_train_overrides() {
        let cli = parse_args([
            "contienda",
            "train",
            "run.yaml",
            "--epochs",
            "50",
            "--batch-size",
            "16",
            "--history",
            "out/h.json",
            "--seed",
            "3",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.epochs, Some(50));
        assert_eq!(args.batch_size, Some(16));
        assert_eq!(args.history, Some(PathBuf::from("out/h.json")));
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn test_parse_info_format() {
        let cli = parse_args(["contienda", "info", "run.yaml", "--format", "yaml"]).unwrap();
        let Command::Info(args) = cli.command else { panic!("expected info") };
        assert_eq!(args.format, OutputFormat::Yaml);
        assert!(parse_args(["contienda", "info", "run.yaml", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_missing_config_is_an_error() {
        assert!(parse_args(["contienda", "train"]).is_err());
        assert!(parse_args(["contienda", "fly"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut spec = RunSpec { trainer: TrainerKind::Progressive, ..RunSpec::default() };
        let args = TrainArgs {
            config: PathBuf::from("run.yaml"),
            epochs: Some(7),
            batch_size: Some(4),
            history: Some(PathBuf::from("h.json")),
            seed: Some(9),
            dry_run: false,
        };
        apply_overrides(&mut spec, &args);
        assert_eq!(spec.training.train.epochs, 7);
        assert_eq!(spec.training.train.batch_size, 4);
        assert_eq!(spec.history, Some(PathBuf::from("h.json")));
        assert_eq!(spec.progressive.unwrap().seed, Some(9));
        assert!(spec.gan.is_none());
    }
}
