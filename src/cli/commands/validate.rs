//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, DataSpec, RunSpec, TrainerKind, ValidateArgs};

/// Format the model section as a string
pub fn format_model_info(spec: &RunSpec) -> String {
    match spec.trainer {
        TrainerKind::Gan => {
            let model = spec.gan.clone().unwrap_or_default();
            format!(
                "  Trainer: gan\n  Input shape: {:?}\n  Latent dim: {}\n  Objective: {}\n  Critic steps: {}",
                model.input_shape, model.latent_dim, model.objective, model.n_critic
            )
        }
        TrainerKind::Progressive => {
            let model = spec.progressive.clone().unwrap_or_default();
            let mut lines = vec![
                "  Trainer: progressive".to_string(),
                format!("  Image shape: {:?}", model.image_shape),
                format!("  Latent dim: {}", model.latent_dim),
                format!("  Channels: {}", model.channels),
            ];
            if let Some(dir) = &model.model_dir {
                lines.push(format!("  Model dir: {}", dir.display()));
            }
            lines.join("\n")
        }
    }
}

/// Format the data source as a string
pub fn format_data_info(spec: &RunSpec) -> String {
    match &spec.data {
        DataSpec::Synthetic { samples, side, channels, .. } => {
            format!("  Data: {samples} synthetic {side}x{side}x{channels} images")
        }
        DataSpec::Json { path } => format!("  Data: {}", path.display()),
    }
}

/// Format training arguments as a string
pub fn format_training_info(spec: &RunSpec) -> String {
    let train = &spec.training.train;
    let mut lines = vec![
        format!("  Epochs: {}", train.epochs),
        format!("  Batch size: {}", train.batch_size),
        format!("  Checkpoint interval: {}", train.checkpoint_interval),
    ];
    if train.validation_split > 0.0 {
        lines.push(format!("  Validation split: {}", train.validation_split));
    }
    if spec.trainer == TrainerKind::Progressive {
        lines.push(format!("  Grow every: {} epochs", spec.training.epochs_grow_rate));
        lines.push(format!("  Mode: {}", spec.training.mode));
    }
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &RunSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_model_info(spec));
    println!();
    println!("{}", format_data_info(spec));
    println!();
    println!("{}", format_training_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let spec = load_spec(&args.config).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
