//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_spec, validate_spec, DataSpec, RunSpec, TrainArgs, TrainerKind};
use crate::data::{gradient_images, load_json};
use crate::error::Result;
use crate::model::{ConvGrowingBuilder, DenseGanBuilder, ModelPair};
use crate::train::{CheckpointContext, GanTrainer, ProgressiveTrainer, TrainingHistory};
use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Materialise the samples a run spec points at
pub fn load_dataset(data: &DataSpec) -> Result<ArrayD<f32>> {
    match data {
        DataSpec::Synthetic { samples, side, channels, seed } => {
            let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));
            Ok(gradient_images(&mut rng, *samples, *side, *channels))
        }
        DataSpec::Json { path } => load_json(path),
    }
}

fn parameter_summary(models: Option<&ModelPair>) -> String {
    models.map_or_else(String::new, |m| {
        format!(
            "  Generator parameters: {}\n  Discriminator parameters: {}",
            m.generator.num_parameters(),
            m.discriminator.num_parameters()
        )
    })
}

fn final_line(ctx: &CheckpointContext) -> String {
    let best = ctx.best_metric.map_or_else(|| "n/a".to_string(), |m| format!("{m:.4}"));
    format!(
        "Finished {} epochs at stage {}: D loss {:.4}, G loss {:.4}, best metric {best}",
        ctx.epochs, ctx.stage, ctx.d_loss, ctx.g_loss
    )
}

/// Returns `None` for a dry run
fn train_gan(spec: &RunSpec, dataset: &ArrayD<f32>, dry_run: bool, level: LogLevel) -> Result<Option<TrainingHistory>> {
    let mut trainer = GanTrainer::new(spec.gan.clone().unwrap_or_default(), DenseGanBuilder);
    if dry_run {
        trainer.build()?;
        log(level, LogLevel::Normal, &parameter_summary(trainer.models()));
        return Ok(None);
    }
    let mut report = |ctx: &CheckpointContext| {
        if ctx.is_final {
            log(level, LogLevel::Normal, &final_line(ctx));
        }
    };
    let history = trainer.train(dataset, &spec.training.train, Some(&mut report))?;
    Ok(Some(history))
}

fn train_progressive(
    spec: &RunSpec,
    dataset: &ArrayD<f32>,
    dry_run: bool,
    level: LogLevel,
) -> Result<Option<TrainingHistory>> {
    let config = spec.progressive.clone().unwrap_or_default();
    let model_dir = config.model_dir.clone();
    let mut trainer = ProgressiveTrainer::new(config, ConvGrowingBuilder);
    if dry_run {
        trainer.build()?;
        log(
            level,
            LogLevel::Normal,
            &format!("  Stage: {}\n{}", trainer.growth().stages, parameter_summary(trainer.models())),
        );
        return Ok(None);
    }
    let mut report = |ctx: &CheckpointContext| {
        if ctx.is_final {
            log(level, LogLevel::Normal, &final_line(ctx));
        } else {
            log(level, LogLevel::Verbose, &format!("checkpoint {} at epoch {}", ctx.hist_size, ctx.epoch));
        }
    };
    let history = trainer.train(dataset, &spec.training, Some(&mut report))?;
    if let Some(dir) = model_dir {
        trainer.save(&dir)?;
        log(level, LogLevel::Normal, &format!("Models saved to {}", dir.display()));
    }
    Ok(Some(history))
}

fn run(args: &TrainArgs, level: LogLevel) -> Result<()> {
    let mut spec = load_spec(&args.config)?;
    apply_overrides(&mut spec, args);
    validate_spec(&spec)?;

    let dataset = load_dataset(&spec.data)?;
    log(level, LogLevel::Verbose, &format!("Dataset shape: {:?}", dataset.shape()));

    let history = match spec.trainer {
        TrainerKind::Gan => train_gan(&spec, &dataset, args.dry_run, level)?,
        TrainerKind::Progressive => train_progressive(&spec, &dataset, args.dry_run, level)?,
    };
    if let (Some(history), Some(path)) = (history, &spec.history) {
        history.save_json(path)?;
        log(level, LogLevel::Normal, &format!("History written to {}", path.display()));
    }
    Ok(())
}

pub fn run_train(args: TrainArgs, level: LogLevel) -> std::result::Result<(), String> {
    log(level, LogLevel::Normal, &format!("Training from: {}", args.config.display()));
    run(&args, level).map_err(|e| format!("Training failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_spec;
    use std::fs;

    #[test]
    fn test_load_synthetic_dataset() {
        let data = DataSpec::Synthetic { samples: 5, side: 4, channels: 2, seed: Some(1) };
        let images = load_dataset(&data).unwrap();
        assert_eq!(images.shape(), &[5, 4, 4, 2]);
        assert_eq!(load_dataset(&data).unwrap(), images);
    }

    #[test]
    fn test_load_missing_json_dataset() {
        let data = DataSpec::Json { path: "/nonexistent/data.json".into() };
        assert!(load_dataset(&data).is_err());
    }

    #[test]
    fn test_train_progressive_spec_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            r"
trainer: progressive
progressive:
  image_shape: [8, 8, 1]
  latent_dim: 2
  channels: 2
  metric_samples: 8
  seed: 3
  model_dir: {models}
training:
  batch_size: 4
  epochs: 3
  checkpoint_interval: 1
  epochs_grow_rate: 2
  verbose: false
data:
  source: synthetic
  samples: 16
  side: 8
  channels: 1
  seed: 4
history: {history}
",
            models = dir.path().join("models").display(),
            history = dir.path().join("history.json").display(),
        );
        let config = dir.path().join("run.yaml");
        fs::write(&config, yaml).unwrap();
        assert!(parse_spec(&fs::read_to_string(&config).unwrap()).is_ok());

        let args = TrainArgs { config, epochs: None, batch_size: None, history: None, seed: None, dry_run: false };
        run_train(args, LogLevel::Quiet).unwrap();

        let history: TrainingHistory =
            serde_json::from_str(&fs::read_to_string(dir.path().join("history.json")).unwrap()).unwrap();
        assert_eq!(history.hist_size(), 3);
        assert!(dir.path().join("models").join(crate::model::GENERATOR_FILE).is_file());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let history = dir.path().join("history.json");
        let config = dir.path().join("run.yaml");
        fs::write(
            &config,
            format!(
                "gan:\n  input_shape: [4, 4, 1]\n  latent_dim: 2\ndata:\n  source: synthetic\n  samples: 8\n  side: 4\n  channels: 1\nhistory: {}\n",
                history.display()
            ),
        )
        .unwrap();
        let args = TrainArgs { config, epochs: None, batch_size: None, history: None, seed: Some(1), dry_run: true };
        run_train(args, LogLevel::Quiet).unwrap();
        assert!(!history.exists());
    }

    #[test]
    fn test_bad_config_reports_error() {
        let args = TrainArgs {
            config: "/nonexistent/run.yaml".into(),
            epochs: None,
            batch_size: None,
            history: None,
            seed: None,
            dry_run: false,
        };
        let err = run_train(args, LogLevel::Quiet).unwrap_err();
        assert!(err.starts_with("Training failed"));
    }
}
