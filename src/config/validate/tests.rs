//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::*;
use crate::config::schema::*;
use crate::error::Error;

fn gan_spec() -> RunSpec {
    RunSpec {
        trainer: TrainerKind::Gan,
        gan: Some(GanConfig { input_shape: vec![8, 8, 3], latent_dim: 4, ..GanConfig::default() }),
        data: DataSpec::Synthetic { samples: 100, side: 8, channels: 3, seed: Some(1) },
        ..RunSpec::default()
    }
}

fn progressive_spec() -> RunSpec {
    RunSpec {
        trainer: TrainerKind::Progressive,
        progressive: Some(ProgressiveConfig { image_shape: [8, 8, 3], ..ProgressiveConfig::default() }),
        data: DataSpec::Synthetic { samples: 100, side: 8, channels: 3, seed: None },
        ..RunSpec::default()
    }
}

#[test]
fn test_valid_specs() {
    assert!(validate_spec(&gan_spec()).is_ok());
    assert!(validate_spec(&progressive_spec()).is_ok());
}

#[test]
fn test_invalid_batch_size() {
    let mut spec = gan_spec();
    spec.training.train.batch_size = 0;
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidBatchSize(0)));
}

#[test]
fn test_invalid_checkpoint_interval() {
    let mut spec = gan_spec();
    spec.training.train.checkpoint_interval = 0;
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidCheckpointInterval(0)));
}

#[test]
fn test_nan_split() {
    let config = TrainConfig { validation_split: f32::NAN, ..TrainConfig::default() };
    assert!(matches!(validate_train(&config), Err(ValidationError::InvalidValidationSplit(_))));
}

#[test]
fn test_unknown_objective() {
    let mut spec = gan_spec();
    if let Some(gan) = spec.gan.as_mut() {
        gan.objective = "hinge".to_string();
    }
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidObjective("hinge".to_string())));
}

#[test]
fn test_unknown_mode() {
    let mut spec = progressive_spec();
    spec.training.mode = "foo".to_string();
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidMode("foo".to_string())));
}

#[test]
fn test_zero_grow_rate() {
    let mut spec = progressive_spec();
    spec.training.epochs_grow_rate = 0;
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidGrowRate(0)));
}

#[test]
fn test_non_square_image() {
    let config = ProgressiveConfig { image_shape: [8, 16, 3], ..ProgressiveConfig::default() };
    assert!(matches!(validate_progressive(&config), Err(ValidationError::InvalidImageShape(_))));
    let config = ProgressiveConfig { image_shape: [12, 12, 3], ..ProgressiveConfig::default() };
    assert!(validate_progressive(&config).is_err());
}

#[test]
fn test_data_shape_mismatch() {
    let mut spec = gan_spec();
    spec.data = DataSpec::Synthetic { samples: 10, side: 4, channels: 3, seed: None };
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidData(_))));
}

#[test]
fn test_missing_json_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = gan_spec();
    spec.data = DataSpec::Json { path: dir.path().join("missing.json") };
    match validate_spec(&spec) {
        Err(ValidationError::InvalidData(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("expected invalid data, got {other:?}"),
    }
}

#[test]
fn test_existing_json_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "[]").unwrap();
    let mut spec = gan_spec();
    spec.data = DataSpec::Json { path };
    assert!(validate_spec(&spec).is_ok());
}

#[test]
fn test_bad_optimizer() {
    let mut spec = gan_spec();
    if let Some(gan) = spec.gan.as_mut() {
        gan.optimizer.lr = -1.0;
    }
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidOptimizer(_))));
}

#[test]
fn test_converts_to_config_error() {
    let err: Error = ValidationError::InvalidBatchSize(0).into();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("batch size"));
}
