//! YAML run spec tests

use contienda::config::{load_spec, parse_spec, DataSpec, TrainerKind};
use contienda::Error;
use std::fs;

const RUN: &str = r"
trainer: progressive
progressive:
  image_shape: [8, 8, 3]
  latent_dim: 4
  channels: 2
training:
  batch_size: 16
  epochs: 10
  checkpoint_interval: 2
  validation_split: 0.2
  save_best_model: true
  epochs_grow_rate: 5
  mode: stable
data:
  source: synthetic
  samples: 100
  side: 8
  channels: 3
";

#[test]
fn load_progressive_spec() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, RUN).unwrap();

    let spec = load_spec(&path).unwrap();
    assert_eq!(spec.trainer, TrainerKind::Progressive);
    assert_eq!(spec.training.mode, "stable");
    assert_eq!(spec.training.train.batch_size, 16);
    assert!(spec.training.train.save_best_model);
    assert!(matches!(spec.data, DataSpec::Synthetic { samples: 100, .. }));
}

#[test]
fn spec_with_unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, RUN.replace("mode: stable", "mode: foo")).unwrap();
    assert!(matches!(load_spec(&path), Err(Error::Config(_))));
}

#[test]
fn spec_shape_must_match_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, RUN.replace("side: 8", "side: 16")).unwrap();
    assert!(load_spec(&path).is_err());
}

#[test]
fn empty_spec_uses_defaults() {
    let spec = parse_spec("{}").unwrap();
    assert_eq!(spec.trainer, TrainerKind::Gan);
    assert_eq!(spec.training.train.epochs, 1);
    assert!(spec.history.is_none());
}
