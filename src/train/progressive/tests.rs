//! Progressive trainer tests

use super::*;
use crate::config::TrainConfig;
use crate::data::gradient_images;
use crate::metrics::FnMetric;
use crate::nn::Weights;
use approx::assert_abs_diff_eq;
use std::cell::Cell;

const SEED: u64 = 5;

fn config() -> ProgressiveConfig {
    ProgressiveConfig {
        image_shape: [8, 8, 3],
        latent_dim: 4,
        channels: 2,
        metric_samples: 16,
        seed: Some(SEED),
        ..ProgressiveConfig::default()
    }
}

fn trainer() -> ProgressiveTrainer {
    ProgressiveTrainer::new(config(), ConvGrowingBuilder)
}

fn dataset() -> ArrayD<f32> {
    gradient_images(&mut StdRng::seed_from_u64(1), 64, 8, 3)
}

fn train_config(epochs: usize, grow_rate: usize, mode: &str) -> ProgressiveTrainConfig {
    ProgressiveTrainConfig {
        train: TrainConfig {
            batch_size: 8,
            epochs,
            checkpoint_interval: 1,
            verbose: false,
            ..TrainConfig::default()
        },
        epochs_grow_rate: grow_rate,
        mode: mode.to_string(),
    }
}

/// Metric returning a scripted mean per checkpoint
fn scripted_metric(values: Vec<f32>) -> impl SampleMetric {
    let calls = Cell::new(0usize);
    FnMetric::new("metric", move |_real: &ArrayD<f32>, fake: &ArrayD<f32>| {
        let i = calls.get();
        calls.set(i + 1);
        let value = values[i.min(values.len() - 1)];
        Ok(Array1::from_elem(fake.shape()[0], value))
    })
}

fn generator_weights(trainer: &ProgressiveTrainer) -> Weights {
    trainer.models().unwrap().generator.weights()
}

#[test]
fn test_mode_parsing() {
    assert_eq!("vanilla".parse::<TrainingMode>().unwrap(), TrainingMode::Vanilla);
    assert_eq!("stable".parse::<TrainingMode>().unwrap(), TrainingMode::Stable);
    assert_eq!(TrainingMode::Stable.to_string(), "stable");
    match "foo".parse::<TrainingMode>() {
        Err(Error::Config(msg)) => assert_eq!(msg, "Mode 'foo' is unknown"),
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn test_soft_target() {
    assert_abs_diff_eq!(soft_target(1.0), 1.0);
    assert_abs_diff_eq!(soft_target(0.0), 0.0);
    assert_abs_diff_eq!(soft_target(0.75), 0.5);
}

#[test]
fn test_initial_growth_state() {
    let state = GrowthState::default();
    assert_eq!(state.stages, 0);
    assert_eq!(state.resolution, 4);
    assert!(state.generator_table.body.is_empty());
    assert_eq!(GrowthState::at_stage(2).resolution, 16);
}

#[test]
fn test_build_starts_at_base_resolution() {
    let mut trainer = trainer();
    assert!(trainer.predict(&Array2::zeros((1, 4))).is_err());
    trainer.build().unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Built);
    assert_eq!(trainer.growth().stages, 0);
    let images = trainer.predict(&Array2::zeros((2, 4))).unwrap();
    assert_eq!(images.shape(), &[2, 4, 4, 3]);
}

#[test]
fn test_growth_keeps_trained_layers() {
    let mut trainer = trainer();
    // one epoch, no growth, so the head moves away from its initial weights
    trainer.train(&dataset(), &train_config(1, 10, "vanilla"), None).unwrap();
    assert_eq!(trainer.growth().stages, 0);

    let before = trainer.models().unwrap();
    let g_head = before.generator.layer_weights("g_head").unwrap();
    let d_head = before.discriminator.layer_weights("d_head").unwrap();
    let fresh = ConvGrowingBuilder
        .build_generator(&config(), 0, &TransplantTable::default(), SEED)
        .unwrap();
    assert_ne!(fresh.layer_weights("g_head").unwrap(), g_head);

    assert!(trainer.grow().unwrap());
    assert_eq!(trainer.growth().stages, 1);
    assert_eq!(trainer.growth().resolution, 8);

    let after = trainer.models().unwrap();
    assert_eq!(after.generator.layer_weights("g_head").unwrap(), g_head);
    assert_eq!(after.discriminator.layer_weights("d_head").unwrap(), d_head);

    let default_stage_one = ConvGrowingBuilder
        .build_generator(&config(), 1, &TransplantTable::default(), SEED)
        .unwrap();
    assert_eq!(after.generator.layer_weights("g_block_0"), default_stage_one.layer_weights("g_block_0"));
    assert_eq!(after.generator.layer_weights("g_to_image"), default_stage_one.layer_weights("g_to_image"));

    // already at the 8x8 target
    assert!(!trainer.grow().unwrap());
    assert_eq!(trainer.growth().stages, 1);
}

#[test]
fn test_growth_preserves_trained_blocks() {
    let mut trainer = trainer();
    let mut cfg = config();
    cfg.image_shape = [16, 16, 3];
    trainer.config = cfg.clone();
    trainer.build().unwrap();
    trainer.grow().unwrap();
    let data = gradient_images(&mut StdRng::seed_from_u64(2), 32, 16, 3);
    trainer.train(&data, &train_config(1, 10, "vanilla"), None).unwrap();
    let block = trainer.models().unwrap().generator.layer_weights("g_block_0").unwrap();
    let d_block = trainer.models().unwrap().discriminator.layer_weights("d_block_0").unwrap();

    assert!(trainer.grow().unwrap());
    assert_eq!(trainer.growth().resolution, 16);
    let grown = trainer.models().unwrap();
    assert_eq!(grown.generator.layer_weights("g_block_0").unwrap(), block);
    assert_eq!(grown.discriminator.layer_weights("d_block_0").unwrap(), d_block);

    let fresh = ConvGrowingBuilder.build_generator(&cfg, 2, &TransplantTable::default(), SEED).unwrap();
    assert_eq!(grown.generator.layer_weights("g_block_1"), fresh.layer_weights("g_block_1"));
}

#[test]
fn test_train_grows_and_records_every_checkpoint() {
    let mut trainer = trainer();
    let mut stages = Vec::new();
    let mut callback = |ctx: &CheckpointContext| stages.push((ctx.epoch, ctx.stage, ctx.is_final));
    let history = trainer.train(&dataset(), &train_config(5, 2, "vanilla"), Some(&mut callback)).unwrap();

    assert_eq!(history.hist_size(), 5);
    for key in [D_LOSS, G_LOSS, "metric", FAKE_SCORE, REAL_SCORE, VALIDATION_SCORE, CONTROL_SCORE] {
        assert!(history.recorded(key).unwrap().len() >= 5, "{key}");
    }
    // no validation split: validation scores stay zero
    assert!(history.recorded(VALIDATION_SCORE).unwrap().iter().all(|s| s.mean == 0.0));
    for score in history.recorded(REAL_SCORE).unwrap() {
        assert!((0.0..=1.0).contains(&score.mean));
    }

    // grows at the top of epoch 1, then stays at the 8x8 target
    assert_eq!(
        stages,
        vec![(0, 0, false), (1, 1, false), (2, 1, false), (3, 1, false), (4, 1, false), (5, 1, true)]
    );
    assert_eq!(trainer.phase(), TrainerPhase::Done);
    assert_eq!(trainer.predict(&Array2::zeros((1, 4))).unwrap().shape(), &[1, 8, 8, 3]);
}

#[test]
fn test_unknown_mode_leaves_networks_untouched() {
    let mut trainer = trainer();
    trainer.build().unwrap();
    let before = generator_weights(&trainer);
    let err = trainer.train(&dataset(), &train_config(2, 1, "foo"), None).unwrap_err();
    assert!(matches!(err, Error::Config(ref msg) if msg == "Mode 'foo' is unknown"));
    assert_eq!(generator_weights(&trainer), before);
    assert_eq!(trainer.growth().stages, 0);
    assert_eq!(trainer.phase(), TrainerPhase::Built);
}

#[test]
fn test_stable_mode_with_validation() {
    let mut trainer = trainer();
    let mut cfg = train_config(3, 1, "stable");
    cfg.train.validation_split = 0.25;
    let history = trainer.train(&dataset(), &cfg, None).unwrap();
    assert_eq!(history.hist_size(), 3);
    for row in history.recorded(VALIDATION_SCORE).unwrap() {
        assert!(row.mean > 0.0 && row.mean < 1.0);
    }
    assert!(history.recorded(D_LOSS).unwrap().iter().all(|s| s.mean.is_finite()));
}

#[test]
fn test_dataset_must_match_image_shape() {
    let mut trainer = trainer();
    let small = gradient_images(&mut StdRng::seed_from_u64(1), 8, 4, 3);
    assert!(matches!(
        trainer.train(&small, &train_config(1, 1, "vanilla"), None),
        Err(Error::Dataset(_))
    ));
    assert_eq!(trainer.phase(), TrainerPhase::Unbuilt);
}

#[test]
fn test_best_snapshot_is_dropped_at_growth() {
    let mut trainer = trainer();
    let mut cfg = train_config(4, 2, "vanilla");
    cfg.train.save_best_model = true;
    trainer.train(&dataset(), &cfg, None).unwrap();
    // a stage-0 snapshot would not fit the grown generator
    assert_eq!(trainer.growth().stages, 1);
    assert_eq!(trainer.predict(&Array2::zeros((2, 4))).unwrap().shape(), &[2, 8, 8, 3]);
}

#[test]
fn test_history_off_still_trains() {
    let mut trainer = trainer();
    let mut cfg = train_config(3, 1, "vanilla");
    cfg.train.collect_history = false;
    let history = trainer.train(&dataset(), &cfg, None).unwrap();
    assert_eq!(history.hist_size(), 0);
    assert_eq!(trainer.growth().stages, 1);
}

#[test]
fn test_save_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut trained = trainer();
    trained.train(&dataset(), &train_config(2, 2, "vanilla"), None).unwrap();
    trained.save(dir.path()).unwrap();

    let mut cfg = config();
    cfg.model_dir = Some(dir.path().to_path_buf());
    let mut reloaded = ProgressiveTrainer::new(cfg, ConvGrowingBuilder);
    reloaded.build().unwrap();

    assert_eq!(reloaded.growth().stages, 1);
    assert_eq!(reloaded.growth().resolution, 8);
    assert_eq!(generator_weights(&reloaded), generator_weights(&trained));
    assert_eq!(
        reloaded.models().unwrap().discriminator.weights(),
        trained.models().unwrap().discriminator.weights()
    );
}

#[test]
fn test_build_without_artifacts_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config();
    cfg.model_dir = Some(dir.path().to_path_buf());
    let mut trainer = ProgressiveTrainer::new(cfg, ConvGrowingBuilder);
    trainer.build().unwrap();
    assert_eq!(trainer.growth().stages, 0);
}

#[test]
fn test_reload_rejects_mismatched_stages() {
    let dir = tempfile::tempdir().unwrap();
    let mut saved = trainer();
    saved.build().unwrap();
    saved.save(dir.path()).unwrap();

    let path = dir.path().join(DISCRIMINATOR_FILE);
    let mut artifact = NetworkArtifact::load(&path).unwrap();
    artifact.stage = 1;
    artifact.save(&path).unwrap();

    let mut cfg = config();
    cfg.model_dir = Some(dir.path().to_path_buf());
    let mut trainer = ProgressiveTrainer::new(cfg, ConvGrowingBuilder);
    assert!(matches!(trainer.build(), Err(Error::Config(_))));
}

#[test]
fn test_save_before_build_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(trainer().save(dir.path()).is_err());
}

#[test]
fn test_save_best_uses_slack_rule() {
    // 1.01 * 0.98 < 1.0, so epoch 2 replaces epoch 1 as best
    let metrics = vec![2.0, 1.0, 1.01, 3.0];
    let mut best_config = train_config(4, 100, "vanilla");
    best_config.train.save_best_model = true;

    let mut restored = trainer().with_metric(scripted_metric(metrics.clone()));
    let history = restored.train(&dataset(), &best_config, None).unwrap();
    assert_eq!(history.best_metric(), Some(1.01));
    assert_eq!(restored.growth().stages, 0);

    let mut reference = trainer().with_metric(scripted_metric(metrics.clone()));
    reference.train(&dataset(), &train_config(3, 100, "vanilla"), None).unwrap();

    let mut last = trainer().with_metric(scripted_metric(metrics));
    last.train(&dataset(), &train_config(4, 100, "vanilla"), None).unwrap();

    let restored_weights = generator_weights(&restored);
    assert_eq!(restored_weights, generator_weights(&reference));
    assert_ne!(restored_weights, generator_weights(&last));
}

#[test]
fn test_nan_metric_does_not_abort_training() {
    let mut trainer = trainer().with_metric(FnMetric::new("metric", |_real: &ArrayD<f32>, fake: &ArrayD<f32>| {
        Ok(Array1::from_elem(fake.shape()[0], f32::NAN))
    }));
    let mut cfg = train_config(3, 100, "vanilla");
    cfg.train.save_best_model = true;
    let history = trainer.train(&dataset(), &cfg, None).unwrap();

    assert_eq!(history.hist_size(), 3);
    assert!(history.recorded("metric").unwrap().iter().all(|row| row.mean.is_nan()));
    assert_eq!(history.best_metric(), None);
    assert_eq!(trainer.phase(), TrainerPhase::Done);
}
