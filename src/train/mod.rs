//! Adversarial training loops
//!
//! Two trainers share the same checkpoint machinery:
//! - [`GanTrainer`]: fixed-shape networks, pluggable objective, `n_critic`
//!   discriminator updates per epoch
//! - [`ProgressiveTrainer`]: convolutional networks that start at `4x4` and
//!   grow to the dataset resolution, in vanilla or stable mode
//!
//! Both return a [`TrainingHistory`] and call an optional
//! [`CheckpointCallback`] after every checkpoint and once after training.
//!
//! # Example
//!
//! ```no_run
//! use contienda::config::{ProgressiveConfig, ProgressiveTrainConfig};
//! use contienda::model::ConvGrowingBuilder;
//! use contienda::train::{CheckpointContext, ProgressiveTrainer};
//! use ndarray::ArrayD;
//!
//! let mut trainer = ProgressiveTrainer::new(ProgressiveConfig::default(), ConvGrowingBuilder);
//! let images = ArrayD::<f32>::zeros(vec![256, 32, 32, 3]);
//! let mut report = |ctx: &CheckpointContext| println!("epoch {} stage {}", ctx.epoch, ctx.stage);
//! let history = trainer.train(&images, &ProgressiveTrainConfig::default(), Some(&mut report)).unwrap();
//! println!("{} checkpoints", history.hist_size());
//! ```

mod base;
mod callback;
mod history;
mod progressive;
mod state;

pub use base::{GanTrainer, D_LOSS, G_LOSS, METRIC_SAMPLES};
pub use callback::{CheckpointCallback, CheckpointContext, FnCallback};
pub use history::{SeriesStats, TrainingHistory};
pub use progressive::{
    soft_target, GrowthState, ProgressiveTrainer, TrainingMode, CONTROL_SCORE, FAKE_SCORE, REAL_SCORE,
    VALIDATION_SCORE,
};
pub use state::{GeneratorSnapshot, StepBatches, TrainerPhase, TrainerState};
