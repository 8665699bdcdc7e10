//! Configuration types and the YAML run specification

use crate::optim::OptimizerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hidden layout of the dense generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Hidden layer sizes
    pub hidden_dims: Vec<usize>,
    /// Negative slope of the leaky ReLU activations
    pub leaky_slope: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { hidden_dims: vec![128, 128], leaky_slope: 0.2 }
    }
}

/// Hidden layout of the dense discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscriminatorConfig {
    /// Hidden layer sizes
    pub hidden_dims: Vec<usize>,
    /// Negative slope of the leaky ReLU activations
    pub leaky_slope: f32,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self { hidden_dims: vec![128], leaky_slope: 0.2 }
    }
}

/// Model configuration of the base trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanConfig {
    /// Shape of one sample, without the batch axis
    pub input_shape: Vec<usize>,
    /// Dimension of the latent space
    pub latent_dim: usize,
    /// Discriminator updates per generator update
    pub n_critic: usize,
    /// Adversarial objective: "minmax" | "wasserstein" | "least_squares"
    pub objective: String,
    pub optimizer: OptimizerConfig,
    pub generator: GeneratorConfig,
    pub discriminator: DiscriminatorConfig,
    /// Seed for weight initialisation and sampling; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            input_shape: vec![28, 28, 1],
            latent_dim: 100,
            n_critic: 1,
            objective: "minmax".to_string(),
            optimizer: OptimizerConfig::default(),
            generator: GeneratorConfig::default(),
            discriminator: DiscriminatorConfig::default(),
            seed: None,
        }
    }
}

/// Model configuration of the progressive trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressiveConfig {
    /// Target image shape `[height, width, channels]`
    pub image_shape: [usize; 3],
    pub latent_dim: usize,
    /// Channel width of every convolutional block
    pub channels: usize,
    pub optimizer: OptimizerConfig,
    /// Samples drawn for each metric evaluation
    pub metric_samples: usize,
    /// Directory holding `generator.json` / `discriminator.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ProgressiveConfig {
    fn default() -> Self {
        Self {
            image_shape: [32, 32, 3],
            latent_dim: 100,
            channels: 64,
            optimizer: OptimizerConfig::adam(0.0002),
            metric_samples: 1000,
            model_dir: None,
            seed: None,
        }
    }
}

/// Arguments of one `train` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Samples per gradient update
    pub batch_size: usize,
    /// Epochs; one epoch is one batch-sized update round
    pub epochs: usize,
    /// Epochs between checkpoints
    pub checkpoint_interval: usize,
    /// Fraction of the dataset held out from the tail
    pub validation_split: f32,
    /// Restore the best generator at the end of training
    pub save_best_model: bool,
    /// Record history at checkpoints; when off, checkpoints only log
    pub collect_history: bool,
    /// Log checkpoint lines at info level
    pub verbose: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            epochs: 1,
            checkpoint_interval: 100,
            validation_split: 0.0,
            save_best_model: false,
            collect_history: true,
            verbose: true,
        }
    }
}

/// Arguments of one progressive `train` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressiveTrainConfig {
    #[serde(flatten)]
    pub train: TrainConfig,
    /// Epochs between growth events
    pub epochs_grow_rate: usize,
    /// Discriminator training mode: "vanilla" | "stable"
    pub mode: String,
}

impl Default for ProgressiveTrainConfig {
    fn default() -> Self {
        Self { train: TrainConfig::default(), epochs_grow_rate: 1, mode: "vanilla".to_string() }
    }
}

/// Which trainer a run spec drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerKind {
    #[default]
    Gan,
    Progressive,
}

/// Where the training samples come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSpec {
    /// Random colour-gradient images
    Synthetic {
        samples: usize,
        side: usize,
        channels: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// A `{shape, data}` JSON file
    Json { path: PathBuf },
}

impl Default for DataSpec {
    fn default() -> Self {
        Self::Synthetic { samples: 1000, side: 8, channels: 3, seed: None }
    }
}

/// Complete run specification (YAML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunSpec {
    #[serde(default)]
    pub trainer: TrainerKind,

    /// Model section for `trainer: gan`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gan: Option<GanConfig>,

    /// Model section for `trainer: progressive`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive: Option<ProgressiveConfig>,

    /// Training arguments; the growth fields are ignored by the base trainer
    #[serde(default)]
    pub training: ProgressiveTrainConfig,

    #[serde(default)]
    pub data: DataSpec,

    /// Where to write the training history as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PathBuf>,
}
