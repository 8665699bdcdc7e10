//! Validation logic

use super::error::ValidationError;
use crate::config::schema::{
    DataSpec, GanConfig, ProgressiveConfig, ProgressiveTrainConfig, RunSpec, TrainConfig, TrainerKind,
};
use crate::objective::ObjectiveKind;
use crate::train::TrainingMode;

/// Check the arguments of one `train` call
pub fn validate_train(config: &TrainConfig) -> Result<(), ValidationError> {
    if config.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(config.batch_size));
    }
    if config.checkpoint_interval == 0 {
        return Err(ValidationError::InvalidCheckpointInterval(config.checkpoint_interval));
    }
    if !config.validation_split.is_finite() {
        return Err(ValidationError::InvalidValidationSplit(config.validation_split));
    }
    Ok(())
}

/// [`validate_train`] plus the growth interval
///
/// The mode string is checked separately by the trainer, which must reject it
/// before touching any parameter.
pub fn validate_progressive_train(config: &ProgressiveTrainConfig) -> Result<(), ValidationError> {
    validate_train(&config.train)?;
    if config.epochs_grow_rate == 0 {
        return Err(ValidationError::InvalidGrowRate(config.epochs_grow_rate));
    }
    Ok(())
}

pub fn validate_gan(config: &GanConfig) -> Result<(), ValidationError> {
    if config.latent_dim == 0 {
        return Err(ValidationError::InvalidLatentDim(config.latent_dim));
    }
    if config.n_critic == 0 {
        return Err(ValidationError::InvalidCritic(config.n_critic));
    }
    if config.input_shape.is_empty() || config.input_shape.contains(&0) {
        return Err(ValidationError::InvalidInputShape(config.input_shape.clone()));
    }
    if config.objective.parse::<ObjectiveKind>().is_err() {
        return Err(ValidationError::InvalidObjective(config.objective.clone()));
    }
    config.optimizer.validate().map_err(|e| ValidationError::InvalidOptimizer(e.to_string()))?;
    Ok(())
}

pub fn validate_progressive(config: &ProgressiveConfig) -> Result<(), ValidationError> {
    let [h, w, c] = config.image_shape;
    if h != w || h < 4 || !h.is_power_of_two() || c == 0 {
        return Err(ValidationError::InvalidImageShape(config.image_shape));
    }
    if config.latent_dim == 0 {
        return Err(ValidationError::InvalidLatentDim(config.latent_dim));
    }
    if config.channels == 0 {
        return Err(ValidationError::InvalidChannels(config.channels));
    }
    if config.metric_samples == 0 {
        return Err(ValidationError::InvalidMetricSamples(config.metric_samples));
    }
    config.optimizer.validate().map_err(|e| ValidationError::InvalidOptimizer(e.to_string()))?;
    Ok(())
}

fn validate_data(data: &DataSpec) -> Result<(), ValidationError> {
    match data {
        DataSpec::Synthetic { samples, side, channels, .. } => {
            if *samples == 0 || *side == 0 || *channels == 0 {
                return Err(ValidationError::InvalidData(format!(
                    "synthetic data needs samples, side and channels > 0, got {samples}, {side}, {channels}"
                )));
            }
        }
        DataSpec::Json { path } => {
            if !path.exists() {
                return Err(ValidationError::InvalidData(format!("{} does not exist", path.display())));
            }
        }
    }
    Ok(())
}

/// Validate a run specification
///
/// Checks:
/// - Numeric values are in valid ranges
/// - Objective and mode names are known
/// - The data source agrees with the model's sample shape
pub fn validate_spec(spec: &RunSpec) -> Result<(), ValidationError> {
    validate_data(&spec.data)?;
    match spec.trainer {
        TrainerKind::Gan => {
            validate_train(&spec.training.train)?;
            let model = spec.gan.clone().unwrap_or_default();
            validate_gan(&model)?;
            if let DataSpec::Synthetic { side, channels, .. } = spec.data {
                if model.input_shape != [side, side, channels] {
                    return Err(ValidationError::InvalidData(format!(
                        "synthetic images are {side}x{side}x{channels}, model expects {:?}",
                        model.input_shape
                    )));
                }
            }
        }
        TrainerKind::Progressive => {
            validate_progressive_train(&spec.training)?;
            if spec.training.mode.parse::<TrainingMode>().is_err() {
                return Err(ValidationError::InvalidMode(spec.training.mode.clone()));
            }
            let model = spec.progressive.clone().unwrap_or_default();
            validate_progressive(&model)?;
            if let DataSpec::Synthetic { side, channels, .. } = spec.data {
                if model.image_shape != [side, side, channels] {
                    return Err(ValidationError::InvalidData(format!(
                        "synthetic images are {side}x{side}x{channels}, model expects {:?}",
                        model.image_shape
                    )));
                }
            }
        }
    }
    Ok(())
}
