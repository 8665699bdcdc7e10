//! Serializable optimizer selection

use super::{Adam, Optimizer, Sgd};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which update rule to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Adam,
    Sgd,
}

/// Optimizer hyper-parameters
///
/// Both adversarial players get their own optimizer built from the same
/// config, so their state never mixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub kind: OptimizerKind,
    pub lr: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    /// SGD only
    pub momentum: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { kind: OptimizerKind::Adam, lr: 0.001, beta1: 0.5, beta2: 0.999, epsilon: 1e-7, momentum: 0.0 }
    }
}

impl OptimizerConfig {
    /// Adam tuned for adversarial training (`β1 = 0.5`)
    pub fn adam(lr: f32) -> Self {
        Self { lr, ..Self::default() }
    }

    pub fn sgd(lr: f32, momentum: f32) -> Self {
        Self { kind: OptimizerKind::Sgd, lr, momentum, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(Error::Config(format!("learning rate must be positive, got {}", self.lr)));
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return Err(Error::Config(format!(
                "betas must lie in [0, 1), got ({}, {})",
                self.beta1, self.beta2
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::Config(format!("momentum must lie in [0, 1), got {}", self.momentum)));
        }
        Ok(())
    }

    /// Fresh optimizer with empty state
    pub fn build(&self) -> Box<dyn Optimizer> {
        match self.kind {
            OptimizerKind::Adam => Box::new(Adam::new(self.lr, self.beta1, self.beta2, self.epsilon)),
            OptimizerKind::Sgd => Box::new(Sgd::new(self.lr, self.momentum)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_adam() {
        let config = OptimizerConfig::default();
        assert_eq!(config.kind, OptimizerKind::Adam);
        assert!(config.validate().is_ok());
        assert_eq!(config.build().lr(), 0.001);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(OptimizerConfig::adam(0.0).validate().is_err());
        assert!(OptimizerConfig::sgd(0.1, 1.5).validate().is_err());
        let config = OptimizerConfig { beta1: 1.0, ..OptimizerConfig::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config: OptimizerConfig = serde_yaml::from_str("kind: sgd\nlr: 0.05\n").unwrap();
        assert_eq!(config.kind, OptimizerKind::Sgd);
        assert_eq!(config.lr, 0.05);
        assert_eq!(config.beta1, 0.5);
    }
}
