//! JSON artifacts of trained networks

use crate::error::{Error, Result};
use crate::nn::{Network, Weights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const GENERATOR_FILE: &str = "generator.json";
pub const DISCRIMINATOR_FILE: &str = "discriminator.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub name: String,
    pub weights: Weights,
}

/// Growth stage plus the weights of every parameterised layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkArtifact {
    pub stage: usize,
    pub layers: Vec<LayerEntry>,
}

impl NetworkArtifact {
    pub fn capture(network: &Network, stage: usize) -> Self {
        let layers = network
            .named_weights()
            .into_iter()
            .map(|(name, weights)| LayerEntry { name, weights })
            .collect();
        Self { stage, layers }
    }

    /// Overwrite the named layers of `network`
    ///
    /// The network must have been built at the artifact's stage; any layer
    /// it lacks is a shape error.
    pub fn apply(&self, network: &mut Network) -> Result<()> {
        for entry in &self.layers {
            network.set_layer_weights(&entry.name, &entry.weights)?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}
