//! Weights carried across growth events

use crate::error::Result;
use crate::nn::{Network, Weights};

/// Weights of one network's transplantable layers
///
/// `body[i]` belongs to the `i`-th growth block; `None` marks a block that
/// has not been trained yet and must keep its default initialisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransplantTable {
    pub head: Option<Weights>,
    pub body: Vec<Option<Weights>>,
}

impl TransplantTable {
    /// Capture the head and the first `stages` body blocks of `network`
    pub fn capture(network: &Network, head: &str, body: impl Fn(usize) -> String, stages: usize) -> Self {
        Self {
            head: network.layer_weights(head),
            body: (0..stages).map(|i| network.layer_weights(&body(i))).collect(),
        }
    }

    /// Reserve an empty slot for the block added by the next growth event
    pub fn push_empty(&mut self) {
        self.body.push(None);
    }

    pub fn body(&self, index: usize) -> Option<&Weights> {
        self.body.get(index).and_then(Option::as_ref)
    }

    /// Inject every captured entry into `network`, addressing layers by name
    pub fn inject(&self, network: &mut Network, head: &str, body: impl Fn(usize) -> String) -> Result<()> {
        if let Some(weights) = &self.head {
            network.set_layer_weights(head, weights)?;
        }
        for (i, weights) in self.body.iter().enumerate() {
            if let Some(weights) = weights {
                network.set_layer_weights(&body(i), weights)?;
            }
        }
        Ok(())
    }
}
