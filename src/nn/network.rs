//! Sequential network of named layers

use super::{Layer, Parameter, Weights};
use crate::error::{Error, Result};
use ndarray::ArrayD;

/// Layers applied in order
///
/// Layers carrying parameters are addressable by name, which is what weight
/// transplanting and persistence key on.
#[derive(Default)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network").field("layers", &self.layer_names()).finish()
    }
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer (builder style)
    #[must_use]
    pub fn with(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn push(&mut self, layer: impl Layer + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let mut x = input.clone();
        for layer in &mut self.layers {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    /// Back-propagate `grad_output` through every layer, returning the input gradient
    pub fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let mut grad = grad_output.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Ok(grad)
    }

    pub fn params(&self) -> Vec<&Parameter> {
        self.layers.iter().flat_map(|layer| layer.params()).collect()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers.iter_mut().flat_map(|layer| layer.params_mut()).collect()
    }

    pub fn zero_grad(&mut self) {
        for param in self.params_mut() {
            param.zero_grad();
        }
    }

    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.params().iter().map(|p| p.len()).sum()
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    fn find(&self, name: &str) -> Option<&dyn Layer> {
        self.layers.iter().find(|layer| layer.name() == name).map(|layer| &**layer)
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Copy of one layer's parameters
    pub fn layer_weights(&self, name: &str) -> Option<Weights> {
        self.find(name).map(|layer| Weights::capture(&layer.params()))
    }

    /// Overwrite one layer's parameters
    pub fn set_layer_weights(&mut self, name: &str, weights: &Weights) -> Result<()> {
        let layer = self
            .layers
            .iter_mut()
            .find(|layer| layer.name() == name)
            .ok_or_else(|| Error::Shape(format!("no layer named {name}")))?;
        weights
            .inject(&mut layer.params_mut())
            .map_err(|e| Error::Shape(format!("layer {name}: {e}")))
    }

    /// Copy of every parameter, in network order
    pub fn weights(&self) -> Weights {
        Weights::capture(&self.params())
    }

    /// Overwrite every parameter; nothing is written unless all shapes match
    pub fn set_weights(&mut self, weights: &Weights) -> Result<()> {
        weights.inject(&mut self.params_mut())
    }

    /// `(name, weights)` for every layer that has parameters
    pub fn named_weights(&self) -> Vec<(String, Weights)> {
        self.layers
            .iter()
            .filter(|layer| !layer.params().is_empty())
            .map(|layer| (layer.name().to_string(), Weights::capture(&layer.params())))
            .collect()
    }
}
