//! Fully connected layer

use super::init::{layer_rng, xavier};
use super::{missing_forward, with_rank, Layer, Parameter};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayD, Axis, Ix2};

/// `y = x W + b` over `[batch, in_features]` inputs
#[derive(Debug, Clone)]
pub struct Dense {
    name: String,
    weight: Parameter,
    bias: Parameter,
    input: Option<Array2<f32>>,
}

impl Dense {
    /// Xavier-initialised layer; initial values depend only on `seed` and `name`
    pub fn new(name: impl Into<String>, in_features: usize, out_features: usize, seed: u64) -> Self {
        let name = name.into();
        let mut rng = layer_rng(seed, &name);
        let weight = xavier(&mut rng, in_features, out_features, in_features * out_features);
        Self {
            weight: Parameter::from_parts(&[in_features, out_features], weight),
            bias: Parameter::zeros(&[out_features]),
            name,
            input: None,
        }
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape()[1]
    }
}

impl Layer for Dense {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = with_rank::<Ix2>(&self.name, input)?;
        if x.ncols() != self.in_features() {
            return Err(Error::Computation(format!(
                "{}: expected {} input features, got {}",
                self.name,
                self.in_features(),
                x.ncols()
            )));
        }
        let out = x.dot(&self.weight.matrix()?) + self.bias.data();
        self.input = Some(x.to_owned());
        Ok(out.into_dyn())
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let g = with_rank::<Ix2>(&self.name, grad_output)?;
        let x = self.input.as_ref().ok_or_else(|| missing_forward(&self.name))?;

        let grad_weight = x.t().dot(&g);
        self.weight.accumulate_grad(Array1::from_iter(grad_weight.iter().copied()).view())?;
        self.bias.accumulate_grad(g.sum_axis(Axis(0)).view())?;

        let grad_input = g.dot(&self.weight.matrix()?.t());
        Ok(grad_input.into_dyn())
    }

    fn params(&self) -> Vec<&Parameter> {
        vec![&self.weight, &self.bias]
    }

    fn params_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.weight, &mut self.bias]
    }
}
