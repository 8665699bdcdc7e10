//! Element-wise activations

use super::{missing_forward, Layer};
use crate::error::{Error, Result};
use ndarray::{ArrayD, Zip};

fn check_same_shape(layer: &str, grad: &ArrayD<f32>, cached: &ArrayD<f32>) -> Result<()> {
    if grad.shape() != cached.shape() {
        return Err(Error::Computation(format!(
            "{layer}: gradient of shape {:?} for activation of shape {:?}",
            grad.shape(),
            cached.shape()
        )));
    }
    Ok(())
}

/// `max(x, alpha * x)`
#[derive(Debug, Clone)]
pub struct LeakyRelu {
    name: String,
    alpha: f32,
    input: Option<ArrayD<f32>>,
}

impl LeakyRelu {
    pub fn new(name: impl Into<String>, alpha: f32) -> Self {
        Self { name: name.into(), alpha, input: None }
    }
}

impl Layer for LeakyRelu {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let alpha = self.alpha;
        let out = input.mapv(|v| if v > 0.0 { v } else { alpha * v });
        self.input = Some(input.clone());
        Ok(out)
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let input = self.input.as_ref().ok_or_else(|| missing_forward(&self.name))?;
        check_same_shape(&self.name, grad_output, input)?;
        let alpha = self.alpha;
        let mut grad = grad_output.clone();
        Zip::from(&mut grad).and(input).for_each(|g, &x| {
            if x <= 0.0 {
                *g *= alpha;
            }
        });
        Ok(grad)
    }
}

/// Hyperbolic tangent, keeps generator outputs in `[-1, 1]`
#[derive(Debug, Clone)]
pub struct Tanh {
    name: String,
    output: Option<ArrayD<f32>>,
}

impl Tanh {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), output: None }
    }
}

impl Layer for Tanh {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let out = input.mapv(f32::tanh);
        self.output = Some(out.clone());
        Ok(out)
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let output = self.output.as_ref().ok_or_else(|| missing_forward(&self.name))?;
        check_same_shape(&self.name, grad_output, output)?;
        let mut grad = grad_output.clone();
        Zip::from(&mut grad).and(output).for_each(|g, &y| *g *= 1.0 - y * y);
        Ok(grad)
    }
}
