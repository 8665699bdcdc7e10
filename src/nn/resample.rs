//! Shape and resolution layers

use super::{missing_forward, with_rank, Layer};
use crate::error::{Error, Result};
use ndarray::{Array4, ArrayD, ArrayView4, Ix4};

/// Mean over non-overlapping `factor x factor` spatial blocks of an NHWC array
pub fn block_mean(x: &ArrayView4<'_, f32>, factor: usize) -> Result<Array4<f32>> {
    let (n, h, w, c) = x.dim();
    if factor == 0 || h % factor != 0 || w % factor != 0 {
        return Err(Error::Computation(format!(
            "cannot reduce {h}x{w} by blocks of {factor}"
        )));
    }
    let scale = 1.0 / (factor * factor) as f32;
    let mut out = Array4::zeros((n, h / factor, w / factor, c));
    for ((b, y, x_pos, ch), &v) in x.indexed_iter() {
        out[[b, y / factor, x_pos / factor, ch]] += v * scale;
    }
    Ok(out)
}

fn repeat_nearest(x: &ArrayView4<'_, f32>, factor: usize) -> Array4<f32> {
    let (n, h, w, c) = x.dim();
    Array4::from_shape_fn((n, h * factor, w * factor, c), |(b, y, x_pos, ch)| {
        x[[b, y / factor, x_pos / factor, ch]]
    })
}

fn reshape(input: &ArrayD<f32>, shape: Vec<usize>) -> Result<ArrayD<f32>> {
    Ok(input.as_standard_layout().into_owned().into_shape_with_order(shape)?)
}

/// Reshape every sample to a fixed shape (batch axis untouched)
#[derive(Debug, Clone)]
pub struct Reshape {
    name: String,
    sample_shape: Vec<usize>,
    input_shape: Option<Vec<usize>>,
}

impl Reshape {
    pub fn new(name: impl Into<String>, sample_shape: &[usize]) -> Self {
        Self { name: name.into(), sample_shape: sample_shape.to_vec(), input_shape: None }
    }
}

impl Layer for Reshape {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let batch = input.shape().first().copied().unwrap_or(0);
        let mut target = vec![batch];
        target.extend_from_slice(&self.sample_shape);
        if target.iter().product::<usize>() != input.len() {
            return Err(Error::Computation(format!(
                "{}: cannot reshape {:?} into {target:?}",
                self.name,
                input.shape()
            )));
        }
        self.input_shape = Some(input.shape().to_vec());
        reshape(input, target)
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let shape = self.input_shape.clone().ok_or_else(|| missing_forward(&self.name))?;
        reshape(grad_output, shape)
    }
}

/// Flatten every sample to one axis: `[batch, features]`
#[derive(Debug, Clone)]
pub struct Flatten {
    name: String,
    input_shape: Option<Vec<usize>>,
}

impl Flatten {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), input_shape: None }
    }
}

impl Layer for Flatten {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let batch = input.shape().first().copied().unwrap_or(0);
        let features: usize = input.shape().iter().skip(1).product();
        self.input_shape = Some(input.shape().to_vec());
        reshape(input, vec![batch, features])
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let shape = self.input_shape.clone().ok_or_else(|| missing_forward(&self.name))?;
        reshape(grad_output, shape)
    }
}

/// Nearest-neighbour 2x up-sampling of NHWC inputs
#[derive(Debug, Clone)]
pub struct Upsample2d {
    name: String,
    seen_input: bool,
}

impl Upsample2d {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), seen_input: false }
    }
}

impl Layer for Upsample2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = with_rank::<Ix4>(&self.name, input)?;
        self.seen_input = true;
        Ok(repeat_nearest(&x, 2).into_dyn())
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if !self.seen_input {
            return Err(missing_forward(&self.name));
        }
        let g = with_rank::<Ix4>(&self.name, grad_output)?;
        // each input pixel fed four outputs
        Ok((block_mean(&g, 2)? * 4.0).into_dyn())
    }
}

/// 2x2 average pooling of NHWC inputs
#[derive(Debug, Clone)]
pub struct AvgPool2d {
    name: String,
    seen_input: bool,
}

impl AvgPool2d {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), seen_input: false }
    }
}

impl Layer for AvgPool2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = with_rank::<Ix4>(&self.name, input)?;
        let out = block_mean(&x, 2)?;
        self.seen_input = true;
        Ok(out.into_dyn())
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if !self.seen_input {
            return Err(missing_forward(&self.name));
        }
        let g = with_rank::<Ix4>(&self.name, grad_output)?;
        Ok((repeat_nearest(&g, 2) * 0.25).into_dyn())
    }
}
