//! Same-padded 2-D convolution (im2col)

use super::init::{layer_rng, xavier};
use super::{missing_forward, with_rank, Layer, Parameter};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array4, ArrayD, ArrayView2, ArrayView4, Axis, Ix4};

/// Square-kernel convolution with stride 1 and "same" zero padding over NHWC inputs
#[derive(Debug, Clone)]
pub struct Conv2d {
    name: String,
    kernel_size: usize,
    in_channels: usize,
    out_channels: usize,
    /// `[kernel_size * kernel_size * in_channels, out_channels]`
    kernel: Parameter,
    bias: Parameter,
    cache: Option<ConvCache>,
}

#[derive(Debug, Clone)]
struct ConvCache {
    columns: Array2<f32>,
    input_dim: (usize, usize, usize, usize),
}

impl Conv2d {
    /// `kernel_size` must be odd so the output keeps the input's spatial size
    pub fn new(
        name: impl Into<String>,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        seed: u64,
    ) -> Result<Self> {
        let name = name.into();
        if kernel_size % 2 == 0 {
            return Err(Error::Config(format!("{name}: kernel size {kernel_size} must be odd")));
        }
        let patch = kernel_size * kernel_size * in_channels;
        let mut rng = layer_rng(seed, &name);
        let kernel = xavier(&mut rng, patch, out_channels, patch * out_channels);
        Ok(Self {
            kernel: Parameter::from_parts(&[patch, out_channels], kernel),
            bias: Parameter::zeros(&[out_channels]),
            name,
            kernel_size,
            in_channels,
            out_channels,
            cache: None,
        })
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }
}

/// Unfold every `k x k` neighbourhood into one row: `[n*h*w, k*k*c]`
fn im2col(x: &ArrayView4<'_, f32>, k: usize) -> Array2<f32> {
    let (n, h, w, c) = x.dim();
    let pad = (k / 2) as isize;
    let mut columns = Array2::zeros((n * h * w, k * k * c));
    for b in 0..n {
        for y in 0..h {
            for x_pos in 0..w {
                let row = (b * h + y) * w + x_pos;
                for dy in 0..k {
                    let sy = y as isize + dy as isize - pad;
                    if sy < 0 || sy >= h as isize {
                        continue;
                    }
                    for dx in 0..k {
                        let sx = x_pos as isize + dx as isize - pad;
                        if sx < 0 || sx >= w as isize {
                            continue;
                        }
                        let base = (dy * k + dx) * c;
                        for ch in 0..c {
                            columns[[row, base + ch]] = x[[b, sy as usize, sx as usize, ch]];
                        }
                    }
                }
            }
        }
    }
    columns
}

/// Inverse of [`im2col`]: scatter-add rows back into an NHWC gradient
fn col2im(columns: &ArrayView2<'_, f32>, dim: (usize, usize, usize, usize), k: usize) -> Array4<f32> {
    let (n, h, w, c) = dim;
    let pad = (k / 2) as isize;
    let mut grad = Array4::zeros(dim);
    for b in 0..n {
        for y in 0..h {
            for x_pos in 0..w {
                let row = (b * h + y) * w + x_pos;
                for dy in 0..k {
                    let sy = y as isize + dy as isize - pad;
                    if sy < 0 || sy >= h as isize {
                        continue;
                    }
                    for dx in 0..k {
                        let sx = x_pos as isize + dx as isize - pad;
                        if sx < 0 || sx >= w as isize {
                            continue;
                        }
                        let base = (dy * k + dx) * c;
                        for ch in 0..c {
                            grad[[b, sy as usize, sx as usize, ch]] += columns[[row, base + ch]];
                        }
                    }
                }
            }
        }
    }
    grad
}

impl Layer for Conv2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = with_rank::<Ix4>(&self.name, input)?;
        let (n, h, w, c) = x.dim();
        if c != self.in_channels {
            return Err(Error::Computation(format!(
                "{}: expected {} channels, got {c}",
                self.name, self.in_channels
            )));
        }
        let columns = im2col(&x, self.kernel_size);
        let out = columns.dot(&self.kernel.matrix()?) + self.bias.data();
        self.cache = Some(ConvCache { columns, input_dim: (n, h, w, c) });
        Ok(out.into_shape_with_order((n, h, w, self.out_channels))?.into_dyn())
    }

    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let g = with_rank::<Ix4>(&self.name, grad_output)?;
        let cache = self.cache.as_ref().ok_or_else(|| missing_forward(&self.name))?;
        let (n, h, w, _) = cache.input_dim;
        if g.dim() != (n, h, w, self.out_channels) {
            return Err(Error::Computation(format!(
                "{}: gradient of shape {:?} for output {:?}",
                self.name,
                g.shape(),
                [n, h, w, self.out_channels]
            )));
        }
        let g = g.as_standard_layout().into_owned().into_shape_with_order((n * h * w, self.out_channels))?;

        let grad_kernel = cache.columns.t().dot(&g);
        self.kernel.accumulate_grad(Array1::from_iter(grad_kernel.iter().copied()).view())?;
        self.bias.accumulate_grad(g.sum_axis(Axis(0)).view())?;

        let grad_columns = g.dot(&self.kernel.matrix()?.t());
        Ok(col2im(&grad_columns.view(), cache.input_dim, self.kernel_size).into_dyn())
    }

    fn params(&self) -> Vec<&Parameter> {
        vec![&self.kernel, &self.bias]
    }

    fn params_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.kernel, &mut self.bias]
    }
}
