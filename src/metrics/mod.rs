//! Similarity between real and generated samples
//!
//! Lower is better for every metric here; the trainers track the minimum.

mod distance;

pub use distance::{MomentDistance, NearestNeighborDistance};

use crate::data::{sample_batch, sample_latent};
use crate::error::{Error, Result};
use crate::nn::Network;
use ndarray::{Array1, Array2, ArrayD, Axis};
use rand::Rng;

/// A distance between a real and a generated batch
pub trait SampleMetric {
    fn name(&self) -> &str {
        "metric"
    }

    /// One or more scores; callers summarise them as mean, min and max
    fn compute(&self, real: &ArrayD<f32>, fake: &ArrayD<f32>) -> Result<Array1<f32>>;
}

/// Adapts a closure to [`SampleMetric`]
pub struct FnMetric<F> {
    name: String,
    func: F,
}

impl<F> FnMetric<F>
where
    F: Fn(&ArrayD<f32>, &ArrayD<f32>) -> Result<Array1<f32>>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self { name: name.into(), func }
    }
}

impl<F> SampleMetric for FnMetric<F>
where
    F: Fn(&ArrayD<f32>, &ArrayD<f32>) -> Result<Array1<f32>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, real: &ArrayD<f32>, fake: &ArrayD<f32>) -> Result<Array1<f32>> {
        (self.func)(real, fake)
    }
}

/// Samples as rows: `[batch, features]`
pub(crate) fn as_rows(samples: &ArrayD<f32>) -> Result<Array2<f32>> {
    if samples.ndim() == 0 {
        return Err(Error::Computation("metric input has no sample axis".to_string()));
    }
    let n = samples.len_of(Axis(0));
    let features: usize = samples.shape()[1..].iter().product();
    Ok(samples.as_standard_layout().into_owned().into_shape_with_order((n, features))?)
}

/// Score `sample_count` generated samples against as many real ones
///
/// Real samples are drawn from `pool` with replacement; latent vectors are
/// uniform in `[-1, 1]^latent_dim`.
pub fn evaluate<R: Rng>(
    rng: &mut R,
    generator: &mut Network,
    metric: &dyn SampleMetric,
    pool: &ArrayD<f32>,
    sample_count: usize,
    latent_dim: usize,
) -> Result<Array1<f32>> {
    let real = sample_batch(rng, pool, sample_count)?;
    let latent = sample_latent(rng, sample_count, latent_dim);
    let fake = generator.forward(&latent.into_dyn())?;
    metric.compute(&real, &fake)
}
