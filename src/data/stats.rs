//! Per-element dataset statistics

use crate::error::{Error, Result};
use crate::nn::init::sample_normal;
use ndarray::{ArrayD, Axis, IxDyn, Zip};
use rand::Rng;

/// Mean and standard deviation over the sample axis, one value per element
/// of a single sample
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStats {
    pub mean: ArrayD<f32>,
    pub std: ArrayD<f32>,
}

impl SampleStats {
    pub fn of(dataset: &ArrayD<f32>) -> Result<Self> {
        if dataset.ndim() == 0 || dataset.len_of(Axis(0)) == 0 {
            return Err(Error::Dataset("statistics of an empty dataset".to_string()));
        }
        let mean = dataset
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::Dataset("statistics of an empty dataset".to_string()))?;
        let std = dataset.std_axis(Axis(0), 0.0);
        Ok(Self { mean, std })
    }

    /// `count` samples with every element drawn from `N(mean, std)`
    pub fn sample_noise<R: Rng>(&self, rng: &mut R, count: usize) -> ArrayD<f32> {
        let mut shape = vec![count];
        shape.extend_from_slice(self.mean.shape());
        let mut noise = ArrayD::zeros(IxDyn(&shape));
        for mut sample in noise.outer_iter_mut() {
            Zip::from(&mut sample).and(&self.mean).and(&self.std).for_each(|v, &m, &s| {
                *v = m + sample_normal(rng, f64::from(s));
            });
        }
        noise
    }
}
