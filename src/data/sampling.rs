//! Random batches

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayD, Axis};
use rand::Rng;

/// `batch_size` samples drawn uniformly with replacement from `pool`
pub fn sample_batch<R: Rng>(rng: &mut R, pool: &ArrayD<f32>, batch_size: usize) -> Result<ArrayD<f32>> {
    let n = if pool.ndim() == 0 { 0 } else { pool.len_of(Axis(0)) };
    if n == 0 {
        return Err(Error::Dataset("cannot sample from an empty pool".to_string()));
    }
    let indices: Vec<usize> = (0..batch_size).map(|_| rng.random_range(0..n)).collect();
    Ok(pool.select(Axis(0), &indices))
}

/// `[count, latent_dim]` latent vectors, uniform in `[-1, 1]`
pub fn sample_latent<R: Rng>(rng: &mut R, count: usize, latent_dim: usize) -> Array2<f32> {
    Array2::from_shape_fn((count, latent_dim), |_| rng.random_range(-1.0..=1.0))
}
