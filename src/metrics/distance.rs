//! Built-in sample metrics

use super::{as_rows, SampleMetric};
use crate::error::{Error, Result};
use ndarray::{arr1, Array1, ArrayD, Axis};

/// RMS distance from each generated sample to its closest real sample
///
/// Yields one score per generated sample. Collapsed generators score well
/// only if they sit on real data; diverse generators far from the data score
/// badly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborDistance;

impl SampleMetric for NearestNeighborDistance {
    fn name(&self) -> &str {
        "metric"
    }

    fn compute(&self, real: &ArrayD<f32>, fake: &ArrayD<f32>) -> Result<Array1<f32>> {
        let real = as_rows(real)?;
        let fake = as_rows(fake)?;
        if real.ncols() != fake.ncols() {
            return Err(Error::Computation(format!(
                "real samples have {} features, generated samples {}",
                real.ncols(),
                fake.ncols()
            )));
        }
        if real.nrows() == 0 {
            return Err(Error::Computation("no real samples to compare against".to_string()));
        }
        let features = real.ncols().max(1) as f32;

        // |a - b|^2 = |a|^2 + |b|^2 - 2 a.b
        let real_sq = real.mapv(|v| v * v).sum_axis(Axis(1));
        let fake_sq = fake.mapv(|v| v * v).sum_axis(Axis(1));
        let cross = fake.dot(&real.t());

        let scores = cross
            .outer_iter()
            .zip(fake_sq.iter())
            .map(|(row, &f)| {
                let closest = row
                    .iter()
                    .zip(real_sq.iter())
                    .map(|(&c, &r)| (f + r - 2.0 * c).max(0.0))
                    .fold(f32::INFINITY, f32::min);
                (closest / features).sqrt()
            })
            .collect();
        Ok(scores)
    }
}

/// Mean absolute gap between per-feature means plus the gap between
/// per-feature standard deviations; a single score
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentDistance;

impl SampleMetric for MomentDistance {
    fn name(&self) -> &str {
        "moment_distance"
    }

    fn compute(&self, real: &ArrayD<f32>, fake: &ArrayD<f32>) -> Result<Array1<f32>> {
        let real = as_rows(real)?;
        let fake = as_rows(fake)?;
        if real.ncols() != fake.ncols() {
            return Err(Error::Computation(format!(
                "real samples have {} features, generated samples {}",
                real.ncols(),
                fake.ncols()
            )));
        }
        let (Some(real_mean), Some(fake_mean)) = (real.mean_axis(Axis(0)), fake.mean_axis(Axis(0))) else {
            return Err(Error::Computation("moment distance of an empty batch".to_string()));
        };
        let mean_gap = (&real_mean - &fake_mean).mapv(f32::abs).mean().unwrap_or(0.0);
        let std_gap = (real.std_axis(Axis(0), 0.0) - fake.std_axis(Axis(0), 0.0))
            .mapv(f32::abs)
            .mean()
            .unwrap_or(0.0);
        Ok(arr1(&[mean_gap + std_gap]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    #[test]
    fn test_nearest_neighbor_exact_match_is_zero() {
        let real = arr2(&[[0.0, 0.0], [1.0, 1.0]]).into_dyn();
        let fake = arr2(&[[1.0, 1.0], [0.0, 2.0]]).into_dyn();
        let scores = NearestNeighborDistance.compute(&real, &fake).unwrap();
        assert_eq!(scores.len(), 2);
        assert_abs_diff_eq!(scores[0], 0.0, epsilon = 1e-6);
        // closest is [1, 1]: squared distance 2 over 2 features
        assert_abs_diff_eq!(scores[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_nearest_neighbor_feature_mismatch() {
        let real = arr2(&[[0.0, 0.0]]).into_dyn();
        let fake = arr2(&[[0.0, 0.0, 0.0]]).into_dyn();
        assert!(NearestNeighborDistance.compute(&real, &fake).is_err());
    }

    #[test]
    fn test_moment_distance() {
        let real = arr2(&[[0.0], [2.0]]).into_dyn();
        let same = MomentDistance.compute(&real, &real).unwrap();
        assert_eq!(same.len(), 1);
        assert_abs_diff_eq!(same[0], 0.0);

        // same mean, std gap 1
        let shifted = arr2(&[[1.0], [1.0]]).into_dyn();
        assert_abs_diff_eq!(MomentDistance.compute(&real, &shifted).unwrap()[0], 1.0, epsilon = 1e-6);
    }
}
