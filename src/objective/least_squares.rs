//! Least-squares objective (LSGAN)

use super::{AdversarialLoss, DiscriminatorLoss, LossGrad};
use ndarray::{Array1, ArrayView1};

/// Half mean squared distance of logits to their targets
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;

fn half_mse(x: ArrayView1<'_, f32>, target: f32) -> LossGrad {
    let n = x.len().max(1) as f32;
    let diff: Array1<f32> = x.mapv(|v| v - target);
    LossGrad { value: 0.5 * diff.mapv(|d| d * d).sum() / n, grad: diff / n }
}

impl AdversarialLoss for LeastSquares {
    fn name(&self) -> &'static str {
        "least_squares"
    }

    fn discriminator_loss(&self, real: ArrayView1<'_, f32>, fake: ArrayView1<'_, f32>) -> DiscriminatorLoss {
        let real_loss = half_mse(real, 1.0);
        let fake_loss = half_mse(fake, 0.0);
        DiscriminatorLoss {
            value: real_loss.value + fake_loss.value,
            grad_real: real_loss.grad,
            grad_fake: fake_loss.grad,
        }
    }

    fn generator_loss(&self, fake: ArrayView1<'_, f32>) -> LossGrad {
        half_mse(fake, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_perfect_discriminator_has_zero_loss() {
        let loss = LeastSquares.discriminator_loss(arr1(&[1.0, 1.0]).view(), arr1(&[0.0]).view());
        assert_abs_diff_eq!(loss.value, 0.0);
        assert!(loss.grad_real.iter().chain(loss.grad_fake.iter()).all(|&g| g == 0.0));
    }

    #[test]
    fn test_generator_loss() {
        let loss = LeastSquares.generator_loss(arr1(&[0.0, 2.0]).view());
        // 0.5 * (1 + 1) / 2
        assert_abs_diff_eq!(loss.value, 0.5);
        assert_eq!(loss.grad, arr1(&[-0.5, 0.5]));
    }
}
