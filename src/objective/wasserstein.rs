//! Wasserstein objective with weight clipping

use super::{AdversarialLoss, DiscriminatorLoss, LossGrad};
use crate::nn::Parameter;
use ndarray::{Array1, ArrayView1};

/// Critic loss `mean(fake) - mean(real)`, generator loss `-mean(fake)`
///
/// Critic parameters are clipped to `[-clip, clip]` after every critic update.
#[derive(Debug, Clone, Copy)]
pub struct Wasserstein {
    pub clip: f32,
}

impl Default for Wasserstein {
    fn default() -> Self {
        Self { clip: 0.01 }
    }
}

fn mean(x: ArrayView1<'_, f32>) -> f32 {
    x.mean().unwrap_or(0.0)
}

impl AdversarialLoss for Wasserstein {
    fn name(&self) -> &'static str {
        "wasserstein"
    }

    fn discriminator_loss(&self, real: ArrayView1<'_, f32>, fake: ArrayView1<'_, f32>) -> DiscriminatorLoss {
        DiscriminatorLoss {
            value: mean(fake) - mean(real),
            grad_real: Array1::from_elem(real.len(), -1.0 / real.len().max(1) as f32),
            grad_fake: Array1::from_elem(fake.len(), 1.0 / fake.len().max(1) as f32),
        }
    }

    fn generator_loss(&self, fake: ArrayView1<'_, f32>) -> LossGrad {
        LossGrad { value: -mean(fake), grad: Array1::from_elem(fake.len(), -1.0 / fake.len().max(1) as f32) }
    }

    fn constrain_discriminator(&self, params: &mut [&mut Parameter]) {
        for param in params.iter_mut() {
            param.clamp(-self.clip, self.clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_critic_loss() {
        let loss = Wasserstein::default().discriminator_loss(arr1(&[2.0, 4.0]).view(), arr1(&[1.0]).view());
        assert_abs_diff_eq!(loss.value, -2.0);
        assert_eq!(loss.grad_real, arr1(&[-0.5, -0.5]));
        assert_eq!(loss.grad_fake, arr1(&[1.0]));
    }

    #[test]
    fn test_clipping() {
        let mut p = Parameter::new(&[3], arr1(&[-1.0, 0.005, 1.0])).unwrap();
        Wasserstein::default().constrain_discriminator(&mut [&mut p]);
        assert_eq!(p.data(), &arr1(&[-0.01, 0.005, 0.01]));
    }
}
