//! Original GAN objective

use super::{binary_cross_entropy, AdversarialLoss, DiscriminatorLoss, LossGrad};
use ndarray::{Array1, ArrayView1};

/// Binary cross-entropy with real labelled 1 and generated labelled 0
///
/// The generator uses the non-saturating form: cross-entropy of its samples
/// against label 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl AdversarialLoss for MinMax {
    fn name(&self) -> &'static str {
        "minmax"
    }

    fn discriminator_loss(&self, real: ArrayView1<'_, f32>, fake: ArrayView1<'_, f32>) -> DiscriminatorLoss {
        let real_loss = binary_cross_entropy(real, Array1::ones(real.len()).view());
        let fake_loss = binary_cross_entropy(fake, Array1::zeros(fake.len()).view());
        DiscriminatorLoss {
            value: real_loss.value + fake_loss.value,
            grad_real: real_loss.grad,
            grad_fake: fake_loss.grad,
        }
    }

    fn generator_loss(&self, fake: ArrayView1<'_, f32>) -> LossGrad {
        binary_cross_entropy(fake, Array1::ones(fake.len()).view())
    }
}
