//! Optimizer trait

use crate::nn::Parameter;

/// Trait for optimization algorithms
///
/// An optimizer owns per-parameter state (moments, velocities) indexed by the
/// position of each parameter in the slice handed to [`Optimizer::step`], so it
/// must always be stepped with the same network's parameters in the same order.
pub trait Optimizer {
    /// Apply one update using the gradients accumulated in `params`
    fn step(&mut self, params: &mut [&mut Parameter]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [&mut Parameter]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}
