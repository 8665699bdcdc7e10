//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::nn::Parameter;
use ndarray::Array1;

/// SGD optimizer with optional momentum
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: f32,
    momentum: f32,
    velocities: Vec<Option<Array1<f32>>>,
}

impl Sgd {
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self { lr, momentum, velocities: Vec::new() }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        if self.velocities.len() < params.len() {
            self.velocities.resize(params.len(), None);
        }

        for (i, param) in params.iter_mut().enumerate() {
            let grad = param.grad();
            if self.momentum > 0.0 {
                // v = momentum * v - lr * grad
                let velocity = match self.velocities[i].take() {
                    Some(v) if v.len() == grad.len() => v * self.momentum - grad * self.lr,
                    _ => grad * -self.lr,
                };
                *param.data_mut() += &velocity;
                self.velocities[i] = Some(velocity);
            } else {
                let update = grad * self.lr;
                *param.data_mut() -= &update;
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    fn param_with_grad(data: &[f32], grad: &[f32]) -> Parameter {
        let mut param = Parameter::new(&[data.len()], arr1(data)).unwrap();
        param.accumulate_grad(arr1(grad).view()).unwrap();
        param
    }

    #[test]
    fn test_sgd_plain_step() {
        let mut opt = Sgd::new(0.1, 0.0);
        let mut p = param_with_grad(&[1.0, 2.0], &[0.5, -1.0]);
        opt.step(&mut [&mut p]);
        assert_abs_diff_eq!(p.data()[0], 0.95, epsilon = 1e-6);
        assert_abs_diff_eq!(p.data()[1], 2.1, epsilon = 1e-6);
    }

    #[test]
    fn test_sgd_momentum_accumulates() {
        let mut opt = Sgd::new(0.1, 0.9);
        let mut p = param_with_grad(&[0.0], &[1.0]);

        opt.step(&mut [&mut p]);
        assert_abs_diff_eq!(p.data()[0], -0.1, epsilon = 1e-6);

        // same gradient again: v = 0.9 * -0.1 - 0.1 = -0.19
        opt.step(&mut [&mut p]);
        assert_abs_diff_eq!(p.data()[0], -0.29, epsilon = 1e-6);
    }

    #[test]
    fn test_sgd_zero_grad_is_noop() {
        let mut opt = Sgd::new(0.1, 0.0);
        let mut p = Parameter::new(&[2], arr1(&[1.0, 2.0])).unwrap();
        opt.step(&mut [&mut p]);
        assert_eq!(p.data(), &arr1(&[1.0, 2.0]));
    }
}
