//! Adversarial objectives
//!
//! An [`AdversarialLoss`] turns discriminator logits into a scalar loss and
//! per-sample logit gradients. [`AdversarialObjective`] binds one to a pair of
//! optimizers and drives the two alternating update procedures.

mod bound;
mod least_squares;
mod minmax;
mod wasserstein;

pub use bound::AdversarialObjective;
pub use least_squares::LeastSquares;
pub use minmax::MinMax;
pub use wasserstein::Wasserstein;

use crate::error::{Error, Result};
use crate::nn::Parameter;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loss value and its gradient with respect to one batch of logits
#[derive(Debug, Clone, PartialEq)]
pub struct LossGrad {
    pub value: f32,
    pub grad: Array1<f32>,
}

/// Discriminator loss over a real and a generated batch
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorLoss {
    pub value: f32,
    pub grad_real: Array1<f32>,
    pub grad_fake: Array1<f32>,
}

/// An adversarial formulation
///
/// Logits are the raw, unbounded discriminator outputs, one per sample.
/// Gradients are with respect to those logits and already include the batch
/// averaging.
pub trait AdversarialLoss: fmt::Debug {
    fn name(&self) -> &'static str;

    fn discriminator_loss(&self, real: ArrayView1<'_, f32>, fake: ArrayView1<'_, f32>) -> DiscriminatorLoss;

    /// Loss of the generator, pushing `fake` logits toward "real"
    fn generator_loss(&self, fake: ArrayView1<'_, f32>) -> LossGrad;

    /// Loss against explicit per-sample targets in `[0, 1]`
    fn labeled_loss(&self, logits: ArrayView1<'_, f32>, targets: ArrayView1<'_, f32>) -> LossGrad {
        binary_cross_entropy(logits, targets)
    }

    /// Projection applied to discriminator parameters after every update
    fn constrain_discriminator(&self, _params: &mut [&mut Parameter]) {}
}

/// Names accepted by [`ObjectiveKind::from_str`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    MinMax,
    Wasserstein,
    LeastSquares,
}

impl ObjectiveKind {
    pub fn loss(self) -> Box<dyn AdversarialLoss> {
        match self {
            Self::MinMax => Box::new(MinMax),
            Self::Wasserstein => Box::new(Wasserstein::default()),
            Self::LeastSquares => Box::new(LeastSquares),
        }
    }
}

impl FromStr for ObjectiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minmax" | "min_max" => Ok(Self::MinMax),
            "wasserstein" | "wgan" => Ok(Self::Wasserstein),
            "least_squares" | "lsgan" => Ok(Self::LeastSquares),
            other => Err(Error::Config(format!("Objective '{other}' is unknown"))),
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MinMax => "minmax",
            Self::Wasserstein => "wasserstein",
            Self::LeastSquares => "least_squares",
        };
        f.write_str(name)
    }
}

/// Numerically stable logistic function
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Mean binary cross-entropy on logits
///
/// `max(x, 0) - x*y + ln(1 + e^-|x|)` per sample, gradient `(σ(x) - y) / n`.
pub fn binary_cross_entropy(logits: ArrayView1<'_, f32>, targets: ArrayView1<'_, f32>) -> LossGrad {
    let n = logits.len().max(1) as f32;
    let mut total = 0.0;
    let mut grad = Array1::zeros(logits.len());
    Zip::from(&mut grad).and(&logits).and(&targets).for_each(|g, &x, &y| {
        total += x.max(0.0) - x * y + (-x.abs()).exp().ln_1p();
        *g = (sigmoid(x) - y) / n;
    });
    LossGrad { value: total / n, grad }
}
