//! Loop state threaded through the trainers

use super::history::TrainingHistory;
use crate::nn::Weights;
use ndarray::{Array2, ArrayD};

/// Lifecycle of a trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerPhase {
    Unbuilt,
    Built,
    Training,
    Done,
}

/// Generator weights captured at a best metric
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSnapshot {
    pub epoch: usize,
    pub metric: f32,
    pub weights: Weights,
}

/// Batches used by the last updates of an epoch, reused for loss readout
#[derive(Debug, Clone)]
pub struct StepBatches {
    pub real: ArrayD<f32>,
    pub latent: Array2<f32>,
}

/// Everything one `train` call mutates besides the networks
#[derive(Debug, Clone)]
pub struct TrainerState {
    pub epoch: usize,
    pub history: TrainingHistory,
    pub best: Option<GeneratorSnapshot>,
    pub d_loss: f32,
    pub g_loss: f32,
    /// Mean metric of the latest recorded checkpoint
    pub metric: Option<f32>,
}

impl TrainerState {
    pub fn new(history: TrainingHistory) -> Self {
        Self { epoch: 0, history, best: None, d_loss: 0.0, g_loss: 0.0, metric: None }
    }

    /// Whether `metric` is strictly below the current best
    pub fn improves(&self, metric: f32) -> bool {
        self.improves_scaled(metric, 1.0)
    }

    /// Whether `metric * scale` is below the current best; true without a best
    ///
    /// A non-finite metric never improves.
    pub fn improves_scaled(&self, metric: f32, scale: f32) -> bool {
        metric.is_finite() && self.best.as_ref().map_or(true, |best| metric * scale < best.metric)
    }

    /// Take a snapshot and publish its metric as the history's best
    pub fn keep_best(&mut self, epoch: usize, metric: f32, weights: Weights) {
        self.history.set_best_metric(metric);
        self.best = Some(GeneratorSnapshot { epoch, metric, weights });
    }

    /// Forget the snapshot, e.g. after the generator changed shape
    pub fn reset_best(&mut self) {
        self.best = None;
        self.history.clear_best_metric();
    }
}
