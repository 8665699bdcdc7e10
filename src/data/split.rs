//! Positional train/validation partition

use crate::error::{Error, Result};
use ndarray::{ArrayD, Axis};

/// Train samples plus an optional held-out tail
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: ArrayD<f32>,
    pub validation: Option<ArrayD<f32>>,
}

impl DatasetSplit {
    /// Split `dataset` at `floor(n * (1 - fraction))` when `0 < fraction < 1`
    ///
    /// No shuffling: the validation set is always the tail. Any other
    /// fraction keeps the whole dataset for training and no validation set.
    pub fn partition(dataset: &ArrayD<f32>, fraction: f32) -> Result<Self> {
        if dataset.ndim() == 0 || dataset.len_of(Axis(0)) == 0 {
            return Err(Error::Dataset("dataset has no samples".to_string()));
        }
        let n = dataset.len_of(Axis(0));
        if !(fraction > 0.0 && fraction < 1.0) {
            return Ok(Self { train: dataset.clone(), validation: None });
        }
        let split_at = (n as f32 * (1.0 - fraction)).floor() as usize;
        if split_at == 0 {
            return Err(Error::Dataset(format!(
                "validation fraction {fraction} leaves no training samples out of {n}"
            )));
        }
        let (train, validation) = dataset.view().split_at(Axis(0), split_at);
        let validation = (validation.len_of(Axis(0)) > 0).then(|| validation.to_owned());
        Ok(Self { train: train.to_owned(), validation })
    }

    pub fn train_len(&self) -> usize {
        self.train.len_of(Axis(0))
    }

    pub fn validation_len(&self) -> usize {
        self.validation.as_ref().map_or(0, |v| v.len_of(Axis(0)))
    }
}
