//! JSON dataset files

use crate::error::{Error, Result};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Row-major values with their shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDataset {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl JsonDataset {
    pub fn into_array(self) -> Result<ArrayD<f32>> {
        let expected: usize = self.shape.iter().product();
        if expected != self.data.len() {
            return Err(Error::Dataset(format!(
                "shape {:?} needs {expected} values, file has {}",
                self.shape,
                self.data.len()
            )));
        }
        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape), self.data)?)
    }

    pub fn from_array(array: &ArrayD<f32>) -> Self {
        Self { shape: array.shape().to_vec(), data: array.iter().copied().collect() }
    }
}

pub fn load_json(path: &Path) -> Result<ArrayD<f32>> {
    let text = fs::read_to_string(path)?;
    let dataset: JsonDataset = serde_json::from_str(&text)?;
    dataset.into_array()
}

pub fn save_json(path: &Path, array: &ArrayD<f32>) -> Result<()> {
    fs::write(path, serde_json::to_string(&JsonDataset::from_array(array))?)?;
    Ok(())
}
