//! Checkpoint history

use crate::error::{Error, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Summary of one series entry: mean, min and max over an evaluation batch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

impl SeriesStats {
    /// Summarise `values`; an empty batch summarises to zeros
    ///
    /// Any NaN makes the mean NaN; min and max skip NaNs and are NaN only when
    /// every value is.
    pub fn of(values: ArrayView1<'_, f32>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if min > max {
            return Self { mean: f32::NAN, min: f32::NAN, max: f32::NAN };
        }
        let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let mean = (sum / values.len() as f64) as f32;
        if mean.is_nan() {
            return Self { mean, min, max };
        }
        // rounding must not push the mean outside [min, max]
        Self { mean: mean.clamp(min, max), min, max }
    }

    /// A single value: mean, min and max coincide
    pub fn scalar(value: f32) -> Self {
        Self { mean: value, min: value, max: value }
    }
}

/// Fixed-capacity table of named series
///
/// Capacity is `epochs / checkpoint_interval + 1`, enough for every
/// checkpoint of the run. Each series holds `capacity` rows; rows at or past
/// `hist_size` are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    capacity: usize,
    hist_size: usize,
    best_metric: Option<f32>,
    series: BTreeMap<String, Vec<SeriesStats>>,
}

impl TrainingHistory {
    pub fn new(epochs: usize, checkpoint_interval: usize) -> Self {
        Self {
            capacity: epochs / checkpoint_interval.max(1) + 1,
            hist_size: 0,
            best_metric: None,
            series: BTreeMap::new(),
        }
    }

    /// Pre-create zero-filled series so they exist before the first checkpoint
    #[must_use]
    pub fn with_series(mut self, names: &[&str]) -> Self {
        for name in names {
            self.series.entry((*name).to_string()).or_insert_with(|| vec![SeriesStats::default(); self.capacity]);
        }
        self
    }

    /// Append one checkpoint row
    ///
    /// Series first seen here are created zero-filled; series not mentioned
    /// keep a zero row for this checkpoint.
    pub fn record(&mut self, entries: &[(&str, SeriesStats)]) -> Result<()> {
        if self.hist_size >= self.capacity {
            return Err(Error::Computation(format!("history is full ({} checkpoints)", self.capacity)));
        }
        let row = self.hist_size;
        for (name, stats) in entries {
            let series =
                self.series.entry((*name).to_string()).or_insert_with(|| vec![SeriesStats::default(); self.capacity]);
            series[row] = *stats;
        }
        self.hist_size += 1;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of recorded checkpoints
    pub fn hist_size(&self) -> usize {
        self.hist_size
    }

    pub fn best_metric(&self) -> Option<f32> {
        self.best_metric
    }

    pub fn set_best_metric(&mut self, value: f32) {
        self.best_metric = Some(value);
    }

    pub fn clear_best_metric(&mut self) {
        self.best_metric = None;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Full series, zero rows included
    pub fn series(&self, name: &str) -> Option<&[SeriesStats]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Recorded rows only
    pub fn recorded(&self, name: &str) -> Option<&[SeriesStats]> {
        self.series.get(name).map(|rows| &rows[..self.hist_size])
    }

    /// Latest recorded row of a series
    pub fn last(&self, name: &str) -> Option<SeriesStats> {
        self.recorded(name).and_then(|rows| rows.last().copied())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
