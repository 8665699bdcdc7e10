//! Dataset handling
//!
//! Datasets are `ArrayD<f32>` with samples along axis 0; image datasets are
//! NHWC.

mod io;
mod sampling;
mod split;
mod stats;
mod synthetic;

pub use io::{load_json, save_json, JsonDataset};
pub use sampling::{sample_batch, sample_latent};
pub use split::DatasetSplit;
pub use stats::SampleStats;
pub use synthetic::gradient_images;

use crate::error::{Error, Result};
use crate::nn::block_mean;
use ndarray::{ArrayD, Ix4};

/// Square side of an NHWC image dataset; must be a power of two of at least 4
pub fn image_side(dataset: &ArrayD<f32>) -> Result<usize> {
    match dataset.shape() {
        &[_, h, w, _] if h == w && h >= 4 && h.is_power_of_two() => Ok(h),
        shape => Err(Error::Dataset(format!(
            "expected square power-of-two images of side >= 4, got shape {shape:?}"
        ))),
    }
}

/// Block-mean down-sampling of an NHWC dataset to `resolution x resolution`
pub fn block_reduce(dataset: &ArrayD<f32>, resolution: usize) -> Result<ArrayD<f32>> {
    let images = dataset
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| Error::Dataset(format!("expected NHWC images, got shape {:?}", dataset.shape())))?;
    let side = images.dim().1;
    if resolution == 0 || side % resolution != 0 {
        return Err(Error::Dataset(format!("cannot reduce side {side} to {resolution}")));
    }
    Ok(block_mean(&images, side / resolution)?.into_dyn())
}
