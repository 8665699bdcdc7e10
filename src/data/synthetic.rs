//! Synthetic image datasets

use ndarray::{Array4, ArrayD};
use rand::Rng;

/// `count` NHWC images of linear colour gradients in `[-1, 1]`
///
/// Each image gets a random direction and phase per channel, which gives a
/// simple distribution a generator can learn quickly.
pub fn gradient_images<R: Rng>(rng: &mut R, count: usize, side: usize, channels: usize) -> ArrayD<f32> {
    let mut images = Array4::zeros((count, side, side, channels));
    let scale = 1.0 / side.max(1) as f32;
    for mut image in images.outer_iter_mut() {
        let params: Vec<(f32, f32, f32)> = (0..channels)
            .map(|_| (rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0), rng.random_range(-0.5..=0.5)))
            .collect();
        for ((y, x, c), v) in image.indexed_iter_mut() {
            let (dy, dx, phase) = params[c];
            *v = (dy * y as f32 * scale + dx * x as f32 * scale + phase).clamp(-1.0, 1.0);
        }
    }
    images.into_dyn()
}
