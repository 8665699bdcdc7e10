//! Weight initialisation
//!
//! Every layer draws its initial weights from an RNG derived from the builder
//! seed and the layer name, so a layer built twice with the same name and seed
//! starts from identical values regardless of what else the network contains.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// RNG for the layer called `name` under `seed`
pub fn layer_rng(seed: u64, name: &str) -> StdRng {
    // FNV-1a over the name, mixed with the seed
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in name.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    StdRng::seed_from_u64(seed ^ hash)
}

/// Standard normal sample scaled by `std` (Box-Muller)
pub fn sample_normal<R: Rng>(rng: &mut R, std: f64) -> f32 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    (z * std) as f32
}

/// Xavier/Glorot normal initialisation of `len` values
pub fn xavier<R: Rng>(rng: &mut R, fan_in: usize, fan_out: usize, len: usize) -> Array1<f32> {
    let std = (2.0 / (fan_in + fan_out).max(1) as f64).sqrt();
    (0..len).map(|_| sample_normal(rng, std)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_rng_deterministic() {
        let a = xavier(&mut layer_rng(7, "g_head"), 4, 4, 16);
        let b = xavier(&mut layer_rng(7, "g_head"), 4, 4, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layer_rng_depends_on_name_and_seed() {
        let a = xavier(&mut layer_rng(7, "g_head"), 4, 4, 16);
        let b = xavier(&mut layer_rng(7, "d_head"), 4, 4, 16);
        let c = xavier(&mut layer_rng(8, "g_head"), 4, 4, 16);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_xavier_scale() {
        let w = xavier(&mut layer_rng(1, "w"), 50, 50, 10_000);
        let mean = w.mean().unwrap_or(0.0);
        let var = w.mapv(|v| (v - mean) * (v - mean)).mean().unwrap_or(0.0);
        // expected variance 2 / (50 + 50) = 0.02
        assert!((var - 0.02).abs() < 0.004, "variance {var}");
        assert!(mean.abs() < 0.01);
    }
}
