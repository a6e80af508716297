//! Latent noise and Gaussian initialisation helpers

use crate::Tensor;
use rand::Rng;

/// One standard-normal draw (Box-Muller transform)
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
}

/// `len` draws from N(0, std²)
pub fn normal_vec<R: Rng + ?Sized>(rng: &mut R, len: usize, std: f32) -> Vec<f32> {
    (0..len).map(|_| standard_normal(rng) * std).collect()
}

/// A `batch × latent_dim` noise batch from N(0, I), not tracking gradients
pub fn sample_noise<R: Rng + ?Sized>(rng: &mut R, batch: usize, latent_dim: usize) -> Tensor {
    Tensor::from_vec(normal_vec(rng, batch * latent_dim, 1.0), false)
}

/// Xavier/Glorot-scaled Gaussian weights for a `fan_in × fan_out` matrix
pub fn xavier<R: Rng + ?Sized>(rng: &mut R, fan_in: usize, fan_out: usize) -> Tensor {
    let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
    Tensor::from_vec(normal_vec(rng, fan_in * fan_out, std), true)
}
