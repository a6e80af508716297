//! Synthetic labelled data: a ring of 2-D Gaussian modes

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::latent::standard_normal;
use crate::{Error, Result, Tensor};

/// Width of one mixture sample
pub const SAMPLE_DIM: usize = 2;

/// `modes` isotropic Gaussians evenly spaced on a circle; the label is the mode index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianMixture {
    pub modes: usize,
    pub radius: f32,
    pub std: f32,
}

impl Default for GaussianMixture {
    fn default() -> Self {
        Self { modes: 8, radius: 2.0, std: 0.02 }
    }
}

impl GaussianMixture {
    pub fn new(modes: usize, radius: f32, std: f32) -> Result<Self> {
        if modes == 0 {
            return Err(Error::ConfigError("mixture needs at least one mode".to_string()));
        }
        if std.is_nan() || std < 0.0 || !radius.is_finite() {
            return Err(Error::ConfigError(format!("invalid mixture radius {radius} / std {std}")));
        }
        Ok(Self { modes, radius, std })
    }

    /// Center of mode `k`
    pub fn center(&self, k: usize) -> [f32; 2] {
        let angle = 2.0 * std::f32::consts::PI * k as f32 / self.modes as f32;
        [self.radius * angle.cos(), self.radius * angle.sin()]
    }

    /// A `batch × 2` sample tensor and its mode labels
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, batch: usize) -> (Tensor, Vec<usize>) {
        let mut data = Vec::with_capacity(batch * SAMPLE_DIM);
        let mut labels = Vec::with_capacity(batch);
        for _ in 0..batch {
            let k = rng.random_range(0..self.modes);
            let [cx, cy] = self.center(k);
            data.push(cx + self.std * standard_normal(rng));
            data.push(cy + self.std * standard_normal(rng));
            labels.push(k);
        }
        (Tensor::from_vec(data, false), labels)
    }

    /// Labels drawn uniformly over the modes
    pub fn sample_labels<R: Rng + ?Sized>(&self, rng: &mut R, batch: usize) -> Vec<usize> {
        (0..batch).map(|_| rng.random_range(0..self.modes)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_centers_on_circle() {
        let mix = GaussianMixture::new(4, 3.0, 0.1).unwrap();
        let [x, y] = mix.center(1);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_samples_sit_near_their_mode() {
        let mix = GaussianMixture::new(8, 2.0, 0.01).unwrap();
        let (x, labels) = mix.sample(&mut StdRng::seed_from_u64(5), 64);
        assert_eq!(x.len(), 128);
        assert_eq!(labels.len(), 64);
        for (row, &k) in x.data().as_slice().unwrap().chunks_exact(2).zip(&labels) {
            let [cx, cy] = mix.center(k);
            assert!((row[0] - cx).abs() < 0.1 && (row[1] - cy).abs() < 0.1);
        }
    }

    #[test]
    fn test_invalid_mixture() {
        assert!(GaussianMixture::new(0, 1.0, 0.1).is_err());
        assert!(GaussianMixture::new(2, 1.0, -0.1).is_err());
        let labels = GaussianMixture::default().sample_labels(&mut StdRng::seed_from_u64(0), 10);
        assert!(labels.iter().all(|&k| k < 8));
    }
}
