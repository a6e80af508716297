//! Reference generator: one hidden leaky-ReLU layer over the latent code.

use rand::Rng;

use super::config::GeneratorConfig;
use super::latent::xavier;
use super::network::{Generator, Network};
use crate::autograd::{add, broadcast_rows, gather_rows, leaky_relu, matmul, Context};
use crate::Tensor;

/// MLP generator mapping latent vectors (plus an optional class) to samples
///
/// ```text
/// h   = leaky_relu(z·W1 + b1 + E[label])
/// out = h·W2 + b2
/// ```
#[derive(Debug)]
pub struct MlpGenerator {
    pub config: GeneratorConfig,
    w1: Tensor,
    b1: Tensor,
    /// Class embedding added to the hidden pre-activation; absent when `num_classes == 0`
    embedding: Option<Tensor>,
    w2: Tensor,
    b2: Tensor,
    context: Context,
}

impl MlpGenerator {
    /// Create a new generator with random initialization
    pub fn new(config: GeneratorConfig) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::from_os_rng();
        Self::init(config, &mut rng)
    }

    /// Create a new generator with a seed for reproducibility
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::init(config, &mut rng)
    }

    fn init<R: Rng>(config: GeneratorConfig, rng: &mut R) -> Self {
        let (l, h, s) = (config.latent_dim, config.hidden_dim, config.sample_dim);
        let embedding = (config.num_classes > 0).then(|| xavier(rng, config.num_classes, h));
        Self {
            w1: xavier(rng, l, h),
            b1: Tensor::zeros(h, true),
            embedding,
            w2: xavier(rng, h, s),
            b2: Tensor::zeros(s, true),
            context: Context::new(),
            config,
        }
    }
}

impl Clone for MlpGenerator {
    /// Deep copy: the clone owns fresh gradient cells
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            w1: self.w1.copy_leaf(),
            b1: self.b1.copy_leaf(),
            embedding: self.embedding.as_ref().map(Tensor::copy_leaf),
            w2: self.w2.copy_leaf(),
            b2: self.b2.copy_leaf(),
            context: self.context,
        }
    }
}

impl Network for MlpGenerator {
    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = vec![&self.w1, &self.b1];
        params.extend(self.embedding.as_ref());
        params.extend([&self.w2, &self.b2]);
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = vec![&mut self.w1, &mut self.b1];
        params.extend(self.embedding.as_mut());
        params.extend([&mut self.w2, &mut self.b2]);
        params
    }

    fn context(&self) -> &Context {
        &self.context
    }

    fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Generator for MlpGenerator {
    fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }

    fn sample_dim(&self) -> usize {
        self.config.sample_dim
    }

    /// # Panics
    ///
    /// Panics if `noise` is not a whole number of latent rows or a label is
    /// outside the embedding table.
    fn generate(&self, noise: &Tensor, labels: Option<&[usize]>) -> Tensor {
        let (l, h, s) = (self.config.latent_dim, self.config.hidden_dim, self.config.sample_dim);
        assert!(l > 0 && noise.len() % l == 0, "generate: noise is not batch × latent_dim");
        let n = noise.len() / l;

        let mut pre = add(&matmul(noise, &self.w1, n, l, h), &broadcast_rows(&self.b1, n));
        if let (Some(table), Some(labels)) = (&self.embedding, labels) {
            pre = add(&pre, &gather_rows(table, labels, h));
        }
        let hidden = leaky_relu(&pre, self.config.leaky_slope);
        add(&matmul(&hidden, &self.w2, n, h, s), &broadcast_rows(&self.b2, n))
    }

    fn num_classes(&self) -> usize {
        if self.embedding.is_some() {
            self.config.num_classes
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{backward, sum};

    fn small() -> GeneratorConfig {
        GeneratorConfig { latent_dim: 3, hidden_dim: 5, sample_dim: 2, num_classes: 4, leaky_slope: 0.2 }
    }

    #[test]
    fn test_generator_output_shape() {
        let gen = MlpGenerator::with_seed(small(), 42);
        let noise = Tensor::ones(6 * 3, false);
        assert_eq!(gen.generate(&noise, None).len(), 6 * 2);
        assert_eq!(gen.generate(&noise, Some(&[0, 1, 2, 3, 0, 1])).len(), 6 * 2);
    }

    #[test]
    fn test_generator_deterministic() {
        let a = MlpGenerator::with_seed(small(), 7);
        let b = MlpGenerator::with_seed(small(), 7);
        let noise = Tensor::from_vec(vec![0.1, -0.4, 0.9], false);
        assert_eq!(a.generate(&noise, Some(&[2])).data(), b.generate(&noise, Some(&[2])).data());
    }

    #[test]
    fn test_labels_change_output() {
        let gen = MlpGenerator::with_seed(small(), 3);
        let noise = Tensor::from_vec(vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5], false);
        let out = gen.generate(&noise, Some(&[0, 3])).data().to_vec();
        assert_ne!(out[0..2], out[2..4]);
    }

    #[test]
    fn test_unconditional_has_no_embedding() {
        let config = GeneratorConfig { num_classes: 0, ..small() };
        let gen = MlpGenerator::with_seed(config, 1);
        assert_eq!(gen.parameters().len(), 4);
        assert_eq!(gen.num_classes(), 0);
        assert_eq!(gen.num_parameters(), 3 * 5 + 5 + 5 * 2 + 2);
    }

    #[test]
    fn test_frozen_generator_builds_no_graph() {
        let mut gen = MlpGenerator::with_seed(small(), 5);
        gen.set_requires_grad(false);
        assert!(!gen.requires_grad());
        let out = gen.generate(&Tensor::ones(3, false), Some(&[1]));
        assert!(out.backward_op().is_none());
    }

    #[test]
    fn test_generator_backward_reaches_parameters() {
        let gen = MlpGenerator::with_seed(small(), 9);
        let out = gen.generate(&Tensor::ones(3, false), Some(&[1]));
        backward(&sum(&out), None);
        for param in gen.parameters() {
            assert!(param.grad().is_some());
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut gen = MlpGenerator::with_seed(small(), 11);
        let copy = gen.clone();
        gen.parameters_mut()[0].data_mut()[0] += 1.0;
        assert_ne!(gen.parameters()[0].data()[0], copy.parameters()[0].data()[0]);
    }
}
