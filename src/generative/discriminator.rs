//! Reference discriminators: a one-hidden-layer MLP critic and a linear scorer.

use rand::Rng;

use super::config::DiscriminatorConfig;
use super::latent::xavier;
use super::network::{Discriminator, Network};
use crate::autograd::{
    add, broadcast_rows, gather_rows, leaky_relu, leaky_relu_mask, matmul, mul, transpose_tensor,
    Context,
};
use crate::Tensor;

fn batch_rows(samples: &Tensor, sample_dim: usize) -> usize {
    assert!(
        sample_dim > 0 && samples.len() % sample_dim == 0,
        "discriminator: samples are not batch × sample_dim"
    );
    samples.len() / sample_dim
}

/// MLP critic with a class embedding on the hidden pre-activation
///
/// ```text
/// pre   = x·W1 + b1 + E[label]
/// score = leaky_relu(pre)·w2 + b2
/// ```
#[derive(Debug)]
pub struct MlpDiscriminator {
    pub config: DiscriminatorConfig,
    w1: Tensor,
    b1: Tensor,
    embedding: Option<Tensor>,
    w2: Tensor,
    b2: Tensor,
    context: Context,
}

impl MlpDiscriminator {
    /// Create a new discriminator with random initialization
    pub fn new(config: DiscriminatorConfig) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::from_os_rng();
        Self::init(config, &mut rng)
    }

    /// Create a new discriminator with a seed for reproducibility
    pub fn with_seed(config: DiscriminatorConfig, seed: u64) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::init(config, &mut rng)
    }

    fn init<R: Rng>(config: DiscriminatorConfig, rng: &mut R) -> Self {
        let (d, h) = (config.sample_dim, config.hidden_dim);
        let embedding = (config.num_classes > 0).then(|| xavier(rng, config.num_classes, h));
        Self {
            w1: xavier(rng, d, h),
            b1: Tensor::zeros(h, true),
            embedding,
            w2: xavier(rng, h, 1),
            b2: Tensor::zeros(1, true),
            context: Context::new(),
            config,
        }
    }

    fn pre_activation(&self, samples: &Tensor, labels: Option<&[usize]>) -> (Tensor, usize) {
        let (d, h) = (self.config.sample_dim, self.config.hidden_dim);
        let n = batch_rows(samples, d);
        let mut pre = add(&matmul(samples, &self.w1, n, d, h), &broadcast_rows(&self.b1, n));
        if let (Some(table), Some(labels)) = (&self.embedding, labels) {
            pre = add(&pre, &gather_rows(table, labels, h));
        }
        (pre, n)
    }
}

impl Network for MlpDiscriminator {
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

impl Discriminator for MlpDiscriminator {
    fn sample_dim(&self) -> usize {
        self.config.sample_dim
    }

    fn score(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor {
        let h = self.config.hidden_dim;
        let (pre, n) = self.pre_activation(samples, labels);
        let hidden = leaky_relu(&pre, self.config.leaky_slope);
        add(&matmul(&hidden, &self.w2, n, h, 1), &broadcast_rows(&self.b2, n))
    }

    /// Row n is `W1 · (mask_n ⊙ w2)`, with the leaky-ReLU slopes held fixed.
    fn input_gradient(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor {
        let (d, h) = (self.config.sample_dim, self.config.hidden_dim);
        let (pre, n) = self.pre_activation(samples, labels);
        let slopes = leaky_relu_mask(&pre.data().to_vec(), self.config.leaky_slope);
        let gated = mul(&Tensor::from_vec(slopes, false), &broadcast_rows(&self.w2, n));
        matmul(&gated, &transpose_tensor(&self.w1, d, h), n, h, d)
    }

    fn num_classes(&self) -> usize {
        if self.embedding.is_some() {
            self.config.num_classes
        } else {
            0
        }
    }
}

/// Linear scorer `score = x·w + b`; its input gradient is `w` on every row
#[derive(Debug)]
pub struct LinearDiscriminator {
    sample_dim: usize,
    w: Tensor,
    b: Tensor,
    context: Context,
}

impl LinearDiscriminator {
    pub fn new(sample_dim: usize) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::from_os_rng();
        Self::from_weights(xavier(&mut rng, sample_dim, 1).data().to_vec(), 0.0)
    }

    pub fn with_seed(sample_dim: usize, seed: u64) -> Self {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::from_weights(xavier(&mut rng, sample_dim, 1).data().to_vec(), 0.0)
    }

    /// Scorer with explicit weights and bias
    pub fn from_weights(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            sample_dim: weights.len(),
            w: Tensor::from_vec(weights, true),
            b: Tensor::from_vec(vec![bias], true),
            context: Context::new(),
        }
    }

    pub fn weights(&self) -> &Tensor {
        &self.w
    }
}

impl Network for LinearDiscriminator {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }

    fn context(&self) -> &Context {
        &self.context
    }

    fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Discriminator for LinearDiscriminator {
    fn sample_dim(&self) -> usize {
        self.sample_dim
    }

    fn score(&self, samples: &Tensor, _labels: Option<&[usize]>) -> Tensor {
        let n = batch_rows(samples, self.sample_dim);
        add(&matmul(samples, &self.w, n, self.sample_dim, 1), &broadcast_rows(&self.b, n))
    }

    fn input_gradient(&self, samples: &Tensor, _labels: Option<&[usize]>) -> Tensor {
        broadcast_rows(&self.w, batch_rows(samples, self.sample_dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{backward, sum};
    use crate::generative::latent::sample_noise;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> DiscriminatorConfig {
        DiscriminatorConfig { sample_dim: 3, hidden_dim: 6, num_classes: 2, leaky_slope: 0.2 }
    }

    #[test]
    fn test_discriminator_one_score_per_row() {
        let disc = MlpDiscriminator::with_seed(small(), 42);
        let x = Tensor::ones(4 * 3, false);
        assert_eq!(disc.score(&x, None).len(), 4);
        assert_eq!(disc.score(&x, Some(&[0, 1, 1, 0])).len(), 4);
    }

    #[test]
    fn test_discriminator_deterministic() {
        let a = MlpDiscriminator::with_seed(small(), 1);
        let b = MlpDiscriminator::with_seed(small(), 1);
        let x = Tensor::from_vec(vec![0.3, -1.0, 2.0], false);
        assert_eq!(a.score(&x, Some(&[1])).data(), b.score(&x, Some(&[1])).data());
    }

    #[test]
    fn test_mlp_input_gradient_matches_finite_difference() {
        let disc = MlpDiscriminator::with_seed(small(), 17);
        let x = sample_noise(&mut StdRng::seed_from_u64(2), 2, 3);
        let labels = [1, 0];
        let analytic = disc.input_gradient(&x, Some(&labels));
        assert_eq!(analytic.len(), 6);

        let eps = 1e-3;
        for i in 0..x.len() {
            let mut plus = x.clone();
            plus.data_mut()[i] += eps;
            let mut minus = x.clone();
            minus.data_mut()[i] -= eps;
            let fd = (disc.score(&plus, Some(&labels)).data().sum()
                - disc.score(&minus, Some(&labels)).data().sum())
                / (2.0 * eps);
            assert_abs_diff_eq!(analytic.data()[i], fd, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_input_gradient_backpropagates_into_parameters() {
        let disc = MlpDiscriminator::with_seed(small(), 4);
        let x = Tensor::ones(3, false);
        let g = disc.input_gradient(&x, None);
        backward(&sum(&g), None);
        assert!(disc.parameters()[0].grad().is_some(), "W1 receives second-order gradient");
        assert!(disc.parameters()[3].grad().is_some(), "w2 receives second-order gradient");
    }

    #[test]
    fn test_linear_score_and_gradient() {
        let disc = LinearDiscriminator::from_weights(vec![3.0, 4.0], 1.0);
        let x = Tensor::from_vec(vec![1.0, 1.0, 0.0, 2.0], false);
        assert_eq!(disc.score(&x, None).data().to_vec(), vec![8.0, 9.0]);
        assert_eq!(disc.input_gradient(&x, None).data().to_vec(), vec![3.0, 4.0, 3.0, 4.0]);
        assert_eq!(disc.num_parameters(), 3);
        assert_eq!(disc.num_classes(), 0);
    }

    #[test]
    fn test_num_classes_follows_embedding() {
        assert_eq!(MlpDiscriminator::with_seed(small(), 0).num_classes(), 2);
        let config = DiscriminatorConfig { num_classes: 0, ..small() };
        assert_eq!(MlpDiscriminator::with_seed(config, 0).num_classes(), 0);
    }

    #[test]
    fn test_frozen_discriminator_builds_no_graph() {
        let mut disc = LinearDiscriminator::with_seed(2, 0);
        disc.set_requires_grad(false);
        let s = disc.score(&Tensor::ones(2, false), None);
        assert!(s.backward_op().is_none());
        disc.set_requires_grad(true);
        assert!(disc.requires_grad());
    }
}
