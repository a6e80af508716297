//! Network capabilities the trainer consumes
//!
//! The trainer never inspects a network's architecture. It needs parameters
//! (to toggle tracking, clear and step), a train/eval flag, and a forward pass.

use crate::autograd::Context;
use crate::Tensor;
use serde::{Deserialize, Serialize};

/// Parameters and mode shared by generators and discriminators
pub trait Network {
    fn parameters(&self) -> Vec<&Tensor>;

    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    fn context(&self) -> &Context;

    fn context_mut(&mut self) -> &mut Context;

    fn train(&mut self) {
        self.context_mut().train();
    }

    fn eval(&mut self) {
        self.context_mut().eval();
    }

    fn is_training(&self) -> bool {
        self.context().is_training()
    }

    /// Enable or disable gradient tracking on every parameter
    fn set_requires_grad(&mut self, requires_grad: bool) {
        for param in self.parameters_mut() {
            param.set_requires_grad(requires_grad);
        }
    }

    /// True if any parameter tracks gradients
    fn requires_grad(&self) -> bool {
        self.parameters().iter().any(|p| p.requires_grad())
    }

    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.len()).sum()
    }
}

/// Maps noise (and optionally class labels) to a batch of samples
pub trait Generator: Network {
    fn latent_dim(&self) -> usize;

    /// Width of one generated sample
    fn sample_dim(&self) -> usize;

    /// `noise` is `batch × latent_dim`; the result is `batch × sample_dim`
    fn generate(&self, noise: &Tensor, labels: Option<&[usize]>) -> Tensor;

    /// Number of label classes the network embeds; 0 ignores labels
    fn num_classes(&self) -> usize {
        0
    }
}

/// Scores a batch of samples, one real value per sample
pub trait Discriminator: Network {
    /// Width of one input sample
    fn sample_dim(&self) -> usize;

    /// `samples` is `batch × sample_dim`; the result has `batch` scores
    fn score(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor;

    /// ∂(Σ score)/∂samples, `batch × sample_dim`.
    ///
    /// The result is built from differentiable ops on the parameters, so a
    /// loss on it back-propagates into the discriminator (double backprop).
    fn input_gradient(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor;

    /// Number of label classes the network embeds; 0 ignores labels
    fn num_classes(&self) -> usize {
        0
    }
}

impl<T: Network + ?Sized> Network for Box<T> {
    fn parameters(&self) -> Vec<&Tensor> {
        (**self).parameters()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        (**self).parameters_mut()
    }

    fn context(&self) -> &Context {
        (**self).context()
    }

    fn context_mut(&mut self) -> &mut Context {
        (**self).context_mut()
    }
}

impl<T: Generator + ?Sized> Generator for Box<T> {
    fn latent_dim(&self) -> usize {
        (**self).latent_dim()
    }

    fn sample_dim(&self) -> usize {
        (**self).sample_dim()
    }

    fn generate(&self, noise: &Tensor, labels: Option<&[usize]>) -> Tensor {
        (**self).generate(noise, labels)
    }

    fn num_classes(&self) -> usize {
        (**self).num_classes()
    }
}

impl<T: Discriminator + ?Sized> Discriminator for Box<T> {
    fn sample_dim(&self) -> usize {
        (**self).sample_dim()
    }

    fn score(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor {
        (**self).score(samples, labels)
    }

    fn input_gradient(&self, samples: &Tensor, labels: Option<&[usize]>) -> Tensor {
        (**self).input_gradient(samples, labels)
    }

    fn num_classes(&self) -> usize {
        (**self).num_classes()
    }
}

/// Whether labels are fed to the networks; fixed for the lifetime of a trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conditioning {
    /// Networks take `(samples, labels)`
    #[default]
    Conditional,
    /// Networks take `(samples)`; labels are ignored
    Unconditional,
}

impl Conditioning {
    /// The labels to pass to a network call under this mode
    pub fn labels<'a>(&self, labels: &'a [usize]) -> Option<&'a [usize]> {
        match self {
            Self::Conditional => Some(labels),
            Self::Unconditional => None,
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::Conditional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditioning_labels() {
        let labels = [1, 2, 3];
        assert_eq!(Conditioning::Conditional.labels(&labels), Some(&labels[..]));
        assert_eq!(Conditioning::Unconditional.labels(&labels), None);
        assert!(Conditioning::default().is_conditional());
    }
}
