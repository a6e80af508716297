//! Configuration types for the reference networks.

use serde::{Deserialize, Serialize};

/// Configuration for [`MlpGenerator`](super::MlpGenerator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Dimension of the latent space
    pub latent_dim: usize,
    /// Hidden layer width
    pub hidden_dim: usize,
    /// Width of a generated sample
    pub sample_dim: usize,
    /// Number of classes for the label embedding (0 disables it)
    pub num_classes: usize,
    /// Negative slope of the hidden leaky ReLU
    pub leaky_slope: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { latent_dim: 16, hidden_dim: 64, sample_dim: 2, num_classes: 8, leaky_slope: 0.2 }
    }
}

/// Configuration for [`MlpDiscriminator`](super::MlpDiscriminator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminatorConfig {
    /// Width of an input sample
    pub sample_dim: usize,
    /// Hidden layer width
    pub hidden_dim: usize,
    /// Number of classes for the label embedding (0 disables it)
    pub num_classes: usize,
    /// Negative slope of the hidden leaky ReLU
    pub leaky_slope: f32,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self { sample_dim: 2, hidden_dim: 64, num_classes: 8, leaky_slope: 0.2 }
    }
}
