//! YAML schema for a PID-GAN run

use serde::{Deserialize, Serialize};

use crate::generative::{Conditioning, DerivativeMode, GanType, PidType, RegType};

/// Complete run specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidGanSpec {
    /// Seed for network initialisation, data and noise (random when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub generator: GeneratorSpec,

    #[serde(default)]
    pub discriminator: DiscriminatorSpec,

    #[serde(default)]
    pub data: DataSpec,

    #[serde(default)]
    pub optimizer: OptimSpec,

    pub training: TrainingParams,
}

/// Generator architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    #[serde(default = "default_generator_name")]
    pub name: String,
    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,
    #[serde(default = "default_hidden_dim")]
    pub hidden_dim: usize,
}

impl Default for GeneratorSpec {
    fn default() -> Self {
        Self {
            name: default_generator_name(),
            latent_dim: default_latent_dim(),
            hidden_dim: default_hidden_dim(),
        }
    }
}

/// Discriminator family; decides whether labels reach the networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminatorKind {
    /// Conditional MLP critic
    #[default]
    Mlp,
    /// Unconditional MLP critic
    Wgan,
    /// Unconditional linear scorer
    Linear,
}

impl DiscriminatorKind {
    pub fn conditioning(&self) -> Conditioning {
        match self {
            Self::Mlp => Conditioning::Conditional,
            Self::Wgan | Self::Linear => Conditioning::Unconditional,
        }
    }
}

/// Discriminator architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminatorSpec {
    #[serde(default)]
    pub name: DiscriminatorKind,
    #[serde(default = "default_hidden_dim")]
    pub hidden_dim: usize,
}

impl Default for DiscriminatorSpec {
    fn default() -> Self {
        Self { name: DiscriminatorKind::default(), hidden_dim: default_hidden_dim() }
    }
}

/// Synthetic Gaussian-mixture data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    #[serde(default = "default_modes")]
    pub modes: usize,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_std")]
    pub std: f32,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self { modes: default_modes(), radius: default_radius(), std: default_std() }
    }
}

/// Optimizer settings shared by both networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimSpec {
    /// adam, adamw or sgd
    #[serde(default = "default_optimizer")]
    pub name: String,
    #[serde(default = "default_lr")]
    pub lr_g: f32,
    #[serde(default = "default_lr")]
    pub lr_d: f32,
    #[serde(default = "default_beta1")]
    pub beta1: f32,
    #[serde(default = "default_beta2")]
    pub beta2: f32,
    /// SGD momentum
    #[serde(default)]
    pub momentum: f32,
    /// Decoupled weight decay for adamw
    #[serde(default)]
    pub weight_decay: f32,
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self {
            name: default_optimizer(),
            lr_g: default_lr(),
            lr_d: default_lr(),
            beta1: default_beta1(),
            beta2: default_beta2(),
            momentum: 0.0,
            weight_decay: 0.0,
        }
    }
}

/// Control-loop hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub gan_type: GanType,

    #[serde(default)]
    pub reg_type: RegType,
    #[serde(default)]
    pub reg_param: f32,

    #[serde(default = "default_pv")]
    pub pv: f32,
    #[serde(default)]
    pub iv: f32,
    #[serde(default)]
    pub dv: f32,
    #[serde(default = "default_time_step")]
    pub time_step: f32,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    #[serde(default)]
    pub regularize_output_d: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_d: Option<f32>,
    #[serde(default = "default_sigmoid_coe")]
    pub sigmoid_coe: f32,

    #[serde(default)]
    pub pid_type: PidType,
    #[serde(default)]
    pub derivative_mode: DerivativeMode,
    #[serde(default = "default_capacity_factor")]
    pub replay_capacity_factor: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_push_limit: Option<usize>,

    /// Keep an exponential moving average of the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_average_beta: Option<f32>,

    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            gan_type: GanType::Standard,
            reg_type: RegType::None,
            reg_param: 0.0,
            pv: default_pv(),
            iv: 0.0,
            dv: 0.0,
            time_step: default_time_step(),
            batch_size: default_batch_size(),
            iterations: default_iterations(),
            regularize_output_d: 0.0,
            clip_d: None,
            sigmoid_coe: default_sigmoid_coe(),
            pid_type: PidType::Function,
            derivative_mode: DerivativeMode::Difference,
            replay_capacity_factor: default_capacity_factor(),
            replay_push_limit: None,
            model_average_beta: None,
            log_every: default_log_every(),
        }
    }
}

fn default_generator_name() -> String {
    "mlp".to_string()
}

fn default_latent_dim() -> usize {
    16
}

fn default_hidden_dim() -> usize {
    64
}

fn default_modes() -> usize {
    8
}

fn default_radius() -> f32 {
    2.0
}

fn default_std() -> f32 {
    0.02
}

fn default_optimizer() -> String {
    "adam".to_string()
}

fn default_lr() -> f32 {
    1e-4
}

fn default_beta1() -> f32 {
    0.5
}

fn default_beta2() -> f32 {
    0.999
}

fn default_pv() -> f32 {
    1.0
}

fn default_time_step() -> f32 {
    1.0
}

fn default_batch_size() -> usize {
    64
}

fn default_iterations() -> usize {
    1000
}

fn default_sigmoid_coe() -> f32 {
    1.0
}

fn default_capacity_factor() -> usize {
    10
}

fn default_log_every() -> usize {
    100
}
