//! GAN training under PID control
//!
//! - [`network`]: the capabilities the trainer needs from a generator and a
//!   discriminator, with reference MLP and linear implementations
//! - [`loss`]: the six adversarial loss formulations
//! - [`replay`]: bounded replay queues behind the integral term
//! - [`penalty`]: gradient penalties and the output regularizer
//! - [`trainer`]: the controller tying them together

pub mod average;
pub mod config;
pub mod data;
pub mod discriminator;
pub mod generator;
pub mod latent;
pub mod loss;
pub mod network;
pub mod penalty;
pub mod pid;
pub mod replay;
pub mod stats;
pub mod trainer;

pub use average::update_average;
pub use config::{DiscriminatorConfig, GeneratorConfig};
pub use data::GaussianMixture;
pub use discriminator::{LinearDiscriminator, MlpDiscriminator};
pub use generator::MlpGenerator;
pub use latent::sample_noise;
pub use loss::{GanLoss, GanType, Role};
pub use network::{Conditioning, Discriminator, Generator, Network};
pub use penalty::{grad_norm_squared, output_regularizer, wgan_gp_reg, RegType};
pub use pid::{DerivativeMode, PidGains, PidType};
pub use replay::{ReplayQueue, ReplaySample};
pub use stats::TrainingStats;
pub use trainer::{DiscriminatorLosses, Phase, PidTrainer, PidTrainerConfig};
