//! # pidgan
//!
//! GAN training where the discriminator objective is a PID controller over
//! the adversarial signal:
//!
//! - **P**: the adversarial loss on the current batch
//! - **I**: the same loss over replayed past batches
//! - **D**: the change of the loss between consecutive steps
//!
//! A small tape-based autograd engine drives MLP generators and critics on
//! synthetic Gaussian-mixture data. Runs are described in YAML and launched
//! through the `pidgan` binary.

pub mod autograd;
pub mod cli;
pub mod config;
pub mod error;
pub mod generative;
pub mod optim;
pub mod trace;

pub use autograd::Tensor;
pub use error::{Error, Result};
