//! PID-controlled GAN training
//!
//! Each iteration the caller runs one generator step and one discriminator
//! step. The discriminator loss is the sum of separately back-propagated
//! terms:
//!
//! - **P**: adversarial loss on the current real and generated batch
//! - **I**: loss on batches drawn from real/fake replay queues (`iv > 0`)
//! - **D**: change in loss between the previous and current batch (`dv > 0`)
//!
//! plus an optional gradient penalty selected by [`RegType`](crate::generative::RegType).

mod config;
mod pid_trainer;
mod state;


pub use config::PidTrainerConfig;
pub use pid_trainer::PidTrainer;
pub use state::{Phase, PreviousBatch, TrainingState};

/// Scalars reported by one discriminator step; each is 0 when its term is off
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiscriminatorLosses {
    /// `loss_real + loss_fake` on the current batch
    pub proportional: f32,
    pub derivative: f32,
    pub integral: f32,
    /// Gradient penalty, 0 unless a regularizer is configured
    pub penalty: f32,
}

impl DiscriminatorLosses {
    /// `(proportional, derivative, integral)`
    pub fn as_tuple(&self) -> (f32, f32, f32) {
        (self.proportional, self.derivative, self.integral)
    }
}
