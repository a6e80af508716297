//! Controller state: which network is trainable and what the PID terms remember

use crate::generative::replay::ReplayQueue;
use crate::Tensor;

/// Which network currently accumulates gradients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Both networks frozen; before the first step and after every discriminator step
    #[default]
    Idle,
    /// Generator trainable, discriminator frozen
    GeneratorActive,
    /// Discriminator trainable, generator frozen
    DiscriminatorActive,
}

impl Phase {
    /// `(generator_trainable, discriminator_trainable)` in this phase
    pub fn trainable(&self) -> (bool, bool) {
        match self {
            Self::Idle => (false, false),
            Self::GeneratorActive => (true, false),
            Self::DiscriminatorActive => (false, true),
        }
    }
}

/// The last discriminator-step batch, kept for the derivative term
#[derive(Debug, Clone)]
pub struct PreviousBatch {
    pub real: Tensor,
    pub fake: Tensor,
    pub labels: Vec<usize>,
    pub noise: Tensor,
}

impl PreviousBatch {
    /// Snapshot cut off from any graph
    pub fn capture(real: &Tensor, fake: &Tensor, labels: &[usize], noise: &Tensor) -> Self {
        Self {
            real: real.detach(),
            fake: fake.detach(),
            labels: labels.to_vec(),
            noise: noise.detach(),
        }
    }
}

/// Mutable bookkeeping owned by one trainer for one run
#[derive(Debug, Clone)]
pub struct TrainingState {
    pub phase: Phase,
    pub previous: Option<PreviousBatch>,
    pub replay_real: ReplayQueue,
    pub replay_fake: ReplayQueue,
}

impl TrainingState {
    pub fn new(replay_real: ReplayQueue, replay_fake: ReplayQueue) -> Self {
        Self { phase: Phase::Idle, previous: None, replay_real, replay_fake }
    }
}
