//! Trainer settings that shape the control loop

use crate::generative::loss::{GanLoss, GanType};
use crate::generative::network::Conditioning;
use crate::generative::penalty::RegType;
use crate::generative::pid::{DerivativeMode, PidGains, PidType};
use crate::{Error, Result};

/// Everything [`PidTrainer`](super::PidTrainer) needs besides networks and optimizers
#[derive(Debug, Clone, PartialEq)]
pub struct PidTrainerConfig {
    pub gan_type: GanType,
    /// Coefficient of the sigmoid loss
    pub sigmoid_coe: f32,
    pub gains: PidGains,
    /// Carried for completeness; no term uses it
    pub time_step: f32,
    pub pid_type: PidType,
    pub derivative_mode: DerivativeMode,
    pub reg_type: RegType,
    pub reg_param: f32,
    /// Coefficient of `mean(score²)` added to the proportional term (0 disables)
    pub regularize_output_d: f32,
    /// Element-wise discriminator gradient clip
    pub clip_d: Option<f32>,
    /// Replay sample size
    pub batch_size: usize,
    /// Replay capacity is `batch_size × replay_capacity_factor`
    pub replay_capacity_factor: usize,
    /// Leading rows of each batch pushed to the replay queues (`None` pushes all)
    pub replay_push_limit: Option<usize>,
    pub conditioning: Conditioning,
}

impl Default for PidTrainerConfig {
    fn default() -> Self {
        Self {
            gan_type: GanType::Standard,
            sigmoid_coe: 1.0,
            gains: PidGains::default(),
            time_step: 1.0,
            pid_type: PidType::Function,
            derivative_mode: DerivativeMode::Difference,
            reg_type: RegType::None,
            reg_param: 0.0,
            regularize_output_d: 0.0,
            clip_d: None,
            batch_size: 64,
            replay_capacity_factor: 10,
            replay_push_limit: None,
            conditioning: Conditioning::Conditional,
        }
    }
}

impl PidTrainerConfig {
    pub fn loss(&self) -> GanLoss {
        GanLoss::new(self.gan_type, self.sigmoid_coe)
    }

    pub fn replay_capacity(&self) -> usize {
        self.batch_size * self.replay_capacity_factor
    }

    /// Reject settings the control loop cannot run with
    pub fn validate(&self) -> Result<()> {
        PidGains::new(self.gains.pv, self.gains.iv, self.gains.dv)?;
        if self.batch_size == 0 {
            return Err(Error::ConfigError("batch_size must be > 0".to_string()));
        }
        if self.replay_capacity_factor == 0 {
            return Err(Error::ConfigError("replay_capacity_factor must be >= 1".to_string()));
        }
        if self.sigmoid_coe <= 0.0 || !self.sigmoid_coe.is_finite() {
            return Err(Error::ConfigError(format!(
                "sigmoid_coe must be > 0, got {}",
                self.sigmoid_coe
            )));
        }
        if let Some(clip) = self.clip_d {
            if clip <= 0.0 || !clip.is_finite() {
                return Err(Error::ConfigError(format!("clip_d must be > 0, got {clip}")));
            }
        }
        if self.replay_push_limit == Some(0) {
            return Err(Error::ConfigError("replay_push_limit must be > 0".to_string()));
        }
        if self.reg_param < 0.0 || self.regularize_output_d < 0.0 {
            return Err(Error::ConfigError("regularizer coefficients must be >= 0".to_string()));
        }
        Ok(())
    }
}
