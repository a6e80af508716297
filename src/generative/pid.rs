//! Control gains and the integral/derivative term variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::loss::{GanLoss, Role};
use crate::autograd::{abs, add, mean, relu, scale, square};
use crate::{Error, Result, Tensor};

/// Proportional, integral and derivative gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub pv: f32,
    pub iv: f32,
    pub dv: f32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self { pv: 1.0, iv: 0.0, dv: 0.0 }
    }
}

impl PidGains {
    /// Gains must be finite and non-negative
    pub fn new(pv: f32, iv: f32, dv: f32) -> Result<Self> {
        for (name, value) in [("pv", pv), ("iv", iv), ("dv", dv)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(Self { pv, iv, dv })
    }

    pub fn integral_enabled(&self) -> bool {
        self.iv > 0.0
    }

    pub fn derivative_enabled(&self) -> bool {
        self.dv > 0.0
    }
}

/// How replayed scores are folded into the integral loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PidType {
    /// The adversarial loss on replayed batches
    #[default]
    Function,
    /// Mean squared scores
    Square,
    /// Mean absolute scores
    Abs,
    /// Penalise only fake scores above zero and real scores below zero
    Accurate,
}

impl PidType {
    pub const ALL: [PidType; 4] = [Self::Function, Self::Square, Self::Abs, Self::Accurate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Square => "square",
            Self::Abs => "abs",
            Self::Accurate => "accurate",
        }
    }

    /// Integral loss from replayed real/fake scores, before the `iv` gain
    pub fn integral_loss(&self, loss: &GanLoss, real_scores: &Tensor, fake_scores: &Tensor) -> Tensor {
        match self {
            Self::Function => add(
                &loss.compute(real_scores, 1.0, Role::Discriminator),
                &loss.compute(fake_scores, 0.0, Role::Discriminator),
            ),
            Self::Square => add(&mean(&square(real_scores)), &mean(&square(fake_scores))),
            Self::Abs => add(&mean(&abs(real_scores)), &mean(&abs(fake_scores))),
            // relu(fake) − (−relu(−real)), taken over paired rows
            Self::Accurate => {
                mean(&add(&relu(fake_scores), &relu(&scale(real_scores, -1.0))))
            }
        }
    }
}

impl fmt::Display for PidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PidType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownPidType(s.to_string()))
    }
}

/// Derivative-term formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeMode {
    /// `(L(cur_real,1) + L(cur_fake,0)) − (L(prev_real,1) + L(prev_fake,0))`
    #[default]
    Difference,
    /// `L(G(prev_z, prev_y), 0) + L(prev_fake, 1)`
    Accumulate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gains_reject_negative() {
        assert!(PidGains::new(1.0, 0.5, 0.0).is_ok());
        assert!(matches!(PidGains::new(1.0, -0.1, 0.0), Err(Error::ConfigError(_))));
        assert!(PidGains::new(f32::NAN, 0.0, 0.0).is_err());
        let gains = PidGains::default();
        assert!(!gains.integral_enabled());
        assert!(!gains.derivative_enabled());
    }

    #[test]
    fn test_square_and_abs() {
        let loss = GanLoss::default();
        let real = Tensor::from_vec(vec![1.0, -3.0], false);
        let fake = Tensor::from_vec(vec![2.0, 0.0], false);
        assert_abs_diff_eq!(PidType::Square.integral_loss(&loss, &real, &fake).item(), 5.0 + 2.0);
        assert_abs_diff_eq!(PidType::Abs.integral_loss(&loss, &real, &fake).item(), 2.0 + 1.0);
    }

    #[test]
    fn test_accurate_is_one_sided() {
        let loss = GanLoss::default();
        // Correctly signed scores cost nothing
        let real = Tensor::from_vec(vec![2.0, 0.5], false);
        let fake = Tensor::from_vec(vec![-1.0, -4.0], false);
        assert_abs_diff_eq!(PidType::Accurate.integral_loss(&loss, &real, &fake).item(), 0.0);

        let real = Tensor::from_vec(vec![-2.0, 1.0], false);
        let fake = Tensor::from_vec(vec![3.0, -1.0], false);
        // rows: (3 + 2), (0 + 0)
        assert_abs_diff_eq!(PidType::Accurate.integral_loss(&loss, &real, &fake).item(), 2.5);
    }

    #[test]
    fn test_function_uses_selector() {
        let loss = GanLoss::default();
        let zeros = Tensor::zeros(3, false);
        let value = PidType::Function.integral_loss(&loss, &zeros, &zeros).item();
        assert_abs_diff_eq!(value, 2.0 * 2f32.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_pid_type_parse() {
        assert_eq!("accurate".parse::<PidType>().unwrap(), PidType::Accurate);
        assert!(matches!("integral".parse::<PidType>(), Err(Error::UnknownPidType(_))));
        assert_eq!(DerivativeMode::default(), DerivativeMode::Difference);
    }
}
