//! Adversarial loss selector
//!
//! Every formulation reduces a batch of discriminator scores to one scalar by
//! a mean over the batch. With `s = 2·target − 1`:
//!
//! | gan_type | discriminator role              | generator role   |
//! |----------|---------------------------------|------------------|
//! | standard | bce_with_logits(out, target)    | same             |
//! | wgan     | s · mean(out)                   | same             |
//! | hinge    | mean(relu(1 + s·out))           | mean(s·out)      |
//! | sigmoid  | mean(s · σ(c·out)) / c          | same             |
//! | lsgan1   | mean((out − s)²)                | mean(out²)       |
//! | lsgan2   | mean((out − (target − 0.5))²)   | same             |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::autograd::{add_scalar, bce_with_logits, mean, relu, scale, sigmoid, square};
use crate::{Error, Tensor};

/// Adversarial loss formulation, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GanType {
    /// Binary cross-entropy on logits
    #[default]
    Standard,
    /// Wasserstein critic loss
    Wgan,
    Hinge,
    /// Bounded sigmoid loss scaled by a coefficient
    Sigmoid,
    /// Least squares with ±1 targets
    Lsgan1,
    /// Least squares with ±0.5 targets
    Lsgan2,
}

impl GanType {
    pub const ALL: [GanType; 6] =
        [Self::Standard, Self::Wgan, Self::Hinge, Self::Sigmoid, Self::Lsgan1, Self::Lsgan2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Wgan => "wgan",
            Self::Hinge => "hinge",
            Self::Sigmoid => "sigmoid",
            Self::Lsgan1 => "lsgan1",
            Self::Lsgan2 => "lsgan2",
        }
    }
}

impl fmt::Display for GanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GanType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownGanType(s.to_string()))
    }
}

/// Which network the loss is being computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Generator,
    Discriminator,
}

/// Loss selector: a formulation plus the sigmoid coefficient it may need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanLoss {
    pub gan_type: GanType,
    pub sigmoid_coe: f32,
}

impl Default for GanLoss {
    fn default() -> Self {
        Self { gan_type: GanType::Standard, sigmoid_coe: 1.0 }
    }
}

impl GanLoss {
    pub fn new(gan_type: GanType, sigmoid_coe: f32) -> Self {
        Self { gan_type, sigmoid_coe }
    }

    /// Scalar loss for `scores` against `target` (1 = real, 0 = fake)
    pub fn compute(&self, scores: &Tensor, target: f32, role: Role) -> Tensor {
        let sign = 2.0 * target - 1.0;
        match (self.gan_type, role) {
            (GanType::Standard, _) => bce_with_logits(scores, target),
            (GanType::Wgan, _) => scale(&mean(scores), sign),
            (GanType::Hinge, Role::Discriminator) => {
                mean(&relu(&add_scalar(&scale(scores, sign), 1.0)))
            }
            (GanType::Hinge, Role::Generator) => mean(&scale(scores, sign)),
            (GanType::Sigmoid, _) => {
                let c = self.sigmoid_coe;
                scale(&mean(&sigmoid(&scale(scores, c))), sign / c)
            }
            (GanType::Lsgan1, Role::Discriminator) => mean(&square(&add_scalar(scores, -sign))),
            (GanType::Lsgan1, Role::Generator) => mean(&square(scores)),
            (GanType::Lsgan2, _) => mean(&square(&add_scalar(scores, -(target - 0.5)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use approx::assert_abs_diff_eq;

    fn at_zero(gan_type: GanType, target: f32, role: Role) -> f32 {
        GanLoss::new(gan_type, 2.0).compute(&Tensor::zeros(5, false), target, role).item()
    }

    #[test]
    fn test_documented_values_at_zero_scores() {
        let d = Role::Discriminator;
        let ln2 = 2f32.ln();
        let expected = [
            (GanType::Standard, ln2, ln2),
            (GanType::Wgan, 0.0, 0.0),
            (GanType::Hinge, 1.0, 1.0),
            (GanType::Sigmoid, 0.25, -0.25),
            (GanType::Lsgan1, 1.0, 1.0),
            (GanType::Lsgan2, 0.25, 0.25),
        ];
        for (gan_type, real, fake) in expected {
            assert_abs_diff_eq!(at_zero(gan_type, 1.0, d), real, epsilon = 1e-6);
            assert_abs_diff_eq!(at_zero(gan_type, 0.0, d), fake, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_generator_role_differs_only_for_hinge_and_lsgan1() {
        let scores = Tensor::from_vec(vec![-1.5, 0.3, 2.0], false);
        for gan_type in GanType::ALL {
            let loss = GanLoss::new(gan_type, 1.0);
            let g = loss.compute(&scores, 1.0, Role::Generator).item();
            let d = loss.compute(&scores, 1.0, Role::Discriminator).item();
            match gan_type {
                GanType::Hinge | GanType::Lsgan1 => assert!((g - d).abs() > 1e-3),
                _ => assert_abs_diff_eq!(g, d, epsilon = 1e-6),
            }
        }
    }

    #[test]
    fn test_hinge_and_lsgan1_generator_formulas() {
        let scores = Tensor::from_vec(vec![1.0, 3.0], false);
        let hinge = GanLoss::new(GanType::Hinge, 1.0);
        assert_abs_diff_eq!(hinge.compute(&scores, 1.0, Role::Generator).item(), 2.0);
        // relu(1 + 1) and relu(1 + 3)
        assert_abs_diff_eq!(hinge.compute(&scores, 1.0, Role::Discriminator).item(), 3.0);
        // relu(1 - 1) and relu(1 - 3)
        assert_abs_diff_eq!(hinge.compute(&scores, 0.0, Role::Discriminator).item(), 0.0);

        let ls = GanLoss::new(GanType::Lsgan1, 1.0);
        assert_abs_diff_eq!(ls.compute(&scores, 1.0, Role::Generator).item(), 5.0);
        assert_abs_diff_eq!(ls.compute(&scores, 1.0, Role::Discriminator).item(), 2.0);
    }

    #[test]
    fn test_standard_confident_scores() {
        let loss = GanLoss::default();
        let real = loss.compute(&Tensor::full(4, 10.0, false), 1.0, Role::Discriminator);
        let fake = loss.compute(&Tensor::full(4, -10.0, false), 0.0, Role::Discriminator);
        assert!(real.item() + fake.item() < 1e-3);
    }

    #[test]
    fn test_wgan_gradient_sign() {
        let scores = Tensor::zeros(4, true);
        let loss = GanLoss::new(GanType::Wgan, 1.0).compute(&scores, 0.0, Role::Discriminator);
        backward(&loss, None);
        let grad = scores.grad().unwrap();
        assert!(grad.iter().all(|g| (*g + 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_gan_type_parse() {
        for gan_type in GanType::ALL {
            assert_eq!(gan_type.to_string().parse::<GanType>().unwrap(), gan_type);
        }
        let err = "vanilla".parse::<GanType>().unwrap_err();
        assert!(matches!(err, Error::UnknownGanType(ref s) if s == "vanilla"));
    }

    #[test]
    fn test_gan_type_serde_rejects_unknown() {
        let parsed: GanType = serde_yaml::from_str("lsgan2").unwrap();
        assert_eq!(parsed, GanType::Lsgan2);
        assert!(serde_yaml::from_str::<GanType>("lsgan3").is_err());
    }
}
