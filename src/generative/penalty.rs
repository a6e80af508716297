//! Discriminator regularizers: gradient penalties and output magnitude
//!
//! Gradient penalties are built on [`Discriminator::input_gradient`], so they
//! back-propagate into the discriminator parameters.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::network::Discriminator;
use crate::autograd::{add, add_scalar, mean, row_sum, scale, sqrt, square};
use crate::{Error, Result, Tensor};

/// Gradient regularizer applied in the discriminator step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegType {
    #[default]
    None,
    /// `mean(‖∇D(x_real)‖²)`
    Real,
    /// `mean(‖∇D(x_fake)‖²)`
    Fake,
    /// Both of the above
    RealFake,
    /// Gradient penalty on interpolates, centred at 1
    Wgangp,
    /// Gradient penalty on interpolates, centred at 0
    Wgangp0,
}

impl RegType {
    pub const ALL: [RegType; 6] =
        [Self::None, Self::Real, Self::Fake, Self::RealFake, Self::Wgangp, Self::Wgangp0];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Real => "real",
            Self::Fake => "fake",
            Self::RealFake => "real_fake",
            Self::Wgangp => "wgangp",
            Self::Wgangp0 => "wgangp0",
        }
    }
}

impl FromStr for RegType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownRegType(s.to_string()))
    }
}

fn rows_of(samples: &Tensor, sample_dim: usize) -> Result<usize> {
    if sample_dim == 0 || samples.len() % sample_dim != 0 {
        return Err(Error::ShapeMismatch(format!(
            "{} values do not form rows of width {sample_dim}",
            samples.len()
        )));
    }
    Ok(samples.len() / sample_dim)
}

/// Per-row squared norm of ∂(Σ score)/∂x
pub fn grad_norm_squared<D: Discriminator + ?Sized>(
    disc: &D,
    samples: &Tensor,
    labels: Option<&[usize]>,
) -> Result<Tensor> {
    let d = disc.sample_dim();
    let n = rows_of(samples, d)?;
    let grad = disc.input_gradient(samples, labels);
    Ok(row_sum(&square(&grad), n, d))
}

/// `mean((‖∇D(x̂)‖ − center)²)` over interpolates `x̂ = (1 − ε)·real + ε·fake`,
/// one `ε ~ U[0, 1)` per row
pub fn wgan_gp_reg<D: Discriminator + ?Sized, R: Rng + ?Sized>(
    disc: &D,
    real: &Tensor,
    fake: &Tensor,
    labels: Option<&[usize]>,
    center: f32,
    rng: &mut R,
) -> Result<Tensor> {
    if real.len() != fake.len() {
        return Err(Error::ShapeMismatch(format!(
            "real batch has {} values, fake batch {}",
            real.len(),
            fake.len()
        )));
    }
    let d = disc.sample_dim();
    let n = rows_of(real, d)?;

    let mut interp = Vec::with_capacity(real.len());
    for row in 0..n {
        let eps: f32 = rng.random();
        for i in row * d..(row + 1) * d {
            interp.push((1.0 - eps) * real.data()[i] + eps * fake.data()[i]);
        }
    }
    let interp = Tensor::from_vec(interp, false);

    let norms = sqrt(&grad_norm_squared(disc, &interp, labels)?);
    Ok(mean(&square(&add_scalar(&norms, -center))))
}

/// `coefficient · mean(score²)`
pub fn output_regularizer(scores: &Tensor, coefficient: f32) -> Tensor {
    scale(&mean(&square(scores)), coefficient)
}

/// Regularizer selected by `reg_type`, scaled by `reg_param`; `None` when disabled
pub fn discriminator_regularizer<D: Discriminator + ?Sized, R: Rng + ?Sized>(
    reg_type: RegType,
    reg_param: f32,
    disc: &D,
    real: &Tensor,
    fake: &Tensor,
    labels: Option<&[usize]>,
    rng: &mut R,
) -> Result<Option<Tensor>> {
    if reg_param <= 0.0 {
        return Ok(None);
    }
    let penalty = match reg_type {
        RegType::None => return Ok(None),
        RegType::Real => mean(&grad_norm_squared(disc, real, labels)?),
        RegType::Fake => mean(&grad_norm_squared(disc, fake, labels)?),
        RegType::RealFake => add(
            &mean(&grad_norm_squared(disc, real, labels)?),
            &mean(&grad_norm_squared(disc, fake, labels)?),
        ),
        RegType::Wgangp => wgan_gp_reg(disc, real, fake, labels, 1.0, rng)?,
        RegType::Wgangp0 => wgan_gp_reg(disc, real, fake, labels, 0.0, rng)?,
    };
    Ok(Some(scale(&penalty, reg_param)))
}
