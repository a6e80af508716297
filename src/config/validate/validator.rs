//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::PidGanSpec;

fn in_unit_interval(value: f32) -> bool {
    (0.0..1.0).contains(&value)
}

/// Validate a run specification
///
/// Checks:
/// - Gains and regularizer coefficients are non-negative
/// - Sizes and intervals are positive
/// - Learning rates and betas are in range
/// - Names match the supported networks and optimizers
pub fn validate_config(spec: &PidGanSpec) -> Result<(), ValidationError> {
    let training = &spec.training;

    for (name, value) in [("pv", training.pv), ("iv", training.iv), ("dv", training.dv)] {
        if value < 0.0 || !value.is_finite() {
            return Err(ValidationError::InvalidGain { name, value });
        }
    }

    if training.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(training.batch_size));
    }

    if training.iterations == 0 {
        return Err(ValidationError::InvalidIterations(training.iterations));
    }

    if training.log_every == 0 {
        return Err(ValidationError::InvalidLogInterval);
    }

    if training.replay_capacity_factor == 0 {
        return Err(ValidationError::InvalidCapacityFactor(training.replay_capacity_factor));
    }

    if let Some(limit) = training.replay_push_limit {
        if limit == 0 {
            return Err(ValidationError::InvalidPushLimit(limit));
        }
    }

    if let Some(clip) = training.clip_d {
        if clip <= 0.0 {
            return Err(ValidationError::InvalidGradClip(clip));
        }
    }

    if training.sigmoid_coe <= 0.0 {
        return Err(ValidationError::InvalidSigmoidCoefficient(training.sigmoid_coe));
    }

    for coefficient in [training.reg_param, training.regularize_output_d] {
        if coefficient < 0.0 {
            return Err(ValidationError::InvalidRegularization(coefficient));
        }
    }

    if let Some(beta) = training.model_average_beta {
        if !in_unit_interval(beta) {
            return Err(ValidationError::InvalidAverageBeta(beta));
        }
    }

    let optimizer = &spec.optimizer;
    for lr in [optimizer.lr_g, optimizer.lr_d] {
        if lr <= 0.0 || lr > 1.0 {
            return Err(ValidationError::InvalidLearningRate(lr));
        }
    }

    let valid_optimizers = ["adam", "adamw", "sgd"];
    if !valid_optimizers.contains(&optimizer.name.to_lowercase().as_str()) {
        return Err(ValidationError::InvalidOptimizer(optimizer.name.clone()));
    }

    for beta in [optimizer.beta1, optimizer.beta2] {
        if !in_unit_interval(beta) {
            return Err(ValidationError::InvalidAdamBeta(beta));
        }
    }

    if spec.generator.name != "mlp" {
        return Err(ValidationError::InvalidGenerator(spec.generator.name.clone()));
    }

    let dims = [
        ("generator.latent_dim", spec.generator.latent_dim),
        ("generator.hidden_dim", spec.generator.hidden_dim),
        ("discriminator.hidden_dim", spec.discriminator.hidden_dim),
    ];
    for (name, value) in dims {
        if value == 0 {
            return Err(ValidationError::InvalidDimension { name });
        }
    }

    if spec.data.modes == 0 {
        return Err(ValidationError::InvalidData("modes must be > 0".to_string()));
    }
    if spec.data.std < 0.0 || !spec.data.radius.is_finite() {
        return Err(ValidationError::InvalidData(format!(
            "radius {} / std {}",
            spec.data.radius, spec.data.std
        )));
    }

    Ok(())
}
