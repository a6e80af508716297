//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid learning rate: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid iterations: {0} (must be > 0)")]
    InvalidIterations(usize),

    #[error("Invalid optimizer: {0} (must be one of: adam, adamw, sgd)")]
    InvalidOptimizer(String),

    #[error("Invalid generator: {0} (must be: mlp)")]
    InvalidGenerator(String),

    #[error("Invalid gain {name}: {value} (must be >= 0.0)")]
    InvalidGain { name: &'static str, value: f32 },

    #[error("Invalid gradient clip value: {0} (must be > 0.0)")]
    InvalidGradClip(f32),

    #[error("Invalid sigmoid coefficient: {0} (must be > 0.0)")]
    InvalidSigmoidCoefficient(f32),

    #[error("Invalid replay capacity factor: {0} (must be >= 1)")]
    InvalidCapacityFactor(usize),

    #[error("Invalid replay push limit: {0} (must be > 0)")]
    InvalidPushLimit(usize),

    #[error("Invalid regularization coefficient: {0} (must be >= 0.0)")]
    InvalidRegularization(f32),

    #[error("Invalid model averaging beta: {0} (must be in [0.0, 1.0))")]
    InvalidAverageBeta(f32),

    #[error("Invalid Adam beta: {0} (must be in [0.0, 1.0))")]
    InvalidAdamBeta(f32),

    #[error("Invalid dimension {name}: must be > 0")]
    InvalidDimension { name: &'static str },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid log interval: must be > 0")]
    InvalidLogInterval,
}
