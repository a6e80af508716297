//! Crate-wide error type

/// Errors raised by configuration, the replay queue and the PID trainer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown GAN type: {0} (must be one of: standard, wgan, hinge, sigmoid, lsgan1, lsgan2)")]
    UnknownGanType(String),

    #[error("Unknown PID type: {0} (must be one of: function, square, abs, accurate)")]
    UnknownPidType(String),

    #[error("Unknown regularization type: {0}")]
    UnknownRegType(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Replay queue capacity {capacity} is smaller than its sample size {sample_size}")]
    ReplayCapacity { capacity: usize, sample_size: usize },

    #[error("Replay queue is empty")]
    EmptyReplay,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_capacity_message() {
        let err = Error::ReplayCapacity { capacity: 4, sample_size: 8 };
        assert_eq!(
            err.to_string(),
            "Replay queue capacity 4 is smaller than its sample size 8"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
