use super::*;
use crate::config::schema::{PidGanSpec, TrainingParams};
use proptest::prelude::*;

fn valid_spec() -> PidGanSpec {
    serde_yaml::from_str("training:\n  gan_type: standard\n").unwrap()
}

#[test]
fn test_default_spec_is_valid() {
    assert!(validate_config(&valid_spec()).is_ok());
}

#[test]
fn test_negative_gain() {
    let mut spec = valid_spec();
    spec.training.dv = -0.5;
    let err = validate_config(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidGain { name: "dv", .. }));
    assert!(err.to_string().contains("dv"));
}

#[test]
fn test_zero_batch_size() {
    let mut spec = valid_spec();
    spec.training.batch_size = 0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidBatchSize(0))));
}

#[test]
fn test_invalid_learning_rate() {
    let mut spec = valid_spec();
    spec.optimizer.lr_d = 1.5;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidLearningRate(_))));
}

#[test]
fn test_invalid_optimizer() {
    let mut spec = valid_spec();
    spec.optimizer.name = "rmsprop".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidOptimizer(_))));
}

#[test]
fn test_invalid_clip_and_coefficients() {
    let cases = [
        TrainingParams { clip_d: Some(0.0), ..Default::default() },
        TrainingParams { sigmoid_coe: 0.0, ..Default::default() },
        TrainingParams { reg_param: -1.0, ..Default::default() },
        TrainingParams { replay_capacity_factor: 0, ..Default::default() },
        TrainingParams { replay_push_limit: Some(0), ..Default::default() },
        TrainingParams { model_average_beta: Some(1.0), ..Default::default() },
        TrainingParams { log_every: 0, ..Default::default() },
        TrainingParams { iterations: 0, ..Default::default() },
    ];
    for training in cases {
        let spec = PidGanSpec { training: training.clone(), ..valid_spec() };
        assert!(validate_config(&spec).is_err(), "{training:?}");
    }
}

#[test]
fn test_invalid_architecture() {
    let mut spec = valid_spec();
    spec.generator.name = "dcgan".to_string();
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidGenerator(_))));

    let mut spec = valid_spec();
    spec.generator.latent_dim = 0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidDimension { .. })));

    let mut spec = valid_spec();
    spec.data.modes = 0;
    assert!(matches!(validate_config(&spec), Err(ValidationError::InvalidData(_))));
}

proptest! {
    #[test]
    fn prop_nonnegative_gains_accepted(pv in 0.0f32..10.0, iv in 0.0f32..10.0, dv in 0.0f32..10.0) {
        let mut spec = valid_spec();
        spec.training.pv = pv;
        spec.training.iv = iv;
        spec.training.dv = dv;
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_lr_range(lr in -1.0f32..2.0) {
        let mut spec = valid_spec();
        spec.optimizer.lr_g = lr;
        let ok = validate_config(&spec).is_ok();
        prop_assert_eq!(ok, lr > 0.0 && lr <= 1.0);
    }
}
