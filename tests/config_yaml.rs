//! YAML configs through the public loader and training entry points

use pidgan::config::{load_config, train_from_spec, train_from_yaml, DiscriminatorKind};
use pidgan::generative::{GanType, PidType, RegType};
use std::fs;
use tempfile::TempDir;

const FULL: &str = r#"
seed: 21
generator:
  latent_dim: 4
  hidden_dim: 8
discriminator:
  name: wgan
  hidden_dim: 8
data:
  modes: 3
  radius: 1.5
  std: 0.05
optimizer:
  name: adamw
  lr_g: 0.0005
  lr_d: 0.0005
  weight_decay: 0.01
training:
  gan_type: wgan
  reg_type: wgangp
  reg_param: 10.0
  pv: 1.0
  iv: 0.2
  dv: 0.1
  pid_type: accurate
  derivative_mode: accumulate
  batch_size: 8
  iterations: 4
  clip_d: 0.1
  replay_capacity_factor: 3
  replay_push_limit: 4
  model_average_beta: 0.99
  log_every: 2
"#;

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn full_config_loads_every_field() {
    let dir = TempDir::new().unwrap();
    let spec = load_config(write(&dir, "full.yaml", FULL)).unwrap();
    assert_eq!(spec.seed, Some(21));
    assert_eq!(spec.discriminator.name, DiscriminatorKind::Wgan);
    assert_eq!(spec.training.gan_type, GanType::Wgan);
    assert_eq!(spec.training.reg_type, RegType::Wgangp);
    assert_eq!(spec.training.pid_type, PidType::Accurate);
    assert_eq!(spec.training.replay_push_limit, Some(4));
    assert_eq!(spec.training.model_average_beta, Some(0.99));
}

#[test]
fn full_config_trains_and_logs() {
    let dir = TempDir::new().unwrap();
    let spec = load_config(write(&dir, "full.yaml", FULL)).unwrap();
    let mut logged = Vec::new();
    let outcome = train_from_spec(&spec, |log| logged.push(log.clone())).unwrap();
    assert_eq!(outcome.iterations, 4);
    assert_eq!(logged.len(), 2);
    assert!(logged.iter().all(|l| l.gen_loss.is_finite() && l.losses.penalty.is_finite()));
    assert!(outcome.averaged_generator.is_some());
}

#[test]
fn train_from_yaml_runs_linear_scorer() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "linear.yaml",
        "seed: 1\ndiscriminator:\n  name: linear\ntraining:\n  gan_type: hinge\n  iv: 1.0\n  batch_size: 4\n  iterations: 3\n",
    );
    let outcome = train_from_yaml(path).unwrap();
    assert_eq!(outcome.stats.steps, 3);
    assert!(outcome.averaged_generator.is_none());
}

#[test]
fn invalid_configs_are_rejected() {
    let dir = TempDir::new().unwrap();
    for (name, body) in [
        ("missing_loss.yaml", "training:\n  pv: 1.0\n"),
        ("bad_loss.yaml", "training:\n  gan_type: vanilla\n"),
        ("bad_gain.yaml", "training:\n  gan_type: standard\n  iv: -0.5\n"),
        ("bad_optim.yaml", "optimizer:\n  name: lion\ntraining:\n  gan_type: standard\n"),
        ("bad_batch.yaml", "training:\n  gan_type: standard\n  batch_size: 0\n"),
    ] {
        assert!(load_config(write(&dir, name, body)).is_err(), "{name}");
    }
    assert!(load_config(dir.path().join("absent.yaml")).is_err());
}

#[test]
fn shipped_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/pidgan.yaml");
    let spec = load_config(path).unwrap();
    assert_eq!(spec.discriminator.name, DiscriminatorKind::Mlp);
    assert_eq!(spec.training.replay_push_limit, Some(10));
}
