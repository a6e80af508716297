//! Build networks, optimizers and the trainer from a run specification

use super::schema::{DiscriminatorKind, OptimSpec, PidGanSpec};
use crate::generative::data::SAMPLE_DIM;
use crate::generative::{
    Discriminator, DiscriminatorConfig, GaussianMixture, GeneratorConfig, LinearDiscriminator,
    MlpDiscriminator, MlpGenerator, PidGains, PidTrainer, PidTrainerConfig,
};
use crate::optim::{Adam, Optimizer, SGD};
use crate::{Error, Result};

const ADAM_EPS: f32 = 1e-8;
const LEAKY_SLOPE: f32 = 0.2;

/// The trainer type the CLI runs
pub type SpecTrainer = PidTrainer<MlpGenerator, Box<dyn Discriminator>>;

/// Build an optimizer with learning rate `lr`
pub fn build_optimizer(spec: &OptimSpec, lr: f32) -> Result<Box<dyn Optimizer>> {
    match spec.name.to_lowercase().as_str() {
        "sgd" => Ok(Box::new(SGD::new(lr, spec.momentum))),
        "adam" => Ok(Box::new(Adam::new(lr, spec.beta1, spec.beta2, ADAM_EPS))),
        "adamw" => Ok(Box::new(
            Adam::new(lr, spec.beta1, spec.beta2, ADAM_EPS).with_weight_decay(spec.weight_decay),
        )),
        name => Err(Error::ConfigError(format!("Unknown optimizer: {name}"))),
    }
}

fn num_classes(spec: &PidGanSpec) -> usize {
    if spec.discriminator.name.conditioning().is_conditional() {
        spec.data.modes
    } else {
        0
    }
}

pub fn generator_config(spec: &PidGanSpec) -> GeneratorConfig {
    GeneratorConfig {
        latent_dim: spec.generator.latent_dim,
        hidden_dim: spec.generator.hidden_dim,
        sample_dim: SAMPLE_DIM,
        num_classes: num_classes(spec),
        leaky_slope: LEAKY_SLOPE,
    }
}

pub fn discriminator_config(spec: &PidGanSpec) -> DiscriminatorConfig {
    DiscriminatorConfig {
        sample_dim: SAMPLE_DIM,
        hidden_dim: spec.discriminator.hidden_dim,
        num_classes: num_classes(spec),
        leaky_slope: LEAKY_SLOPE,
    }
}

pub fn build_generator(spec: &PidGanSpec) -> MlpGenerator {
    let config = generator_config(spec);
    match spec.seed {
        Some(seed) => MlpGenerator::with_seed(config, seed),
        None => MlpGenerator::new(config),
    }
}

pub fn build_discriminator(spec: &PidGanSpec) -> Box<dyn Discriminator> {
    let seed = spec.seed.map(|s| s.wrapping_add(1));
    match spec.discriminator.name {
        DiscriminatorKind::Mlp | DiscriminatorKind::Wgan => {
            let config = discriminator_config(spec);
            match seed {
                Some(seed) => Box::new(MlpDiscriminator::with_seed(config, seed)),
                None => Box::new(MlpDiscriminator::new(config)),
            }
        }
        DiscriminatorKind::Linear => match seed {
            Some(seed) => Box::new(LinearDiscriminator::with_seed(SAMPLE_DIM, seed)),
            None => Box::new(LinearDiscriminator::new(SAMPLE_DIM)),
        },
    }
}

pub fn build_data(spec: &PidGanSpec) -> Result<GaussianMixture> {
    GaussianMixture::new(spec.data.modes, spec.data.radius, spec.data.std)
}

/// Control-loop settings taken from the `training` section
pub fn trainer_config(spec: &PidGanSpec) -> Result<PidTrainerConfig> {
    let t = &spec.training;
    Ok(PidTrainerConfig {
        gan_type: t.gan_type,
        sigmoid_coe: t.sigmoid_coe,
        gains: PidGains::new(t.pv, t.iv, t.dv)?,
        time_step: t.time_step,
        pid_type: t.pid_type,
        derivative_mode: t.derivative_mode,
        reg_type: t.reg_type,
        reg_param: t.reg_param,
        regularize_output_d: t.regularize_output_d,
        clip_d: t.clip_d,
        batch_size: t.batch_size,
        replay_capacity_factor: t.replay_capacity_factor,
        replay_push_limit: t.replay_push_limit,
        conditioning: spec.discriminator.name.conditioning(),
    })
}

/// Networks, optimizers and controller for a run
pub fn build_trainer(spec: &PidGanSpec) -> Result<SpecTrainer> {
    let generator = build_generator(spec);
    let discriminator = build_discriminator(spec);
    let g_optimizer = build_optimizer(&spec.optimizer, spec.optimizer.lr_g)?;
    let d_optimizer = build_optimizer(&spec.optimizer, spec.optimizer.lr_d)?;
    let config = trainer_config(spec)?;
    match spec.seed {
        Some(seed) => PidTrainer::with_seed(
            generator,
            discriminator,
            g_optimizer,
            d_optimizer,
            config,
            seed.wrapping_add(2),
        ),
        None => PidTrainer::new(generator, discriminator, g_optimizer, d_optimizer, config),
    }
}
