//! Run the control loop end to end on synthetic data

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use super::builder::{build_data, build_trainer};
use super::loader::load_config;
use super::schema::PidGanSpec;
use super::validate::validate_config;
use crate::generative::{
    sample_noise, update_average, DiscriminatorLosses, Generator, MlpGenerator, TrainingStats,
};
use crate::{Error, Result};

/// Progress snapshot handed to the caller every `log_every` iterations
#[derive(Debug, Clone)]
pub struct IterationLog {
    pub iteration: usize,
    pub gen_loss: f32,
    pub losses: DiscriminatorLosses,
    pub avg_gen_loss: f32,
    pub avg_disc_loss: f32,
}

/// What a finished run leaves behind
#[derive(Debug)]
pub struct TrainingOutcome {
    pub iterations: usize,
    pub stats: TrainingStats,
    pub generator: MlpGenerator,
    /// Moving-average copy of the generator, when enabled
    pub averaged_generator: Option<MlpGenerator>,
}

/// Train for `spec.training.iterations` iterations.
///
/// Each iteration runs one discriminator step on a fresh real batch, then one
/// generator step on fresh noise and labels.
///
/// # Errors
///
/// `ConfigError` if the spec fails validation; trainer errors otherwise.
pub fn train_from_spec<F>(spec: &PidGanSpec, mut on_log: F) -> Result<TrainingOutcome>
where
    F: FnMut(&IterationLog),
{
    validate_config(spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    let mut trainer = build_trainer(spec)?;
    let data = build_data(spec)?;
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(3)),
        None => StdRng::from_os_rng(),
    };

    let training = &spec.training;
    let batch = training.batch_size;
    let latent_dim = trainer.generator().latent_dim();
    let mut averaged = training.model_average_beta.map(|_| trainer.generator().clone());
    let mut stats = TrainingStats::default();

    for it in 0..training.iterations {
        let (x_real, y) = data.sample(&mut rng, batch);
        let z = sample_noise(&mut rng, batch, latent_dim);
        let losses = trainer.discriminator_trainstep(&x_real, &y, &z, it)?;

        let y_gen = data.sample_labels(&mut rng, batch);
        let z = sample_noise(&mut rng, batch, latent_dim);
        let gen_loss = trainer.generator_trainstep(&y_gen, &z)?;

        if let (Some(target), Some(beta)) = (averaged.as_mut(), training.model_average_beta) {
            update_average(target, trainer.generator(), beta)?;
        }

        stats.record_step(gen_loss, &losses);
        if (it + 1) % training.log_every == 0 || it + 1 == training.iterations {
            on_log(&IterationLog {
                iteration: it,
                gen_loss,
                losses,
                avg_gen_loss: stats.avg_gen_loss(),
                avg_disc_loss: stats.avg_disc_loss(),
            });
        }
    }

    let (generator, _) = trainer.into_networks();
    Ok(TrainingOutcome {
        iterations: training.iterations,
        stats,
        generator,
        averaged_generator: averaged,
    })
}

/// Load a YAML config and train silently
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<TrainingOutcome> {
    let spec = load_config(config_path)?;
    train_from_spec(&spec, |_| {})
}
