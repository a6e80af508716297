//! Declarative YAML configuration
//!
//! A run is described by a [`PidGanSpec`]: network sizes, synthetic data,
//! optimizer settings and the control-loop hyperparameters.

mod builder;
mod cli;
mod loader;
mod schema;
mod train;
mod validate;

pub use builder::{
    build_data, build_discriminator, build_generator, build_optimizer, build_trainer,
    discriminator_config, generator_config, trainer_config, SpecTrainer,
};
pub use cli::{apply_overrides, Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs};
pub use loader::{load_config, parse_config, save_config};
pub use schema::{
    DataSpec, DiscriminatorKind, DiscriminatorSpec, GeneratorSpec, OptimSpec, PidGanSpec,
    TrainingParams,
};
pub use train::{train_from_spec, train_from_yaml, IterationLog, TrainingOutcome};
pub use validate::{validate_config, ValidationError};
