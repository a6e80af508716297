//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{build_discriminator, build_generator, load_config, InfoArgs, OutputFormat};
use crate::generative::Network;

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            let generator = build_generator(&spec);
            let discriminator = build_discriminator(&spec);
            println!(
                "Generator: {} ({} parameters)",
                spec.generator.name,
                generator.num_parameters()
            );
            println!(
                "Discriminator: {:?} ({} parameters)",
                spec.discriminator.name,
                discriminator.num_parameters()
            );
            println!("Loss: {}", spec.training.gan_type);
            println!(
                "Gains: pv={} iv={} dv={}",
                spec.training.pv, spec.training.iv, spec.training.dv
            );
            println!(
                "Optimizer: {} (lr_g={}, lr_d={})",
                spec.optimizer.name, spec.optimizer.lr_g, spec.optimizer.lr_d
            );
            println!("Iterations: {}", spec.training.iterations);
            println!("Batch size: {}", spec.training.batch_size);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&spec)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&spec)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
