//! Command-line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::schema::PidGanSpec;

/// pidgan: PID-controlled GAN training
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pidgan")]
#[command(version)]
#[command(about = "Train GANs with proportional, integral and derivative discriminator losses")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train from a YAML configuration
    Train(TrainArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// Display information about a configuration
    Info(InfoArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the number of iterations
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log every N iterations
    #[arg(long)]
    pub log_every: Option<usize>,

    /// Write the config with overrides applied to this path
    #[arg(long, value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// Dry run (validate config but don't train)
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for info command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json, yaml")),
        }
    }
}

/// Apply command-line overrides to a loaded spec
pub fn apply_overrides(spec: &mut PidGanSpec, args: &TrainArgs) {
    if let Some(iterations) = args.iterations {
        spec.training.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        spec.seed = Some(seed);
    }
    if let Some(log_every) = args.log_every {
        spec.training.log_every = log_every;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut full_args = vec!["pidgan"];
        full_args.extend(args);
        Cli::try_parse_from(full_args)
    }

    #[test]
    fn test_parse_train_command() {
        let cli = parse_args(&["train", "config.yaml"]).unwrap();
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.config, PathBuf::from("config.yaml"));
                assert!(!args.dry_run);
                assert_eq!(args.iterations, None);
            }
            _ => panic!("Expected Train command"),
        }
    }

    #[test]
    fn test_parse_train_with_overrides() {
        let cli = parse_args(&[
            "train",
            "config.yaml",
            "--iterations",
            "50",
            "--seed",
            "3",
            "--dry-run",
        ])
        .unwrap();
        let Command::Train(args) = cli.command else { panic!("Expected Train command") };
        assert_eq!(args.iterations, Some(50));
        assert_eq!(args.seed, Some(3));
        assert!(args.dry_run);
    }

    #[test]
    fn test_global_flags() {
        let cli = parse_args(&["-v", "validate", "config.yaml"]).unwrap();
        assert!(cli.verbose);
        let cli = parse_args(&["info", "config.yaml", "-q", "--format", "json"]).unwrap();
        assert!(cli.quiet);
        let Command::Info(args) = cli.command else { panic!("Expected Info command") };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(parse_args(&["info", "config.yaml", "--format", "toml"]).is_err());
        assert!(parse_args(&["quantize", "model.gguf"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut spec: PidGanSpec = serde_yaml::from_str("training:\n  gan_type: standard\n").unwrap();
        let args = TrainArgs {
            config: PathBuf::from("c.yaml"),
            iterations: Some(5),
            seed: Some(1),
            log_every: None,
            save_config: None,
            dry_run: false,
        };
        apply_overrides(&mut spec, &args);
        assert_eq!(spec.training.iterations, 5);
        assert_eq!(spec.seed, Some(1));
        assert_eq!(spec.training.log_every, 100);
    }
}
