//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, PidGanSpec, ValidateArgs};

/// Format network architecture as a string
pub fn format_network_info(spec: &PidGanSpec) -> String {
    format!(
        "  Generator: {} (latent_dim={}, hidden_dim={})\n  Discriminator: {:?} (hidden_dim={}, {})",
        spec.generator.name,
        spec.generator.latent_dim,
        spec.generator.hidden_dim,
        spec.discriminator.name,
        spec.discriminator.hidden_dim,
        if spec.discriminator.name.conditioning().is_conditional() {
            "conditional"
        } else {
            "unconditional"
        }
    )
}

/// Format data configuration as a string
pub fn format_data_info(spec: &PidGanSpec) -> String {
    format!(
        "  Data: {} modes, radius {}, std {}\n  Batch size: {}",
        spec.data.modes, spec.data.radius, spec.data.std, spec.training.batch_size
    )
}

/// Format optimizer configuration as a string
pub fn format_optimizer_info(spec: &PidGanSpec) -> String {
    let optimizer = &spec.optimizer;
    let mut lines = vec![
        format!("  Optimizer: {}", optimizer.name),
        format!("  Learning rate: G={} D={}", optimizer.lr_g, optimizer.lr_d),
    ];
    if optimizer.weight_decay > 0.0 {
        lines.push(format!("  Weight decay: {}", optimizer.weight_decay));
    }
    lines.join("\n")
}

/// Format the control loop as a string
pub fn format_control_info(spec: &PidGanSpec) -> String {
    let training = &spec.training;
    let mut lines = vec![
        format!("  Loss: {}", training.gan_type),
        format!(
            "  Gains: pv={} iv={} dv={} (time_step={})",
            training.pv, training.iv, training.dv, training.time_step
        ),
    ];
    if training.iv > 0.0 {
        lines.push(format!(
            "  Integral: {} (replay capacity x{})",
            training.pid_type, training.replay_capacity_factor
        ));
    }
    if training.dv > 0.0 {
        lines.push(format!("  Derivative: {:?}", training.derivative_mode));
    }
    if training.reg_param > 0.0 {
        lines.push(format!(
            "  Regularizer: {} x{}",
            training.reg_type.as_str(),
            training.reg_param
        ));
    }
    if let Some(clip) = training.clip_d {
        lines.push(format!("  Gradient clipping: {clip}"));
    }
    lines.push(format!("  Iterations: {}", training.iterations));
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &PidGanSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_network_info(spec));
    println!();
    println!("{}", format_data_info(spec));
    println!();
    println!("{}", format_optimizer_info(spec));
    println!();
    println!("{}", format_control_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    // load_config validates after parsing
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
