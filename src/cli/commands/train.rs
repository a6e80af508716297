//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    apply_overrides, load_config, save_config, train_from_spec, validate_config, IterationLog,
    TrainArgs,
};
use crate::trace::TRACER;

/// One progress line per logged iteration
pub fn format_iteration(entry: &IterationLog) -> String {
    let (p, d, i) = entry.losses.as_tuple();
    format!(
        "[it {:>6}] g_loss={:.4} d_loss={:.4} dloss={:.4} iloss={:.4} reg={:.4} (avg g={:.4} d={:.4})",
        entry.iteration,
        entry.gen_loss,
        p,
        d,
        i,
        entry.losses.penalty,
        entry.avg_gen_loss,
        entry.avg_disc_loss
    )
}

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("pidgan: Training from {}", args.config.display()),
    );

    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    if let Some(path) = &args.save_config {
        save_config(&spec, path).map_err(|e| format!("Failed to save config: {e}"))?;
        log(
            level,
            LogLevel::Verbose,
            &format!("  Resolved config written to {}", path.display()),
        );
    }

    let training = &spec.training;
    if args.dry_run {
        log(level, LogLevel::Normal, "Dry run - config validated successfully");
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Loss: {} (pv={}, iv={}, dv={})",
                training.gan_type, training.pv, training.iv, training.dv
            ),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Optimizer: {} (lr_g={}, lr_d={})",
                spec.optimizer.name, spec.optimizer.lr_g, spec.optimizer.lr_d
            ),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!("  Iterations: {}", training.iterations),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!("  Batch size: {}", training.batch_size),
        );
        return Ok(());
    }

    if level == LogLevel::Verbose {
        TRACER.clear();
        TRACER.enable();
    }

    let outcome = train_from_spec(&spec, |entry| {
        log(level, LogLevel::Normal, &format_iteration(entry));
    })
    .map_err(|e| format!("Training error: {e}"))?;

    if level == LogLevel::Verbose {
        TRACER.disable();
        println!("{}", TRACER.report());
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Training complete! ({} iterations)", outcome.iterations),
    );
    Ok(())
}
