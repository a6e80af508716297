//! pidgan CLI
//!
//! # Usage
//!
//! ```bash
//! # Train from config
//! pidgan train config.yaml
//!
//! # Train with overrides
//! pidgan train config.yaml --iterations 500 --seed 7
//!
//! # Validate config
//! pidgan validate config.yaml --detailed
//!
//! # Show config info
//! pidgan info config.yaml --format json
//! ```

use clap::Parser;
use pidgan::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
