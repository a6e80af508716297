//! Loading run specifications from YAML

use std::fs;
use std::path::Path;

use super::schema::PidGanSpec;
use super::validate::validate_config;
use crate::{Error, Result};

/// Parse and validate a YAML document
pub fn parse_config(yaml: &str) -> Result<PidGanSpec> {
    let spec: PidGanSpec = serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;

    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;

    Ok(spec)
}

/// Read, parse and validate a YAML config file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<PidGanSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    parse_config(&yaml_content)
}

/// Write a spec as YAML, e.g. after command-line overrides
pub fn save_config<P: AsRef<Path>>(spec: &PidGanSpec, config_path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(config_path, yaml)?;
    Ok(())
}
