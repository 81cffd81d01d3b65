//! Configuration loading from files.

use std::fs;
use std::path::Path;

use crate::error::{bounded, ConfigError, Error, Result};

use super::DomeConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use ashdome::load_config;
///
/// let config = load_config("ashdome.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DomeConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(bounded(&e.to_string()))))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<DomeConfig> {
    let config: DomeConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(bounded(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
