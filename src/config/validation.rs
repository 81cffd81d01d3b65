//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::DomeConfig;

/// Validate a dome configuration.
///
/// Checks:
/// - Home and park azimuths are in [0, 360)
/// - Tolerance is positive
/// - Encoder geometry is non-degenerate
/// - The retry budget allows at least one attempt
pub fn validate_config(config: &DomeConfig) -> Result<()> {
    validate_dome(&config.dome)?;

    let geometry = &config.encoder;
    for (field, value) in [
        ("steps_per_turn", geometry.steps_per_turn),
        ("turns_per_circle", geometry.turns_per_circle),
        ("steps_per_revolution", geometry.steps_per_revolution),
    ] {
        if value == 0 {
            return Err(Error::Config(ConfigError::InvalidGeometry { field }));
        }
    }

    if config.serial.baud_rate == 0 {
        return Err(Error::Config(ConfigError::InvalidBaudRate(0)));
    }

    if config.retry.max_attempts == 0 {
        return Err(Error::Config(ConfigError::InvalidRetryBudget(0)));
    }

    Ok(())
}

fn validate_dome(dome: &super::DomeSettings) -> Result<()> {
    if !dome.home_azimuth.is_azimuth() {
        return Err(Error::Config(ConfigError::InvalidAzimuth(dome.home_azimuth.0)));
    }

    if !dome.park_azimuth.is_azimuth() {
        return Err(Error::Config(ConfigError::InvalidAzimuth(dome.park_azimuth.0)));
    }

    if dome.tolerance.0.is_nan() || dome.tolerance.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidTolerance(dome.tolerance.0)));
    }

    Ok(())
}
