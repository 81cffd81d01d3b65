//! Unit tests for configuration validation.

use ashdome::config::{parse_config, validate_config, DomeConfig};
use ashdome::error::{ConfigError, Error};
use ashdome::Degrees;

/// Test validation of the default configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&DomeConfig::default()).is_ok());
}

/// Test validation fails for a home azimuth outside [0, 360).
#[test]
fn test_invalid_home_azimuth() {
    let mut config = DomeConfig::default();
    config.dome.home_azimuth = Degrees(-5.0);

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAzimuth(-5.0)))
    );
}

/// Test validation fails for a non-positive tolerance.
#[test]
fn test_invalid_tolerance() {
    let result = parse_config("[dome]\ntolerance_deg = 0.0");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTolerance(_)))
    ));
}

/// Test validation fails for a zero baud rate.
#[test]
fn test_invalid_baud_rate() {
    let result = parse_config("[serial]\nbaud_rate = 0");
    assert_eq!(result.map(|_| ()), Err(Error::Config(ConfigError::InvalidBaudRate(0))));
}

/// Test that an empty file is a valid configuration.
#[test]
fn test_empty_config_is_valid() {
    let config = parse_config("").unwrap();
    assert_eq!(config.dome.park_azimuth, Degrees(90.0));
    assert!(config.dome.park_shutter);
}
