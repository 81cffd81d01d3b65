//! Unit tests for TOML configuration parsing.

use std::io::Write;

use ashdome::config::{load_config, DomeConfig};
use ashdome::{Degrees, Dome, SimulatedTransport};
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Test parsing every section from TOML.
#[test]
fn test_parse_dome_config() {
    let toml_str = r#"
[dome]
name = "Observatory"
home_azimuth = 15.0
park_azimuth = 270.0
park_controls_shutter = false
tolerance_deg = 0.25
poll_interval_ms = 500

[serial]
port = "/dev/ttyACM0"
baud_rate = 115200

[encoder]
steps_per_turn = 2048
turns_per_circle = 37

[retry]
max_attempts = 4
backoff_ms = 50
"#;

    let config: DomeConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.dome.name.as_str(), "Observatory");
    assert_eq!(config.dome.home_azimuth, Degrees(15.0));
    assert_eq!(config.dome.park_azimuth, Degrees(270.0));
    assert!(!config.dome.park_shutter);
    assert_eq!(config.dome.tolerance, Degrees(0.25));
    assert_eq!(config.dome.poll_interval().as_millis(), 500);
    assert_eq!(config.serial.port.as_str(), "/dev/ttyACM0");
    assert_eq!(config.serial.baud_rate, 115200);
    assert_eq!(config.encoder.steps_per_turn, 2048);
    assert_eq!(config.encoder.turns_per_circle, 37);
    assert_eq!(config.encoder.steps_per_revolution, 4096);
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.backoff_ms, 50);
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dome]\nname = \"FromFile\"\nsimulation = true").unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.dome.name.as_str(), "FromFile");
    assert!(config.dome.simulation);
}

/// Test that the builder reads the file and the simulated dome connects.
#[test]
fn test_builder_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dome]\nsimulation = true\npark_azimuth = 45.0").unwrap();

    let mut dome = Dome::builder()
        .config_file(file.path())
        .unwrap()
        .delay(NoopDelay::new())
        .build()
        .unwrap();
    assert_eq!(dome.park_azimuth(), Degrees(45.0));

    dome.connect_from_config().unwrap();
    assert!(dome.is_connected());
    dome.tick().unwrap();
}

/// Test that the simulated transport can also be attached directly.
#[test]
fn test_connect_simulated_transport() {
    let mut dome = Dome::builder().delay(NoopDelay::new()).build().unwrap();
    dome.connect(Box::new(SimulatedTransport::new())).unwrap();
    assert_eq!(dome.azimuth(), Degrees(0.0));
}

/// Test that a mistyped value is rejected.
#[test]
fn test_mistyped_value_rejected() {
    let result: Result<DomeConfig, _> = toml::from_str("[dome]\ntolerance_deg = \"wide\"");
    assert!(result.is_err());
}
