//! Dome configuration - root configuration structure.

use std::path::PathBuf;
use std::time::Duration;

use heapless::String;
use serde::Deserialize;

use super::geometry::EncoderGeometry;
use super::units::Degrees;

/// Root configuration structure from TOML.
///
/// Every section is optional and falls back to the driver defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DomeConfig {
    /// Dome behaviour and persisted host values.
    pub dome: DomeSettings,

    /// Serial link parameters.
    pub serial: SerialSettings,

    /// Encoder geometry.
    pub encoder: EncoderGeometry,

    /// Codec retry policy.
    pub retry: RetrySettings,
}

/// `[dome]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomeSettings {
    /// Device name used in logs.
    pub name: String<32>,

    /// Use the simulated transport instead of the serial port.
    pub simulation: bool,

    /// Azimuth of the home sensor.
    pub home_azimuth: Degrees,

    /// Azimuth the dome parks at.
    pub park_azimuth: Degrees,

    /// Close the shutter on park and open it on unpark.
    #[serde(rename = "park_controls_shutter")]
    pub park_shutter: bool,

    /// Acceptable azimuth error for a completed move.
    #[serde(rename = "tolerance_deg")]
    pub tolerance: Degrees,

    /// Host poll cadence.
    pub poll_interval_ms: u64,

    /// Raw rotation counter magnitude below which de-rotation completes.
    pub derotate_threshold: i32,

    /// Environment sensors are read every N ticks.
    pub sensor_poll_divider: u32,

    /// Discard position words with a bad checksum instead of using them.
    pub discard_corrupt_reads: bool,

    /// Optional inertia calibration file (`~/` is expanded).
    pub inertia_table: Option<PathBuf>,
}

impl Default for DomeSettings {
    fn default() -> Self {
        Self {
            name: crate::error::bounded("AshDome"),
            simulation: false,
            home_azimuth: Degrees(0.0),
            park_azimuth: Degrees(DEFAULT_PARK_AZIMUTH),
            park_shutter: true,
            tolerance: Degrees(0.5),
            poll_interval_ms: 1000,
            derotate_threshold: 100,
            sensor_poll_divider: 10,
            discard_corrupt_reads: false,
            inertia_table: None,
        }
    }
}

/// Default park azimuth in degrees.
pub const DEFAULT_PARK_AZIMUTH: f64 = 90.0;

impl DomeSettings {
    /// Host poll cadence as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// `[serial]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device path.
    pub port: String<64>,

    /// Line speed.
    pub baud_rate: u32,

    /// Per-read timeout.
    pub timeout_ms: u64,

    /// Timeout for the liveness probe reply.
    pub detect_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: crate::error::bounded("/dev/serial0"),
            baud_rate: 9600,
            timeout_ms: 10_000,
            detect_timeout_ms: 1000,
        }
    }
}

impl SerialSettings {
    /// Per-read timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Liveness probe timeout as a duration.
    pub fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }
}

/// `[retry]` section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Write+read cycles attempted before a codec call fails.
    pub max_attempts: u8,

    /// Pause after re-opening the link.
    pub reconnect_settle_ms: u32,

    /// Pause after an encoder counter reset.
    pub reset_settle_ms: u32,

    /// Pause between failed attempts.
    pub backoff_ms: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            reconnect_settle_ms: 1000,
            reset_settle_ms: 200,
            backoff_ms: 0,
        }
    }
}

impl DomeConfig {
    /// Resolve the calibration file path, expanding a leading `~/`.
    pub fn inertia_table_path(&self) -> Option<PathBuf> {
        let path = self.dome.inertia_table.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}
