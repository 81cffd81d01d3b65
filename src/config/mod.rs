//! Configuration module for ashdome.
//!
//! Provides types for loading and validating the dome configuration from
//! TOML files or pre-parsed data.

mod geometry;
mod loader;
mod system;
pub mod units;
mod validation;

pub use geometry::EncoderGeometry;
pub use loader::{load_config, parse_config};
pub use system::{DomeConfig, DomeSettings, RetrySettings, SerialSettings, DEFAULT_PARK_AZIMUTH};
pub use validation::validate_config;

// Re-export unit types at config level
pub use units::{shortest_delta, Degrees, Steps};
