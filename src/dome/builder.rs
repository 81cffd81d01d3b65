//! Builder pattern for Dome.

use embedded_hal::delay::DelayNs;

use crate::config::{load_config, validate_config, DomeConfig};
use crate::error::{bounded, ConfigError, Error, Result};
use crate::motion::InertiaTable;

use super::driver::Dome;

/// Builder for creating Dome instances.
pub struct DomeBuilder<D: DelayNs> {
    config: Option<DomeConfig>,
    delay: Option<D>,
    inertia: Option<InertiaTable>,
}

impl<D: DelayNs> Default for DomeBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DelayNs> DomeBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            delay: None,
            inertia: None,
        }
    }

    /// Use `config`. Defaults apply otherwise.
    pub fn config(mut self, config: DomeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn config_file<P: AsRef<std::path::Path>>(self, path: P) -> Result<Self> {
        Ok(self.config(load_config(path)?))
    }

    /// Set the delay provider used for retry and settle pauses.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Use `table` instead of the configured calibration file.
    pub fn inertia(mut self, table: InertiaTable) -> Self {
        self.inertia = Some(table);
        self
    }

    /// Build the Dome. It starts disconnected.
    ///
    /// # Errors
    ///
    /// Returns an error if the delay is missing, the configuration is
    /// invalid or the calibration file cannot be read.
    pub fn build(self) -> Result<Dome<D>> {
        let delay = self.delay.ok_or_else(|| {
            Error::Config(ConfigError::ParseError(bounded("delay is required")))
        })?;

        let config = self.config.unwrap_or_default();
        validate_config(&config)?;

        let inertia = match (self.inertia, config.inertia_table_path()) {
            (Some(table), _) => table,
            (None, Some(path)) => InertiaTable::load(path)?,
            (None, None) => InertiaTable::identity(),
        };

        Ok(Dome::new(config, delay, inertia))
    }
}
