//! Inertia compensation.
//!
//! The dome keeps coasting after the drive stops. A measured table relates
//! step counts to the movement the dome actually makes;
//! [`InertiaTable::compensate`] picks the largest index whose entry does not
//! exceed the request so the dome stops where it was asked to.
//!
//! Calibration files hold one `index;value` (or `index ;value`) pair per
//! line. A line is kept only when its index equals its line number.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Steps;
use crate::error::{bounded, ConfigError, Error, Result};

/// Maximum number of calibration entries.
pub const INERTIA_TABLE_CAPACITY: usize = 2048;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Measured inertia curve. Empty means no compensation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InertiaTable {
    entries: heapless::Vec<u32, INERTIA_TABLE_CAPACITY>,
}

impl InertiaTable {
    /// Table that passes every request through unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from in-memory entries.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more than [`INERTIA_TABLE_CAPACITY`] entries.
    pub fn from_entries(entries: &[u32]) -> Result<Self> {
        let entries = heapless::Vec::from_slice(entries)
            .map_err(|()| Error::Config(ConfigError::InertiaTableFull(INERTIA_TABLE_CAPACITY)))?;
        Ok(Self { entries })
    }

    /// Parse calibration file contents.
    ///
    /// Unparseable and out-of-sequence lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the table outgrows [`INERTIA_TABLE_CAPACITY`].
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        let mut table = Self::default();

        for (line_number, line) in text.lines().enumerate() {
            let Some((index, value)) = parse_line(line) else {
                continue;
            };
            if index != line_number {
                continue;
            }
            table
                .entries
                .push(value)
                .map_err(|_| Error::Config(ConfigError::InertiaTableFull(INERTIA_TABLE_CAPACITY)))?;
        }

        Ok(table)
    }

    /// Load a calibration file. A missing file yields the identity table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or is too large.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text)?;
                info!(path = %path.display(), entries = table.len(), "read inertia table");
                Ok(table)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no inertia table, compensation disabled");
                Ok(Self::identity())
            }
            Err(e) => Err(Error::Config(ConfigError::IoError(bounded(&e.to_string())))),
        }
    }

    /// Number of calibration entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no calibration is loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calibration entries in index order.
    #[inline]
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Reduce a requested step count so the coasting dome lands on it.
    ///
    /// Past the end of the table the inertia of the last entry is assumed
    /// to hold, clamped at zero.
    pub fn compensate(&self, steps: Steps) -> Steps {
        let requested = steps.value();
        let Some(&last) = self.entries.last() else {
            debug!(steps = requested, "inertia passthrough");
            return steps;
        };

        let adjusted = match self.entries.iter().position(|&entry| entry > requested) {
            Some(index) => index.saturating_sub(1) as u32,
            None => {
                let last_index = (self.entries.len() - 1) as i64;
                let inertia = i64::from(last) - last_index;
                let movement = (i64::from(requested) - inertia).max(0);
                u32::try_from(movement).unwrap_or(u32::MAX)
            }
        };

        debug!(steps = requested, adjusted, "inertia");
        Steps(adjusted)
    }
}

fn parse_line(line: &str) -> Option<(usize, u32)> {
    let (index, value) = line.split_once(';')?;
    Some((index.trim().parse().ok()?, value.trim().parse().ok()?))
}
