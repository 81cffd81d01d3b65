//! Park position and park/unpark progress.

use tracing::info;

use crate::config::{Degrees, DEFAULT_PARK_AZIMUTH};

use super::state::ParkState;

/// Where to park.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParkPosition {
    /// A fixed azimuth.
    Azimuth(Degrees),
    /// Wherever the dome is now.
    Current,
}

/// Park bookkeeping owned by the dome.
#[derive(Debug, Clone, Copy)]
pub struct Park {
    state: ParkState,
    azimuth: Degrees,
    controls_shutter: bool,
}

impl Park {
    /// Create an unparked record.
    pub fn new(azimuth: Degrees, controls_shutter: bool) -> Self {
        Self {
            state: ParkState::Unparked,
            azimuth,
            controls_shutter,
        }
    }

    /// Current park state.
    #[inline]
    pub fn state(&self) -> ParkState {
        self.state
    }

    /// Park azimuth.
    #[inline]
    pub fn azimuth(&self) -> Degrees {
        self.azimuth
    }

    /// Whether park closes and unpark opens the shutter.
    #[inline]
    pub fn controls_shutter(&self) -> bool {
        self.controls_shutter
    }

    /// Whether a park is in progress.
    #[inline]
    pub fn is_parking(&self) -> bool {
        self.state == ParkState::Parking
    }

    /// Whether an unpark is in progress.
    #[inline]
    pub fn is_unparking(&self) -> bool {
        self.state == ParkState::Unparking
    }

    /// Set the park azimuth.
    pub fn set_azimuth(&mut self, azimuth: Degrees) {
        info!(azimuth = azimuth.value(), "park azimuth set");
        self.azimuth = azimuth;
    }

    /// Restore the default park azimuth.
    pub fn reset_azimuth(&mut self) {
        self.set_azimuth(Degrees(DEFAULT_PARK_AZIMUTH));
    }

    /// Enable or disable shutter handling on park/unpark.
    pub fn set_controls_shutter(&mut self, enabled: bool) {
        self.controls_shutter = enabled;
    }

    /// Move to `state`. Returns true if it changed.
    pub fn transition(&mut self, state: ParkState) -> bool {
        if self.state == state {
            return false;
        }
        info!(from = %self.state, to = %state, "park state");
        self.state = state;
        true
    }
}
