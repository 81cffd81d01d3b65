//! Azimuth tracking from the encoder counters.

use embedded_hal::delay::DelayNs;
use tracing::{debug, warn};

use crate::config::{Degrees, EncoderGeometry};
use crate::error::Result;
use crate::protocol::{Command, PositionWord, Protocol};

/// Azimuth for an in-turn position and turn count, relative to `home`.
///
/// Always in `[0, 360)`.
pub fn azimuth(geometry: &EncoderGeometry, position: u16, turns: u16, home: Degrees) -> Degrees {
    let fraction = (geometry.encoder_count(position, turns) / geometry.steps_per_circle()).fract();
    Degrees(fraction * 360.0 - home.value()).normalized()
}

/// Outcome of checking a pair of encoder words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Both checksums valid.
    Valid,
    /// At least one checksum failed but the value was used.
    Suspect,
    /// At least one checksum failed and the value was dropped.
    Discarded,
}

/// Tracks the dome azimuth across poll ticks.
///
/// A failed read keeps the last-known azimuth.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    geometry: EncoderGeometry,
    home: Degrees,
    discard_corrupt: bool,
    azimuth: Degrees,
    last_words: Option<(PositionWord, PositionWord)>,
    corrupt_reads: u32,
}

impl PositionTracker {
    /// Create a tracker at azimuth 0.
    pub fn new(geometry: EncoderGeometry, home: Degrees, discard_corrupt: bool) -> Self {
        Self {
            geometry,
            home,
            discard_corrupt,
            azimuth: Degrees(0.0),
            last_words: None,
            corrupt_reads: 0,
        }
    }

    /// Last computed azimuth.
    #[inline]
    pub fn azimuth(&self) -> Degrees {
        self.azimuth
    }

    /// Home sensor azimuth.
    #[inline]
    pub fn home(&self) -> Degrees {
        self.home
    }

    /// Move the home reference. Takes effect on the next update.
    #[inline]
    pub fn set_home(&mut self, home: Degrees) {
        self.home = home;
    }

    /// Report `azimuth` until the next update.
    pub fn settle_on(&mut self, azimuth: Degrees) {
        self.azimuth = azimuth.normalized();
    }

    /// Encoder geometry.
    #[inline]
    pub fn geometry(&self) -> &EncoderGeometry {
        &self.geometry
    }

    /// Raw `(position, turns)` words from the last successful read.
    #[inline]
    pub fn last_words(&self) -> Option<(PositionWord, PositionWord)> {
        self.last_words
    }

    /// Number of reads with a failed checksum.
    #[inline]
    pub fn corrupt_reads(&self) -> u32 {
        self.corrupt_reads
    }

    /// Read both counters and recompute the azimuth.
    ///
    /// # Errors
    ///
    /// Returns the codec error if either counter cannot be read; the
    /// previous azimuth is kept.
    pub fn update<D: DelayNs>(&mut self, protocol: &mut Protocol<D>) -> Result<Reading> {
        let position = PositionWord(protocol.read_u16(Command::GetPosition)?);
        let turns = PositionWord(protocol.read_u16(Command::GetTurns)?);
        Ok(self.apply(position, turns))
    }

    /// Fold a pair of raw words into the tracked azimuth.
    pub fn apply(&mut self, position: PositionWord, turns: PositionWord) -> Reading {
        let mut reading = Reading::Valid;

        for (name, word) in [("position", position), ("turns", turns)] {
            if !word.checksum_valid() {
                let (k1, k0) = word.stored_checksum();
                let (expected_k1, expected_k0) = word.expected_checksum();
                warn!(
                    counter = name,
                    raw = word.raw(),
                    k1,
                    k0,
                    expected_k1,
                    expected_k0,
                    "encoder checksum mismatch"
                );
                reading = Reading::Suspect;
            }
        }

        if reading == Reading::Suspect {
            self.corrupt_reads += 1;
            if self.discard_corrupt {
                return Reading::Discarded;
            }
        }

        self.last_words = Some((position, turns));
        self.azimuth = azimuth(&self.geometry, position.value(), turns.value(), self.home);
        debug!(
            position = position.value(),
            turns = turns.value(),
            azimuth = self.azimuth.value(),
            "position updated"
        );
        reading
    }
}
