//! Encoder geometry: how raw counters map onto dome rotation.

use serde::Deserialize;

/// Encoder and drive constants.
///
/// The azimuth encoder counts `steps_per_turn` per encoder-shaft turn and
/// the dome completes one circle every `turns_per_circle` turns. Rotation
/// commands are sized separately using `steps_per_revolution`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncoderGeometry {
    /// Encoder steps per encoder-shaft turn.
    pub steps_per_turn: u32,

    /// Encoder-shaft turns per full dome circle.
    pub turns_per_circle: u32,

    /// Rotation command steps per 360 degrees.
    pub steps_per_revolution: u32,
}

impl Default for EncoderGeometry {
    fn default() -> Self {
        Self {
            steps_per_turn: 4096,
            turns_per_circle: 75,
            steps_per_revolution: 4096,
        }
    }
}

impl EncoderGeometry {
    /// Total encoder steps in one dome circle.
    #[inline]
    pub fn steps_per_circle(&self) -> f64 {
        f64::from(self.steps_per_turn) * f64::from(self.turns_per_circle)
    }

    /// Combine the in-turn position and the turn counter into one count.
    #[inline]
    pub fn encoder_count(&self, position: u16, turns: u16) -> f64 {
        f64::from(turns) * f64::from(self.steps_per_turn) + f64::from(position)
    }
}
