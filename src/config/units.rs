//! Unit types for physical quantities.
//!
//! Provides type-safe representations of azimuth angles and encoder steps
//! to prevent unit confusion at compile time.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Angular position in degrees.
///
/// Used for configuration and the host-facing API. Azimuths are kept in
/// [0, 360) via [`Degrees::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Wrap into [0, 360).
    #[inline]
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Whether the value is a valid azimuth in [0, 360).
    #[inline]
    pub fn is_azimuth(self) -> bool {
        self.0.is_finite() && (0.0..360.0).contains(&self.0)
    }

    /// Signed shortest-path difference `target - self`, wrapped to [-180, 180].
    #[inline]
    pub fn shortest_delta_to(self, target: Degrees) -> Degrees {
        shortest_delta(self, target)
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Signed shortest rotation from `from` to `to`, in [-180, 180].
///
/// `shortest_delta(350, 10) == 20` and `shortest_delta(10, 350) == -20`.
pub fn shortest_delta(from: Degrees, to: Degrees) -> Degrees {
    let mut diff = to.0 - from.0;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    Degrees(diff)
}

/// Motor step count for a single rotation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub u32);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this is a zero-length move.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Steps covering `|delta|` at `steps_per_revolution`, truncated toward zero.
    #[inline]
    pub fn from_degrees(delta: Degrees, steps_per_revolution: u32) -> Self {
        let steps = delta.0.abs() * f64::from(steps_per_revolution) / 360.0;
        Self(steps as u32)
    }

    /// Clamp to the 16-bit payload of a rotation command.
    #[inline]
    pub fn to_wire(self) -> u16 {
        u16::try_from(self.0).unwrap_or(u16::MAX)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f64 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}
