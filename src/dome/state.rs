//! Dome, shutter and park states.

use core::fmt;

/// Rotation state machine. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomeState {
    /// Idle and accepting host intents.
    Ready,
    /// Searching for the home sensor.
    Homing,
    /// Unwinding accumulated rotation.
    Derotating,
    /// Resetting the encoder counters.
    Calibrating,
    /// Tracking toward the target azimuth.
    Moving,
    /// Not yet connected.
    #[default]
    Unknown,
}

impl DomeState {
    /// State name for logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            DomeState::Ready => "Ready",
            DomeState::Homing => "Homing",
            DomeState::Derotating => "Derotating",
            DomeState::Calibrating => "Calibrating",
            DomeState::Moving => "Moving",
            DomeState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DomeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shutter position as inferred from the limit sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutterState {
    /// Open limit reached.
    Open,
    /// Closed limit reached.
    Closed,
    /// Between limits.
    Moving,
    /// Not yet observed.
    #[default]
    Unknown,
}

impl fmt::Display for ShutterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShutterState::Open => "Open",
            ShutterState::Closed => "Closed",
            ShutterState::Moving => "Moving",
            ShutterState::Unknown => "Unknown",
        })
    }
}

/// Requested shutter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterOperation {
    /// Drive toward the open limit.
    Open,
    /// Drive toward the closed limit.
    Close,
}

/// Park orchestration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParkState {
    /// In use.
    #[default]
    Unparked,
    /// Moving to the park azimuth and/or closing the shutter.
    Parking,
    /// At the park azimuth with the shutter closed if required.
    Parked,
    /// Opening the shutter.
    Unparking,
}

impl fmt::Display for ParkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParkState::Unparked => "Unparked",
            ParkState::Parking => "Parking",
            ParkState::Parked => "Parked",
            ParkState::Unparking => "Unparking",
        })
    }
}

/// Outcome of a host intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing left to do.
    Complete,
    /// Started; completion is reported by later ticks.
    Busy,
}

/// Jog start/stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    /// Assert the direction output.
    Start,
    /// Release both direction outputs.
    Stop,
}
