//! Notifications and snapshots for the host.

use crate::config::Degrees;
use crate::error::Error;
use crate::protocol::{BoardStatus, Command, DigitalInputs, OutputStates};

use super::sensors::EnvironmentReadings;
use super::state::{DomeState, ParkState, ShutterState};

/// Capacity of the event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 32;

/// Discrete state change reported to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum DomeEvent {
    /// Rotation state machine moved.
    StateChanged {
        /// Previous state.
        from: DomeState,
        /// New state.
        to: DomeState,
    },
    /// Shutter state changed.
    ShutterChanged(ShutterState),
    /// Park state changed.
    ParkChanged(ParkState),
    /// A refined move settled within tolerance of its target.
    TargetReached(Degrees),
    /// A command failed after retries.
    CommandFailed {
        /// Opcode that failed.
        command: Command,
        /// Final error.
        error: Error,
    },
    /// An encoder read carried a bad checksum.
    ChecksumMismatch,
}

/// Bounded FIFO of events. When full the oldest event is dropped.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: heapless::Deque<DomeEvent, EVENT_QUEUE_CAPACITY>,
    dropped: u32,
}

impl EventQueue {
    /// Append an event.
    pub fn push(&mut self, event: DomeEvent) {
        if self.events.is_full() {
            self.events.pop_front();
            self.dropped += 1;
        }
        let _ = self.events.push_back(event);
    }

    /// Take the oldest event.
    pub fn pop(&mut self) -> Option<DomeEvent> {
        self.events.pop_front()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded because the host did not drain the queue.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Immutable view of everything the host displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DomeStatus {
    /// Rotation state.
    pub state: DomeState,
    /// Current azimuth.
    pub azimuth: Degrees,
    /// Target azimuth of the last move.
    pub target: Degrees,
    /// Home sensor azimuth.
    pub home_azimuth: Degrees,
    /// Park azimuth.
    pub park_azimuth: Degrees,
    /// Shutter state.
    pub shutter: ShutterState,
    /// Park state.
    pub park: ParkState,
    /// Last board status word.
    pub board: BoardStatus,
    /// Last digital input snapshot.
    pub inputs: DigitalInputs,
    /// Last commanded outputs.
    pub outputs: OutputStates,
    /// Last environment readings, if any were taken.
    pub environment: Option<EnvironmentReadings>,
    /// Encoder reads with a bad checksum.
    pub corrupt_reads: u32,
    /// Link reconnects since construction.
    pub reconnects: u32,
}
