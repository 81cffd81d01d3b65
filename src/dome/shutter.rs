//! Shutter state machine.
//!
//! The shutter has no position feedback beyond its two limit sensors, so
//! its state is inferred each tick from the digital inputs. The requested
//! operation is remembered to tell which limit completes it.

use tracing::info;

use crate::protocol::{DigitalInputs, Input, Output};

use super::state::{ShutterOperation, ShutterState};

/// Relay changes needed to start a shutter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutterDrive {
    /// Relay to deassert first.
    pub release: Output,
    /// Relay to assert.
    pub engage: Output,
}

/// Limit reached by an operation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutterArrival {
    /// Operation that completed.
    pub operation: ShutterOperation,
    /// Drive relay to release now that the limit is reached.
    pub release: Output,
}

/// Shutter tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shutter {
    state: ShutterState,
    target: Option<ShutterOperation>,
    driving: bool,
}

impl Shutter {
    /// Current state.
    #[inline]
    pub fn state(&self) -> ShutterState {
        self.state
    }

    /// Last requested operation.
    #[inline]
    pub fn target(&self) -> Option<ShutterOperation> {
        self.target
    }

    /// Request an operation.
    ///
    /// Returns `None` when the matching limit is already active, in which
    /// case nothing needs to be driven. Otherwise the shutter is marked
    /// [`ShutterState::Moving`] and the caller applies the returned relay
    /// changes.
    pub fn request(&mut self, operation: ShutterOperation, inputs: &DigitalInputs) -> Option<ShutterDrive> {
        self.target = Some(operation);

        let (limit, reached, drive) = match operation {
            ShutterOperation::Open => (
                Input::Open1,
                ShutterState::Open,
                ShutterDrive {
                    release: Output::Close1,
                    engage: Output::Open1,
                },
            ),
            ShutterOperation::Close => (
                Input::Closed1,
                ShutterState::Closed,
                ShutterDrive {
                    release: Output::Open1,
                    engage: Output::Close1,
                },
            ),
        };

        if inputs.is_active(limit) {
            info!(?operation, "shutter already at limit");
            self.state = reached;
            self.driving = false;
            return None;
        }

        self.state = ShutterState::Moving;
        self.driving = true;
        Some(drive)
    }

    /// Give up on a request whose relays could not be switched.
    pub fn abandon(&mut self, previous: ShutterState) {
        self.state = previous;
        self.driving = false;
    }

    /// Update from a fresh input snapshot.
    ///
    /// Returns the completed operation when a requested limit is reached.
    /// A limit seen while no operation is being driven only syncs the state;
    /// while driving away from the opposite limit the state stays
    /// [`ShutterState::Moving`].
    pub fn observe(&mut self, inputs: &DigitalInputs) -> Option<ShutterArrival> {
        let limit = if inputs.is_active(Input::Open1) {
            Some((ShutterOperation::Open, ShutterState::Open, Output::Open1))
        } else if inputs.is_active(Input::Closed1) {
            Some((ShutterOperation::Close, ShutterState::Closed, Output::Close1))
        } else {
            None
        };

        let Some((operation, reached, release)) = limit else {
            self.state = ShutterState::Moving;
            return None;
        };

        if self.driving {
            if self.target != Some(operation) {
                // Still leaving the opposite limit
                return None;
            }
            info!(state = %reached, "shutter limit reached");
            self.state = reached;
            self.driving = false;
            return Some(ShutterArrival { operation, release });
        }

        self.state = reached;
        None
    }
}
