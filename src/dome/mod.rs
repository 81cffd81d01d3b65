//! Dome module for ashdome.
//!
//! Provides the dome controller with its rotation, shutter and park state
//! machines, position tracking and host notifications.

mod builder;
mod driver;
mod events;
mod park;
mod position;
mod sensors;
mod shutter;
pub mod state;

pub use builder::DomeBuilder;
pub use driver::{Dome, StdDelay};
pub use events::{DomeEvent, DomeStatus, EventQueue, EVENT_QUEUE_CAPACITY};
pub use park::{Park, ParkPosition};
pub use position::{azimuth, PositionTracker, Reading};
pub use sensors::{EnvironmentReadings, SensorSchedule};
pub use shutter::{Shutter, ShutterArrival, ShutterDrive};
pub use state::{DomeState, MotionCommand, ParkState, Progress, ShutterOperation, ShutterState};
