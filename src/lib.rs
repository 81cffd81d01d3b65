//! # ashdome
//!
//! Motion and position control engine for the AshDome observatory dome
//! controller board.
//!
//! ## Features
//!
//! - **Configuration-driven**: Dome, serial link, encoder geometry and retry
//!   policy from a TOML file
//! - **Retrying codec**: Typed little-endian reads and writes over a
//!   reconnecting serial link
//! - **Inertia compensation**: Optional calibration table shortens commanded
//!   moves by the measured coast
//! - **State machines**: Rotation, shutter and park tracked on a host-driven
//!   poll tick
//! - **Simulation**: Run without hardware
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ashdome::{Degrees, Dome, StdDelay};
//!
//! let mut dome = Dome::builder()
//!     .config_file("ashdome.toml")?
//!     .delay(StdDelay)
//!     .build()?;
//!
//! dome.connect_from_config()?;
//! dome.move_abs(Degrees(135.0))?;
//!
//! loop {
//!     dome.tick()?;
//!     while let Some(event) = dome.poll_event() {
//!         println!("{event:?}");
//!     }
//!     std::thread::sleep(dome.config().dome.poll_interval());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serial` (default): Serial port transport via the `serialport` crate

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Error payloads are inline heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod dome;
pub mod error;
pub mod motion;
pub mod protocol;
pub mod transport;

// Re-exports for ergonomic API
pub use config::{load_config, parse_config, validate_config, DomeConfig};
pub use dome::{
    state, Dome, DomeBuilder, DomeEvent, DomeState, DomeStatus, MotionCommand, ParkPosition,
    ParkState, Progress, ShutterOperation, ShutterState, StdDelay,
};
pub use error::{Error, Result};
pub use motion::{Direction, InertiaTable, MovePlan};
pub use protocol::{Command, Protocol, RetryPolicy};
pub use transport::{SerialTransport, SimulatedTransport, Transport};

#[cfg(feature = "serial")]
pub use transport::SerialPortConnector;

// Unit types
pub use config::units::{Degrees, Steps, UnitExt};
