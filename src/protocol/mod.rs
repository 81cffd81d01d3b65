//! Wire protocol for the dome controller board.
//!
//! - [`Command`]: opcode table
//! - [`PositionWord`]: checksummed encoder words
//! - [`DigitalInputs`], [`Input`], [`Output`], [`BoardStatus`]: I/O channels
//! - [`OutputStates`]: remembered relay states
//! - [`Protocol`]: typed exchanges with retry and reconnect

mod checksum;
mod codec;
mod command;
mod io;

pub use checksum::{PositionWord, MAX_POSITION_VALUE};
pub use codec::{Protocol, RetryPolicy};
pub use command::Command;
pub use io::{BoardStatus, DigitalInputs, Input, Output, OutputStates, DIGITAL_BLOCK_LEN};
