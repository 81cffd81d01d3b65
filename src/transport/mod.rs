//! Byte-level command channel to the dome controller.
//!
//! A [`Transport`] only moves frames; retry, reconnect and typed decoding
//! live in [`crate::protocol::Protocol`].

mod serial;
mod simulated;

pub use serial::{Connector, Link, SerialTransport};
#[cfg(feature = "serial")]
pub use serial::SerialPortConnector;
pub use simulated::SimulatedTransport;

use crate::error::Result;
use crate::protocol::Command;

/// Command channel to a controller board, real or simulated.
///
/// Every write is followed by exactly one read: [`Transport::read`] for the
/// one-byte acknowledgement of an action, [`Transport::read_buf`] for the
/// data payload of a query.
pub trait Transport {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Send a bare opcode.
    fn write(&mut self, command: Command) -> Result<()>;

    /// Send an opcode followed by a payload.
    fn write_buf(&mut self, command: Command, payload: &[u8]) -> Result<()>;

    /// Read the acknowledgement for `command`.
    ///
    /// Board error replies surface as [`crate::error::ProtocolError`].
    fn read(&mut self, command: Command) -> Result<()>;

    /// Read exactly `buf.len()` response bytes for `command`.
    fn read_buf(&mut self, command: Command, buf: &mut [u8]) -> Result<()>;

    /// Liveness probe.
    fn detect(&mut self) -> bool;

    /// Tear down and re-open the underlying link.
    fn reconnect(&mut self) -> Result<()>;
}
