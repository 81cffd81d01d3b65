//! Stand-in transport for running without hardware.

use tracing::debug;

use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{Command, PositionWord};

use super::Transport;

/// Transport with no board behind it.
///
/// Writes are accepted and queries read back zeroes, with the encoder
/// counters carrying a valid checksum. Every acknowledgement reports
/// [`ProtocolError::NotSupportedByFirmware`], so action commands fail while
/// state reads succeed.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    last_command: Option<Command>,
    writes: u32,
}

impl SimulatedTransport {
    /// Create a simulated transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently written opcode.
    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    /// Number of frames written so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Transport for SimulatedTransport {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn write(&mut self, command: Command) -> Result<()> {
        debug!(?command, "simulated write");
        self.last_command = Some(command);
        self.writes += 1;
        Ok(())
    }

    fn write_buf(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        debug!(?command, len = payload.len(), "simulated write");
        self.last_command = Some(command);
        self.writes += 1;
        Ok(())
    }

    fn read(&mut self, _command: Command) -> Result<()> {
        Err(Error::Protocol(ProtocolError::NotSupportedByFirmware))
    }

    fn read_buf(&mut self, command: Command, buf: &mut [u8]) -> Result<()> {
        buf.fill(0);
        if matches!(command, Command::GetPosition | Command::GetTurns) {
            let word = PositionWord::encode(0).raw().to_le_bytes();
            for (dst, src) in buf.iter_mut().zip(word) {
                *dst = src;
            }
        }
        Ok(())
    }

    fn detect(&mut self) -> bool {
        true
    }

    fn reconnect(&mut self) -> Result<()> {
        Ok(())
    }
}
