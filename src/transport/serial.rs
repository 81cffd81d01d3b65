//! Serial transport: frames opcodes onto a byte link with read timeouts.

use std::io::{self, Read, Write};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::{Error, ProtocolError, Result, TransportError};
use crate::protocol::Command;

use super::Transport;

/// Largest payload a command frame may carry.
const MAX_PAYLOAD: usize = 4;

/// Byte stream to the board with timeout-bounded reads.
pub trait Link: Read + Write {
    /// Drop any bytes pending in either direction.
    fn discard_pending(&mut self) -> io::Result<()>;

    /// Change the read timeout.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

/// Opens (and re-opens) the link a [`SerialTransport`] talks over.
pub trait Connector {
    /// Link produced by this connector.
    type Link: Link;

    /// Open a fresh link.
    fn open(&mut self) -> Result<Self::Link>;
}

/// Transport over a serial link.
///
/// Stale input is discarded before each write so a reply always belongs to
/// the command just sent. Failures are reported as errors, never panics.
pub struct SerialTransport<C: Connector> {
    connector: C,
    link: Option<C::Link>,
    read_timeout: Duration,
    detect_timeout: Duration,
    last_command: Option<Command>,
}

impl<C: Connector> SerialTransport<C> {
    /// Open the link and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector cannot open the link.
    pub fn open(mut connector: C, read_timeout: Duration, detect_timeout: Duration) -> Result<Self> {
        let link = connector.open()?;
        Ok(Self {
            connector,
            link: Some(link),
            read_timeout,
            detect_timeout,
            last_command: None,
        })
    }

    /// Most recently written opcode.
    #[inline]
    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    /// Whether a link is currently open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    fn link(&mut self) -> Result<&mut C::Link> {
        self.link
            .as_mut()
            .ok_or(Error::Transport(TransportError::NotConnected))
    }

    fn send(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_PAYLOAD {
            return Err(Error::Protocol(ProtocolError::ParamError));
        }

        let mut frame: heapless::Vec<u8, { MAX_PAYLOAD + 1 }> = heapless::Vec::new();
        // Capacity is checked above
        let _ = frame.push(command.opcode());
        let _ = frame.extend_from_slice(payload);

        self.last_command = Some(command);
        let link = self.link()?;

        if let Err(e) = link.discard_pending() {
            warn!(error = %e, "failed to discard pending serial bytes");
        }

        debug!(opcode = command.opcode(), ?command, len = frame.len(), "write");
        link.write_all(&frame)
            .and_then(|()| link.flush())
            .map_err(|e| {
                error!(?command, error = %e, "error writing command");
                Error::Transport(TransportError::WriteFailed(e.kind()))
            })
    }

    fn receive(&mut self, command: Command, buf: &mut [u8]) -> Result<()> {
        let link = self.link()?;
        link.read_exact(buf).map_err(|e| {
            error!(?command, error = %e, "error reading reply");
            Error::Transport(classify_read_error(e.kind()))
        })
    }
}

fn classify_read_error(kind: io::ErrorKind) -> TransportError {
    match kind {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::UnexpectedEof => {
            TransportError::Timeout
        }
        other => TransportError::ReadFailed(other),
    }
}

/// Map an acknowledgement byte to a board error, if it is one.
fn classify_reply(reply: u8) -> Option<ProtocolError> {
    match Command::from_opcode(reply) {
        Some(Command::MotionConflict) => Some(ProtocolError::MotionConflict),
        Some(Command::FunctionNotSupported) => Some(ProtocolError::FunctionNotSupported),
        Some(Command::ParamError) => Some(ProtocolError::ParamError),
        _ => None,
    }
}

impl<C: Connector> Transport for SerialTransport<C> {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn write(&mut self, command: Command) -> Result<()> {
        self.send(command, &[])
    }

    fn write_buf(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        self.send(command, payload)
    }

    fn read(&mut self, command: Command) -> Result<()> {
        let mut reply = [0u8; 1];
        self.receive(command, &mut reply)?;

        match classify_reply(reply[0]) {
            Some(code) => {
                error!(?command, %code, "board rejected command");
                Err(Error::Protocol(code))
            }
            None => Ok(()),
        }
    }

    fn read_buf(&mut self, command: Command, buf: &mut [u8]) -> Result<()> {
        self.receive(command, buf)
    }

    fn detect(&mut self) -> bool {
        if let Err(e) = self.write(Command::Ping) {
            warn!(error = %e, "detect: ping not sent");
            return false;
        }

        let (detect_timeout, read_timeout) = (self.detect_timeout, self.read_timeout);
        if let Ok(link) = self.link() {
            let _ = link.set_read_timeout(detect_timeout);
        }

        let mut reply = [0u8; 1];
        let result = self.receive(Command::Ping, &mut reply);

        if let Ok(link) = self.link() {
            let _ = link.set_read_timeout(read_timeout);
        }

        let detected = result.is_ok() && reply[0] == Command::Ping.opcode();
        info!(reply = reply[0], detected, "detect");
        detected
    }

    fn reconnect(&mut self) -> Result<()> {
        info!("reconnecting serial link");
        // Drop the old link before opening the new one
        self.link = None;
        let link = self.connector.open()?;
        self.link = Some(link);
        info!("serial link re-opened");
        Ok(())
    }
}

#[cfg(feature = "serial")]
pub use port::SerialPortConnector;

#[cfg(feature = "serial")]
mod port {
    use std::io;
    use std::time::Duration;

    use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

    use crate::config::SerialSettings;
    use crate::error::{bounded, Error, Result, TransportError};

    use super::{Connector, Link};

    /// Opens the system serial device named in the configuration.
    #[derive(Debug, Clone)]
    pub struct SerialPortConnector {
        port: heapless::String<64>,
        baud_rate: u32,
        timeout: Duration,
    }

    impl SerialPortConnector {
        /// Create a connector for `port` at `baud_rate`, 8N1, no flow control.
        pub fn new(port: &str, baud_rate: u32, timeout: Duration) -> Self {
            Self {
                port: bounded(port),
                baud_rate,
                timeout,
            }
        }

        /// Create a connector from the `[serial]` section.
        pub fn from_settings(settings: &SerialSettings) -> Self {
            Self::new(settings.port.as_str(), settings.baud_rate, settings.timeout())
        }
    }

    impl Connector for SerialPortConnector {
        type Link = Box<dyn SerialPort>;

        fn open(&mut self) -> Result<Self::Link> {
            serialport::new(self.port.as_str(), self.baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(self.timeout)
                .open()
                .map_err(|e| Error::Transport(TransportError::ConnectFailed(bounded(&e.to_string()))))
        }
    }

    impl Link for Box<dyn SerialPort> {
        fn discard_pending(&mut self) -> io::Result<()> {
            self.clear(ClearBuffer::All).map_err(io::Error::from)
        }

        fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
            self.set_timeout(timeout).map_err(io::Error::from)
        }
    }
}
