//! Typed request/response exchanges with retry and reconnect.
//!
//! Every call is one or more write+read cycles against the transport. A
//! transient failure on the write side re-opens the link before the next
//! attempt; a transient failure on the read side simply retries. Errors
//! reported by the board end the call immediately.
//!
//! Multi-byte payloads and responses are little-endian on the wire.

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info, warn};

use crate::config::RetrySettings;
use crate::error::{Error, Result, TransportError};
use crate::transport::Transport;

use super::Command;

/// How many times an exchange is attempted and how long to pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Write+read cycles per call (at least one).
    pub max_attempts: u8,
    /// Pause after re-opening the link, in milliseconds.
    pub reconnect_settle_ms: u32,
    /// Pause between failed attempts, in milliseconds.
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    /// Build from the `[retry]` configuration section.
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            reconnect_settle_ms: settings.reconnect_settle_ms,
            backoff_ms: settings.backoff_ms,
        }
    }
}

/// Protocol codec over an owned, swappable transport.
///
/// Until a transport is attached every call fails with
/// [`TransportError::NotConnected`].
pub struct Protocol<D: DelayNs> {
    transport: Option<Box<dyn Transport>>,
    delay: D,
    policy: RetryPolicy,
    reconnects: u32,
}

impl<D: DelayNs> Protocol<D> {
    /// Create a codec with no transport attached.
    pub fn new(delay: D, policy: RetryPolicy) -> Self {
        Self {
            transport: None,
            delay,
            policy,
            reconnects: 0,
        }
    }

    /// Create a codec over `transport`.
    pub fn with_transport(transport: Box<dyn Transport>, delay: D, policy: RetryPolicy) -> Self {
        let mut protocol = Self::new(delay, policy);
        protocol.transport = Some(transport);
        protocol
    }

    /// Name of the attached transport.
    #[inline]
    pub fn transport_name(&self) -> Option<&'static str> {
        self.transport.as_ref().map(|t| t.name())
    }

    /// Whether a transport is attached.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    /// Active retry policy.
    #[inline]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Number of reconnects triggered since construction.
    #[inline]
    pub fn reconnect_count(&self) -> u32 {
        self.reconnects
    }

    /// Attach a transport, returning the one it replaces.
    pub fn attach(&mut self, transport: Box<dyn Transport>) -> Option<Box<dyn Transport>> {
        info!(transport = transport.name(), "transport attached");
        self.transport.replace(transport)
    }

    /// Detach the current transport.
    pub fn detach(&mut self) -> Option<Box<dyn Transport>> {
        self.transport.take()
    }

    /// Run the transport liveness probe. False when nothing is attached.
    pub fn detect(&mut self) -> bool {
        self.transport.as_mut().map_or(false, |t| t.detect())
    }

    /// Block for `ms` milliseconds.
    pub fn settle(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    fn transport(&mut self) -> Result<&mut Box<dyn Transport>> {
        self.transport
            .as_mut()
            .ok_or(Error::Transport(TransportError::NotConnected))
    }

    /// One exchange with the retry policy applied.
    ///
    /// An empty `response` reads the one-byte acknowledgement instead of a
    /// data payload.
    fn exchange(&mut self, command: Command, payload: &[u8], response: &mut [u8]) -> Result<()> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = Error::Transport(TransportError::NotConnected);

        for attempt in 1..=attempts {
            let transport = self.transport()?;
            let written = if payload.is_empty() {
                transport.write(command)
            } else {
                transport.write_buf(command, payload)
            };

            let outcome = match written {
                Ok(()) if response.is_empty() => self.transport()?.read(command),
                Ok(()) => self.transport()?.read_buf(command, response),
                Err(e) if e.is_transient() => {
                    warn!(?command, attempt, error = %e, "write failed, reconnecting");
                    self.reconnect();
                    Err(e)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    debug!(?command, attempt, error = %e, "exchange attempt failed");
                    last_error = e;
                }
            }

            if attempt < attempts {
                self.settle(self.policy.backoff_ms);
            }
        }

        error!(?command, attempts, error = %last_error, "exchange failed");
        Err(last_error)
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
        match self.transport().and_then(|t| t.reconnect()) {
            Ok(()) => info!(count = self.reconnects, "reconnected"),
            Err(e) => warn!(error = %e, "reconnect failed"),
        }
        self.settle(self.policy.reconnect_settle_ms);
    }

    fn read_array<const N: usize>(&mut self, command: Command) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.exchange(command, &[], &mut buf)?;
        Ok(buf)
    }

    /// Read an unsigned byte.
    pub fn read_u8(&mut self, command: Command) -> Result<u8> {
        self.read_array::<1>(command).map(|b| b[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self, command: Command) -> Result<i8> {
        self.read_array::<1>(command).map(i8::from_le_bytes)
    }

    /// Read an unsigned 16-bit value.
    pub fn read_u16(&mut self, command: Command) -> Result<u16> {
        self.read_array(command).map(u16::from_le_bytes)
    }

    /// Read a signed 16-bit value.
    pub fn read_i16(&mut self, command: Command) -> Result<i16> {
        self.read_array(command).map(i16::from_le_bytes)
    }

    /// Read an unsigned 32-bit value.
    pub fn read_u32(&mut self, command: Command) -> Result<u32> {
        self.read_array(command).map(u32::from_le_bytes)
    }

    /// Read a signed 32-bit value.
    pub fn read_i32(&mut self, command: Command) -> Result<i32> {
        self.read_array(command).map(i32::from_le_bytes)
    }

    /// Read an IEEE-754 single.
    pub fn read_f32(&mut self, command: Command) -> Result<f32> {
        self.read_array(command).map(f32::from_le_bytes)
    }

    /// Read exactly `buf.len()` raw bytes.
    pub fn read_buffer(&mut self, command: Command, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.exchange(command, &[], buf)
    }

    /// Send a bare command and wait for its acknowledgement.
    pub fn command(&mut self, command: Command) -> Result<()> {
        self.exchange(command, &[], &mut [])
    }

    /// Send a command with a one-byte payload.
    pub fn write_u8(&mut self, command: Command, value: u8) -> Result<()> {
        self.exchange(command, &[value], &mut [])
    }

    /// Send a command with a 16-bit payload.
    pub fn write_u16(&mut self, command: Command, value: u16) -> Result<()> {
        self.exchange(command, &value.to_le_bytes(), &mut [])
    }

    /// Send a command with a 32-bit payload.
    pub fn write_u32(&mut self, command: Command, value: u32) -> Result<()> {
        self.exchange(command, &value.to_le_bytes(), &mut [])
    }

    /// Send a command with a raw payload.
    pub fn write_buffer(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        self.exchange(command, payload, &mut [])
    }
}
