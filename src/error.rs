//! Error types for the ashdome library.
//!
//! Provides unified error handling across configuration, transport, protocol
//! and dome control.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all ashdome operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Byte-level link failure (recoverable by retry/reconnect)
    Transport(TransportError),
    /// Error code reported by the controller board
    Protocol(ProtocolError),
    /// Dome control error
    Dome(DomeError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// File I/O error
    IoError(heapless::String<128>),
    /// Azimuth outside [0, 360)
    InvalidAzimuth(f64),
    /// Azimuth tolerance must be positive
    InvalidTolerance(f64),
    /// Encoder geometry values must be non-zero
    InvalidGeometry {
        /// Offending field name
        field: &'static str,
    },
    /// Retry budget must allow at least one attempt
    InvalidRetryBudget(u8),
    /// Baud rate must be non-zero
    InvalidBaudRate(u32),
    /// Calibration table exceeds capacity
    InertiaTableFull(usize),
}

/// Link-level errors. These are transient and retried by the codec.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// No open connection
    NotConnected,
    /// Writing the command frame failed
    WriteFailed(std::io::ErrorKind),
    /// No complete response within the read timeout
    Timeout,
    /// Reading the response failed
    ReadFailed(std::io::ErrorKind),
    /// Opening the serial connection failed
    ConnectFailed(heapless::String<128>),
}

/// Errors reported by the controller board (or its simulated stand-in).
///
/// These are never retried: the board understood the request and refused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Another motion is already in progress
    MotionConflict,
    /// The board does not implement the command
    FunctionNotSupported,
    /// The command payload was rejected
    ParamError,
    /// The transport has no hardware behind it
    NotSupportedByFirmware,
}

/// Dome control errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DomeError {
    /// Liveness probe failed at connect time
    NotDetected,
    /// Operation requires a connected dome
    NotConnected,
    /// Intent rejected because the dome is busy
    Busy(heapless::String<32>),
    /// Azimuth argument outside [0, 360)
    InvalidAzimuth(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Dome(e) => write!(f, "Dome error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::InvalidAzimuth(v) => {
                write!(f, "Invalid azimuth: {}. Must be in [0, 360)", v)
            }
            ConfigError::InvalidTolerance(v) => write!(f, "Invalid tolerance: {}. Must be > 0", v),
            ConfigError::InvalidGeometry { field } => {
                write!(f, "Invalid encoder geometry: {} must be > 0", field)
            }
            ConfigError::InvalidRetryBudget(v) => {
                write!(f, "Invalid retry budget: {}. Must be >= 1", v)
            }
            ConfigError::InvalidBaudRate(v) => write!(f, "Invalid baud rate: {}", v),
            ConfigError::InertiaTableFull(cap) => {
                write!(f, "Inertia table exceeds {} entries", cap)
            }
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotConnected => write!(f, "Serial link not connected"),
            TransportError::WriteFailed(kind) => write!(f, "Write failed: {:?}", kind),
            TransportError::Timeout => write!(f, "Read timed out"),
            TransportError::ReadFailed(kind) => write!(f, "Read failed: {:?}", kind),
            TransportError::ConnectFailed(msg) => write!(f, "Connect failed: {}", msg),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MotionConflict => write!(f, "Motion conflict"),
            ProtocolError::FunctionNotSupported => write!(f, "Function not supported"),
            ProtocolError::ParamError => write!(f, "Parameter error"),
            ProtocolError::NotSupportedByFirmware => write!(f, "Function not supported by firmware"),
        }
    }
}

impl fmt::Display for DomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomeError::NotDetected => write!(f, "Dome controller not detected"),
            DomeError::NotConnected => write!(f, "Dome not connected"),
            DomeError::Busy(state) => write!(f, "Dome busy: {}", state),
            DomeError::InvalidAzimuth(v) => {
                write!(f, "Invalid azimuth: {}. Must be in [0, 360)", v)
            }
        }
    }
}

impl Error {
    /// Whether the codec may retry the exchange that produced this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<DomeError> for Error {
    fn from(e: DomeError) -> Self {
        Error::Dome(e)
    }
}

impl std::error::Error for Error {}

impl std::error::Error for ConfigError {}

impl std::error::Error for TransportError {}

impl std::error::Error for ProtocolError {}

impl std::error::Error for DomeError {}

/// Copy a message into a bounded error string, truncating on overflow.
pub(crate) fn bounded<const N: usize>(msg: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in msg.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
