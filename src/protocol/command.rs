//! Controller board opcodes.
//!
//! Every exchange starts with a single opcode byte, optionally followed by a
//! 1, 2 or 4 byte little-endian payload.

/// Opcode understood by the dome controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Liveness probe, echoed back by the board.
    Ping = 0x01,
    /// Read the 16-bit status word.
    GetStatus = 0x02,
    /// Read the checksummed in-turn encoder position.
    GetPosition = 0x03,
    /// Read the checksummed encoder turn counter.
    GetTurns = 0x04,
    /// Read the signed 32-bit accumulated rotation counter.
    GetCounterExt = 0x05,
    /// Read the 5-byte extended digital input block.
    GetAllDigitalExt = 0x06,
    /// Rotate clockwise by a 16-bit step count.
    CwRotation = 0x10,
    /// Rotate counter-clockwise by a 16-bit step count.
    CcwRotation = 0x11,
    /// Start the home sensor search.
    FindHome = 0x12,
    /// Stop all rotation.
    Stop = 0x13,
    /// Reset the encoder counters.
    ResetCounter = 0x14,
    /// Reset the accumulated rotation counter.
    ResetCounterExt = 0x15,
    /// Assert a digital output channel.
    SetDigitalChannel = 0x20,
    /// Deassert a digital output channel.
    ClearDigitalChannel = 0x21,
    /// Read shutter radio link strength.
    GetLinkStrength = 0x30,
    /// Read shutter internal power.
    GetAnalog1 = 0x31,
    /// Read shutter battery power.
    GetAnalog2 = 0x32,
    /// Read card internal power.
    GetMainAnalog1 = 0x33,
    /// Read card battery power.
    GetMainAnalog2 = 0x34,
    /// Read temperature inside the dome.
    GetTempIn = 0x35,
    /// Read temperature outside the dome.
    GetTempOut = 0x36,
    /// Read the humidity sensor temperature.
    GetTempHum = 0x37,
    /// Read relative humidity.
    GetHum = 0x38,
    /// Read barometric pressure.
    GetPressure = 0x39,
    /// Board reply: another motion is in progress.
    MotionConflict = 0xF0,
    /// Board reply: command not implemented.
    FunctionNotSupported = 0xF1,
    /// Board reply: payload rejected.
    ParamError = 0xF2,
}

impl Command {
    const ALL: [Command; 27] = [
        Command::Ping,
        Command::GetStatus,
        Command::GetPosition,
        Command::GetTurns,
        Command::GetCounterExt,
        Command::GetAllDigitalExt,
        Command::CwRotation,
        Command::CcwRotation,
        Command::FindHome,
        Command::Stop,
        Command::ResetCounter,
        Command::ResetCounterExt,
        Command::SetDigitalChannel,
        Command::ClearDigitalChannel,
        Command::GetLinkStrength,
        Command::GetAnalog1,
        Command::GetAnalog2,
        Command::GetMainAnalog1,
        Command::GetMainAnalog2,
        Command::GetTempIn,
        Command::GetTempOut,
        Command::GetTempHum,
        Command::GetHum,
        Command::GetPressure,
        Command::MotionConflict,
        Command::FunctionNotSupported,
        Command::ParamError,
    ];

    /// Wire opcode.
    #[inline]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Decode an opcode byte.
    pub fn from_opcode(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.opcode() == byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcodes_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.opcode(), b.opcode(), "{:?} / {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_from_opcode() {
        assert_eq!(Command::from_opcode(0x01), Some(Command::Ping));
        assert_eq!(Command::from_opcode(0xF0), Some(Command::MotionConflict));
        assert_eq!(Command::from_opcode(0x7F), None);
    }
}
