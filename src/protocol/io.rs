//! Digital I/O channels and the board status word.

use bitflags::bitflags;

/// Number of bytes in the extended digital input block.
pub const DIGITAL_BLOCK_LEN: usize = 5;

/// Limit switches and sensors wired to the board inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Input {
    /// Azimuth encoder pulse.
    Encoder = 0,
    /// Dome home sensor.
    Home = 1,
    /// Shutter 1 open limit.
    Open1 = 2,
    /// Shutter 1 closed limit.
    Closed1 = 3,
    /// Shutter 2 open limit.
    Open2 = 4,
    /// Shutter 2 closed limit.
    Closed2 = 5,
    /// Telescope at home.
    ScopeHome = 6,
    /// Rain sensor.
    Rain = 7,
    /// Cloud sensor.
    Cloud = 8,
    /// Observatory safe.
    Safe = 9,
    /// Rotary link established.
    RotaryLink = 10,
    /// Free input.
    Free = 11,
}

impl Input {
    /// Every named input, in channel order.
    pub const ALL: [Input; 12] = [
        Input::Encoder,
        Input::Home,
        Input::Open1,
        Input::Closed1,
        Input::Open2,
        Input::Closed2,
        Input::ScopeHome,
        Input::Rain,
        Input::Cloud,
        Input::Safe,
        Input::RotaryLink,
        Input::Free,
    ];

    /// Channel number on the board.
    #[inline]
    pub const fn channel(self) -> u8 {
        self as u8
    }
}

/// Relay and motor outputs driven by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Output {
    /// Clockwise rotation button.
    Cw = 16,
    /// Counter-clockwise rotation button.
    Ccw = 17,
    /// Shutter 1 open motor.
    Open1 = 18,
    /// Shutter 1 close motor.
    Close1 = 19,
    /// Relay 1 (reset).
    Relay1 = 20,
    /// Relay 2 (heater).
    Relay2 = 21,
    /// Relay 3.
    Relay3 = 22,
    /// Relay 4.
    Relay4 = 23,
    /// Camera power.
    Ccd = 24,
    /// Telescope power.
    Scope = 25,
    /// Dome light.
    Light = 26,
    /// Fan.
    Fan = 27,
}

impl Output {
    /// Outputs the host may switch directly.
    pub const RELAYS: [Output; 8] = [
        Output::Ccd,
        Output::Scope,
        Output::Light,
        Output::Fan,
        Output::Relay1,
        Output::Relay2,
        Output::Relay3,
        Output::Relay4,
    ];

    /// Channel number on the board.
    #[inline]
    pub const fn channel(self) -> u8 {
        self as u8
    }
}

/// Last commanded state of each output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputStates(u16);

impl OutputStates {
    const FIRST_CHANNEL: u8 = Output::Cw as u8;

    /// Whether `output` was last switched on.
    #[inline]
    pub fn is_on(self, output: Output) -> bool {
        self.0 & Self::mask(output) != 0
    }

    /// Record a commanded state.
    pub fn set(&mut self, output: Output, on: bool) {
        if on {
            self.0 |= Self::mask(output);
        } else {
            self.0 &= !Self::mask(output);
        }
    }

    #[inline]
    fn mask(output: Output) -> u16 {
        1 << (output.channel() - Self::FIRST_CHANNEL)
    }
}

/// Snapshot of the extended digital input block.
///
/// Channel `n` is bit `n & 7` of byte `n >> 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitalInputs([u8; DIGITAL_BLOCK_LEN]);

impl DigitalInputs {
    /// Wrap a raw block as read from the board.
    #[inline]
    pub const fn from_bytes(bytes: [u8; DIGITAL_BLOCK_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw block.
    #[inline]
    pub const fn bytes(&self) -> [u8; DIGITAL_BLOCK_LEN] {
        self.0
    }

    /// Whether an input channel is asserted.
    #[inline]
    pub fn is_active(&self, input: Input) -> bool {
        self.channel(input.channel())
    }

    /// Whether a raw channel is asserted. Out-of-range channels read as off.
    pub fn channel(&self, channel: u8) -> bool {
        let byte = usize::from(channel >> 3);
        let bit = 1u8 << (channel & 7);
        self.0.get(byte).map_or(false, |b| b & bit != 0)
    }

    /// Set or clear a channel.
    pub fn set(&mut self, input: Input, active: bool) {
        let channel = input.channel();
        let byte = usize::from(channel >> 3);
        let bit = 1u8 << (channel & 7);
        if let Some(b) = self.0.get_mut(byte) {
            if active {
                *b |= bit;
            } else {
                *b &= !bit;
            }
        }
    }
}

bitflags! {
    /// Board status word returned by `GetStatus`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BoardStatus: u16 {
        /// Rotation in progress.
        const MOVING = 0x0001;
        /// Home search in progress.
        const HOMING = 0x0002;
        /// Shutter motor running.
        const SHUTTER_MOVING = 0x0004;
    }
}

impl BoardStatus {
    /// Whether the dome is still rotating or searching for home.
    #[inline]
    pub fn is_rotating(self) -> bool {
        self.intersects(BoardStatus::MOVING | BoardStatus::HOMING)
    }
}
