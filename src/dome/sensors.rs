//! Environment sensor polling.

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::protocol::{Command, Protocol};

/// One round of environment readings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvironmentReadings {
    /// Shutter radio link strength.
    pub link_strength: u8,
    /// Shutter internal power, volts.
    pub shutter_power: f32,
    /// Shutter battery, volts.
    pub shutter_battery: f32,
    /// Card internal power, volts.
    pub card_power: f32,
    /// Card battery, volts.
    pub card_battery: f32,
    /// Temperature inside the dome, °C.
    pub temperature_inside: f32,
    /// Temperature outside the dome, °C.
    pub temperature_outside: f32,
    /// Humidity sensor temperature, °C.
    pub temperature_humidity: f32,
    /// Relative humidity, %.
    pub humidity: f32,
    /// Barometric pressure.
    pub pressure: f32,
}

impl EnvironmentReadings {
    /// Read every channel.
    ///
    /// # Errors
    ///
    /// Returns the first codec error encountered.
    pub fn read<D: DelayNs>(protocol: &mut Protocol<D>) -> Result<Self> {
        Ok(Self {
            link_strength: protocol.read_u8(Command::GetLinkStrength)?,
            shutter_power: protocol.read_f32(Command::GetAnalog1)?,
            shutter_battery: protocol.read_f32(Command::GetAnalog2)?,
            card_power: protocol.read_f32(Command::GetMainAnalog1)?,
            card_battery: protocol.read_f32(Command::GetMainAnalog2)?,
            temperature_inside: protocol.read_f32(Command::GetTempIn)?,
            temperature_outside: protocol.read_f32(Command::GetTempOut)?,
            temperature_humidity: protocol.read_f32(Command::GetTempHum)?,
            humidity: protocol.read_f32(Command::GetHum)?,
            pressure: protocol.read_f32(Command::GetPressure)?,
        })
    }
}

/// Fires on the first tick and then every `divider` ticks.
#[derive(Debug, Clone, Copy)]
pub struct SensorSchedule {
    divider: u32,
    countdown: u32,
}

impl SensorSchedule {
    /// Create a schedule. A divider of zero disables polling.
    pub fn new(divider: u32) -> Self {
        Self {
            divider,
            countdown: 0,
        }
    }

    /// Advance one tick. Returns true when the sensors are due.
    pub fn tick(&mut self) -> bool {
        if self.divider == 0 {
            return false;
        }
        if self.countdown == 0 {
            self.countdown = self.divider - 1;
            true
        } else {
            self.countdown -= 1;
            false
        }
    }
}
