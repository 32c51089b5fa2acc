//! Bus configuration and validation
//!
//! A logical bit-banged SPI bus is described by four GPIO pins (chip
//! select, MISO, MOSI, clock), a baud rate, and an SPI mode. The
//! chip-select pin doubles as the identifier for the bus.

use crate::error::{Error, Result};

/// Highest user GPIO pin number usable for bit-banging
pub const MAX_USER_GPIO: u8 = 31;

/// Lowest supported bit-bang baud rate (bits/second)
pub const MIN_BAUD: u32 = 50;

/// Highest supported bit-bang baud rate (bits/second)
pub const MAX_BAUD: u32 = 250_000;

/// Default baud rate used by [`BusConfig::new`]
pub const DEFAULT_BAUD: u32 = 100_000;

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// CPOL=0, CPHA=0 - clock idles low, sample on rising edge
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1 - clock idles low, sample on falling edge
    Mode1,
    /// CPOL=1, CPHA=0 - clock idles high, sample on falling edge
    Mode2,
    /// CPOL=1, CPHA=1 - clock idles high, sample on rising edge
    Mode3,
}

impl Mode {
    /// Decode the mode from the low two bits of a flags word
    pub fn from_flags(flags: u8) -> Self {
        match flags & 0x3 {
            0 => Mode::Mode0,
            1 => Mode::Mode1,
            2 => Mode::Mode2,
            _ => Mode::Mode3,
        }
    }

    /// Mode number (0-3)
    pub fn bits(self) -> u8 {
        match self {
            Mode::Mode0 => 0,
            Mode::Mode1 => 1,
            Mode::Mode2 => 2,
            Mode::Mode3 => 3,
        }
    }

    /// Clock polarity: true if the clock idles high
    pub fn cpol(self) -> bool {
        matches!(self, Mode::Mode2 | Mode::Mode3)
    }

    /// Clock phase: true if data is sampled on the trailing edge
    pub fn cpha(self) -> bool {
        matches!(self, Mode::Mode1 | Mode::Mode3)
    }
}

/// Configuration for one logical bit-banged SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Chip select GPIO pin (identifies the bus)
    pub cs: u8,
    /// MISO GPIO pin
    pub miso: u8,
    /// MOSI GPIO pin
    pub mosi: u8,
    /// Clock GPIO pin
    pub sclk: u8,
    /// Baud rate in bits/second
    pub baud: u32,
    /// SPI mode (clock polarity/phase)
    pub mode: Mode,
}

impl BusConfig {
    /// Create a configuration with the given pins, default baud and mode 0
    pub fn new(cs: u8, miso: u8, mosi: u8, sclk: u8) -> Self {
        Self {
            cs,
            miso,
            mosi,
            sclk,
            baud: DEFAULT_BAUD,
            mode: Mode::default(),
        }
    }

    /// Set the baud rate
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Set the SPI mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// All four pins in a fixed order (cs, miso, mosi, sclk)
    pub fn pins(&self) -> [u8; 4] {
        [self.cs, self.miso, self.mosi, self.sclk]
    }

    /// Half clock period in nanoseconds for the configured baud rate
    pub fn half_period_ns(&self) -> u64 {
        if self.baud == 0 {
            return 0;
        }
        500_000_000 / u64::from(self.baud)
    }

    /// Check pin and baud legality
    ///
    /// All four pins must be within the user GPIO range and pairwise
    /// distinct, and the baud rate must be within the supported bit-bang
    /// range.
    pub fn validate(&self) -> Result<()> {
        let pins = self.pins();
        for &pin in &pins {
            if pin > MAX_USER_GPIO {
                return Err(Error::InvalidPin(pin));
            }
        }
        for i in 0..pins.len() {
            for j in (i + 1)..pins.len() {
                if pins[i] == pins[j] {
                    return Err(Error::InvalidPin(pins[i]));
                }
            }
        }
        if !(MIN_BAUD..=MAX_BAUD).contains(&self.baud) {
            return Err(Error::InvalidBaud(self.baud));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_polarity_and_phase() {
        assert!(!Mode::Mode0.cpol() && !Mode::Mode0.cpha());
        assert!(!Mode::Mode1.cpol() && Mode::Mode1.cpha());
        assert!(Mode::Mode2.cpol() && !Mode::Mode2.cpha());
        assert!(Mode::Mode3.cpol() && Mode::Mode3.cpha());
    }

    #[test]
    fn mode_from_flags_masks_high_bits() {
        assert_eq!(Mode::from_flags(0), Mode::Mode0);
        assert_eq!(Mode::from_flags(3), Mode::Mode3);
        assert_eq!(Mode::from_flags(0xF5), Mode::Mode1);
    }

    #[test]
    fn valid_config_passes() {
        let config = BusConfig::new(26, 20, 21, 16).with_baud(115_200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pin_out_of_range_rejected() {
        let config = BusConfig::new(32, 20, 21, 16);
        assert!(matches!(config.validate(), Err(Error::InvalidPin(32))));
    }

    #[test]
    fn coincident_pins_rejected() {
        let config = BusConfig::new(26, 20, 20, 16);
        assert!(matches!(config.validate(), Err(Error::InvalidPin(20))));
    }

    #[test]
    fn baud_out_of_range_rejected() {
        let low = BusConfig::new(26, 20, 21, 16).with_baud(10);
        assert!(matches!(low.validate(), Err(Error::InvalidBaud(10))));
        let high = BusConfig::new(26, 20, 21, 16).with_baud(1_000_000);
        assert!(matches!(high.validate(), Err(Error::InvalidBaud(1_000_000))));
    }

    #[test]
    fn half_period_from_baud() {
        let config = BusConfig::new(26, 20, 21, 16).with_baud(100_000);
        assert_eq!(config.half_period_ns(), 5000);
    }
}
