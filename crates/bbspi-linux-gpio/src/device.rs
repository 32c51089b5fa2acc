//! Bit-banged SPI over the Linux GPIO character device
//!
//! Each open bus holds its own gpiocdev line request for the four pins.
//! Transfers clock bytes out MSB-first, full duplex, with CPOL/CPHA
//! handling for all four SPI modes and half-period sleeps derived from
//! the configured baud rate.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use gpiocdev::line::{Bias, Offset, Value};
use gpiocdev::request::{Config, Request};

use bbspi_core::error::{Error, Result};
use bbspi_core::{BusConfig, TransferEngine};

use crate::error::LinuxGpioError;

/// One claimed bus: the line request plus cached timing/mode data
struct LineBus {
    request: Request,
    config: BusConfig,
    half_period: Duration,
}

impl LineBus {
    fn set(&self, offset: u8, high: bool) -> Result<()> {
        let value = if high { Value::Active } else { Value::Inactive };
        self.request
            .set_value(Offset::from(offset), value)
            .map_err(Error::io)
    }

    fn get(&self, offset: u8) -> Result<bool> {
        let value = self
            .request
            .value(Offset::from(offset))
            .map_err(Error::io)?;
        Ok(value == Value::Active)
    }

    fn delay(&self) {
        if !self.half_period.is_zero() {
            thread::sleep(self.half_period);
        }
    }

    /// Clock one byte out on MOSI while sampling MISO, MSB first
    fn transfer_byte(&self, tx: u8) -> Result<u8> {
        let idle = self.config.mode.cpol();
        let cpha = self.config.mode.cpha();
        let mut rx = 0u8;

        for i in (0..8).rev() {
            let bit = (tx >> i) & 1 != 0;
            if !cpha {
                // data valid before the leading edge, sampled on it
                self.set(self.config.mosi, bit)?;
                self.delay();
                self.set(self.config.sclk, !idle)?;
                if self.get(self.config.miso)? {
                    rx |= 1 << i;
                }
                self.delay();
                self.set(self.config.sclk, idle)?;
            } else {
                // data shifted on the leading edge, sampled on the trailing
                self.set(self.config.sclk, !idle)?;
                self.set(self.config.mosi, bit)?;
                self.delay();
                self.set(self.config.sclk, idle)?;
                if self.get(self.config.miso)? {
                    rx |= 1 << i;
                }
                self.delay();
            }
        }
        Ok(rx)
    }
}

/// Bit-bang transfer engine over a Linux gpiochip
///
/// Line offsets in the bus configuration are interpreted as offsets on
/// the chip this engine was created for.
pub struct LinuxGpioEngine {
    device: String,
    buses: HashMap<u8, LineBus>,
}

impl LinuxGpioEngine {
    /// Create an engine for the given gpiochip device path
    ///
    /// Opens the chip once to fail early if the path is wrong or
    /// inaccessible.
    pub fn new(device: impl Into<String>) -> std::result::Result<Self, LinuxGpioError> {
        let device = device.into();
        gpiocdev::chip::Chip::from_path(&device).map_err(|source| {
            LinuxGpioError::ChipOpenFailed {
                path: device.clone(),
                source,
            }
        })?;
        Ok(Self {
            device,
            buses: HashMap::new(),
        })
    }
}

impl TransferEngine for LinuxGpioEngine {
    fn claim(&mut self, config: &BusConfig) -> Result<()> {
        if self.buses.contains_key(&config.cs) {
            return Err(Error::ResourceBusy(config.cs));
        }

        // Initial line states: CS high (peripheral deselected), SCLK at
        // the mode's idle level, MOSI low, MISO input with pull-up.
        let sclk_idle = if config.mode.cpol() {
            Value::Active
        } else {
            Value::Inactive
        };
        let mut req_config = Config::default();
        req_config.with_line(Offset::from(config.cs)).as_output(Value::Active);
        req_config.with_line(Offset::from(config.sclk)).as_output(sclk_idle);
        req_config.with_line(Offset::from(config.mosi)).as_output(Value::Inactive);
        req_config
            .with_line(Offset::from(config.miso))
            .as_input()
            .with_bias(Bias::PullUp);

        let request = Request::from_config(req_config)
            .on_chip(&self.device)
            .with_consumer("bbspi")
            .request()
            .map_err(|e| {
                log::error!("line request on {} failed: {}", self.device, e);
                Error::ResourceBusy(config.cs)
            })?;

        log::debug!(
            "{}: claimed lines cs={} miso={} mosi={} sclk={}",
            self.device,
            config.cs,
            config.miso,
            config.mosi,
            config.sclk
        );

        let half_period = Duration::from_nanos(config.half_period_ns());
        self.buses.insert(
            config.cs,
            LineBus {
                request,
                config: *config,
                half_period,
            },
        );
        Ok(())
    }

    fn release(&mut self, cs: u8) -> Result<()> {
        match self.buses.remove(&cs) {
            // dropping the request releases the lines
            Some(_) => {
                log::debug!("{}: released lines for cs={}", self.device, cs);
                Ok(())
            }
            None => Err(Error::NotOpen(cs)),
        }
    }

    fn transfer(&mut self, cs: u8, out: &[u8]) -> Result<Vec<u8>> {
        let bus = self.buses.get(&cs).ok_or(Error::NotOpen(cs))?;

        // Select the peripheral (CS is active low)
        bus.set(cs, false)?;
        bus.delay();

        let mut rx = Vec::with_capacity(out.len());
        let result = (|| -> Result<()> {
            for &byte in out {
                rx.push(bus.transfer_byte(byte)?);
            }
            Ok(())
        })();

        // Deselect even if a line operation failed mid-byte
        let idle = bus.config.mode.cpol();
        let _ = bus.set(bus.config.sclk, idle);
        bus.delay();
        let deselect = bus.set(cs, true);
        bus.delay();

        result?;
        deselect?;
        Ok(rx)
    }
}
