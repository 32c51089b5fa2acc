//! BME280-style register sequence against the dummy peripheral
//!
//! Walks through the startup sequence of a Bosch BME280 sensor on SPI:
//! chip ID check, soft reset, calibration coefficient readout
//! (little-endian, signed and unsigned), sampling configuration, and a
//! compensated temperature measurement from the 20-bit raw reading.
//!
//! The register file is seeded with the calibration values and raw
//! sample from the BME280 datasheet worked example, so the printed
//! temperature should come out as 25.08 degC.
//!
//! Run with: cargo run -p bbspi-dummy --example bme280

use bbspi_core::{BusConfig, BusRegistry, Result};
use bbspi_dummy::DummyPeripheral;

// Register map (7-bit addresses; bit 7 is the bus direction flag)
const REGISTER_DIG_T1: u8 = 0x88;
const REGISTER_DIG_T2: u8 = 0x8A;
const REGISTER_DIG_T3: u8 = 0x8C;
const REGISTER_CHIPID: u8 = 0xD0;
const REGISTER_SOFTRESET: u8 = 0xE0;
const REGISTER_CONTROLHUMID: u8 = 0xF2;
const REGISTER_CONTROL: u8 = 0xF4;
const REGISTER_CONFIG: u8 = 0xF5;
const REGISTER_TEMPDATA: u8 = 0xFA;

const CHIP_ID: u8 = 0x60;
const SOFT_RESET: u8 = 0xB6;

const SAMPLING_X16: u8 = 0b101;
const MODE_NORMAL: u8 = 0b11;
const FILTER_OFF: u8 = 0b000;
const STANDBY_MS_0_5: u8 = 0b000;

struct Bme280<'a> {
    registry: &'a BusRegistry,
    cs: u8,
}

impl<'a> Bme280<'a> {
    fn new(registry: &'a BusRegistry, cs: u8) -> Self {
        Self { registry, cs }
    }

    /// Chip ID check, soft reset, default sampling configuration
    fn begin(&self) -> Result<bool> {
        let id = self.registry.read8(self.cs, REGISTER_CHIPID)?;
        if id != CHIP_ID {
            return Ok(false);
        }

        self.registry
            .write8(self.cs, REGISTER_SOFTRESET, SOFT_RESET)?;

        // ctrl_hum must be written before ctrl_meas for it to apply
        self.registry
            .write8(self.cs, REGISTER_CONTROLHUMID, SAMPLING_X16)?;
        self.registry.write8(
            self.cs,
            REGISTER_CONFIG,
            (STANDBY_MS_0_5 << 5) | (FILTER_OFF << 3),
        )?;
        self.registry.write8(
            self.cs,
            REGISTER_CONTROL,
            (SAMPLING_X16 << 5) | (SAMPLING_X16 << 3) | MODE_NORMAL,
        )?;
        Ok(true)
    }

    /// Compensated temperature in hundredths of a degree Celsius
    /// (datasheet integer formula)
    fn read_temperature(&self) -> Result<i32> {
        let dig_t1 = i32::from(self.registry.read16_le(self.cs, REGISTER_DIG_T1)?);
        let dig_t2 = i32::from(self.registry.read_s16_le(self.cs, REGISTER_DIG_T2)?);
        let dig_t3 = i32::from(self.registry.read_s16_le(self.cs, REGISTER_DIG_T3)?);

        // 20-bit raw sample, left-aligned in the 24-bit register window
        let adc_t = (self.registry.read24(self.cs, REGISTER_TEMPDATA)? >> 4) as i32;

        let var1 = (((adc_t >> 3) - (dig_t1 << 1)) * dig_t2) >> 11;
        let var2 = (((((adc_t >> 4) - dig_t1) * ((adc_t >> 4) - dig_t1)) >> 12) * dig_t3) >> 14;
        let t_fine = var1 + var2;
        Ok((t_fine * 5 + 128) >> 8)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Seed the register file with the datasheet worked example:
    // dig_T1=27504, dig_T2=26435, dig_T3=-1000, adc_T=519888
    let peripheral = DummyPeripheral::new();
    let regs = peripheral.registers();
    regs.set(REGISTER_CHIPID, CHIP_ID);
    regs.set(REGISTER_DIG_T1, 0x70);
    regs.set(REGISTER_DIG_T1 + 1, 0x6B);
    regs.set(REGISTER_DIG_T2, 0x43);
    regs.set(REGISTER_DIG_T2 + 1, 0x67);
    regs.set(REGISTER_DIG_T3, 0x18);
    regs.set(REGISTER_DIG_T3 + 1, 0xFC);
    regs.set(REGISTER_TEMPDATA, 0x7E);
    regs.set(REGISTER_TEMPDATA + 1, 0xED);
    regs.set(REGISTER_TEMPDATA + 2, 0x00);

    let registry = BusRegistry::new(Box::new(peripheral));
    registry.open(BusConfig::new(26, 20, 21, 16).with_baud(115_200))?;

    let sensor = Bme280::new(&registry, 26);
    if !sensor.begin()? {
        eprintln!("no BME280 found (bad chip ID)");
        std::process::exit(1);
    }
    println!("found BME280 (chip ID 0x{:02X})", CHIP_ID);

    let centi_deg = sensor.read_temperature()?;
    println!(
        "temperature: {}.{:02} degC",
        centi_deg / 100,
        centi_deg % 100
    );

    registry.close(26)?;
    Ok(())
}
