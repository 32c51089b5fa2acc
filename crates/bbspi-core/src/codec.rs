//! Register codec: command framing and numeric decoding
//!
//! Register transactions follow the 1-byte-address-plus-data convention:
//! the first byte of every frame is the register address with bit 7 as
//! the direction flag (set for reads, clear for writes), followed by the
//! write payload or zero filler bytes for the peripheral's response.
//!
//! Byte 0 of the response is never inspected. On a full-duplex bus it is
//! the peripheral's echo while the command byte was still being clocked
//! out, so it carries no data. Payload decoding starts at byte 1.

use crate::error::Result;
use crate::registry::BusRegistry;

/// Bit 7 of the command byte: set for reads, clear for writes
pub const READ_FLAG: u8 = 0x80;

/// Build the 2-byte write frame for a register
fn write_frame(reg: u8, value: u8) -> [u8; 2] {
    [reg & !READ_FLAG, value]
}

/// Build an N-byte read frame: command byte plus zero filler
fn read_frame<const N: usize>(reg: u8) -> [u8; N] {
    let mut frame = [0u8; N];
    frame[0] = reg | READ_FLAG;
    frame
}

fn decode_u16_be(payload: &[u8]) -> u16 {
    u16::from_be_bytes([payload[0], payload[1]])
}

fn decode_u16_le(payload: &[u8]) -> u16 {
    u16::from_le_bytes([payload[0], payload[1]])
}

fn decode_u24_be(payload: &[u8]) -> u32 {
    u32::from_be_bytes([0, payload[0], payload[1], payload[2]])
}

impl BusRegistry {
    /// Write an 8-bit value to a register
    pub fn write8(&self, cs: u8, reg: u8, value: u8) -> Result<()> {
        self.transact(cs, &write_frame(reg, value))?;
        Ok(())
    }

    /// Read an 8-bit value from a register
    pub fn read8(&self, cs: u8, reg: u8) -> Result<u8> {
        let rx = self.transact(cs, &read_frame::<2>(reg))?;
        Ok(rx[1])
    }

    /// Read an unsigned 16-bit big-endian value from a register
    pub fn read16(&self, cs: u8, reg: u8) -> Result<u16> {
        let rx = self.transact(cs, &read_frame::<3>(reg))?;
        Ok(decode_u16_be(&rx[1..]))
    }

    /// Read an unsigned 16-bit little-endian value from a register
    pub fn read16_le(&self, cs: u8, reg: u8) -> Result<u16> {
        let rx = self.transact(cs, &read_frame::<3>(reg))?;
        Ok(decode_u16_le(&rx[1..]))
    }

    /// Read a signed 16-bit big-endian value from a register
    pub fn read_s16(&self, cs: u8, reg: u8) -> Result<i16> {
        Ok(self.read16(cs, reg)? as i16)
    }

    /// Read a signed 16-bit little-endian value from a register
    pub fn read_s16_le(&self, cs: u8, reg: u8) -> Result<i16> {
        Ok(self.read16_le(cs, reg)? as i16)
    }

    /// Read an unsigned 24-bit big-endian value from a register
    pub fn read24(&self, cs: u8, reg: u8) -> Result<u32> {
        let rx = self.transact(cs, &read_frame::<4>(reg))?;
        Ok(decode_u24_be(&rx[1..]))
    }
}
