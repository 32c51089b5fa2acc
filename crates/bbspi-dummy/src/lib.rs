//! bbspi-dummy - In-memory register-file peripheral
//!
//! This crate provides a transfer engine that emulates a simple SPI
//! peripheral with a 128-register file. It honors the half-duplex
//! register convention: the first frame byte carries the register
//! address with bit 7 as the read flag, write payloads land in
//! consecutive registers, and reads stream consecutive registers into
//! bytes 1..N of the response while byte 0 echoes the command byte.
//!
//! Useful for tests and for exercising the CLI without hardware.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bbspi_core::error::{Error, Result};
use bbspi_core::{BusConfig, TransferEngine};

/// Number of emulated registers (addresses 0-127)
pub const NUM_REGISTERS: usize = 128;

/// Mask selecting the register address bits of a command byte
const REG_MASK: u8 = 0x7F;

/// Bit 7 of the command byte: set for reads
const READ_FLAG: u8 = 0x80;

/// Shared handle onto a dummy peripheral's register file
///
/// Lets tests seed and inspect registers after the peripheral has been
/// boxed into a registry.
#[derive(Clone)]
pub struct DummyRegisters(Arc<Mutex<[u8; NUM_REGISTERS]>>);

impl DummyRegisters {
    /// Read a register directly, bypassing the bus
    pub fn get(&self, reg: u8) -> u8 {
        self.0.lock().unwrap()[usize::from(reg & REG_MASK)]
    }

    /// Write a register directly, bypassing the bus
    pub fn set(&self, reg: u8, value: u8) {
        self.0.lock().unwrap()[usize::from(reg & REG_MASK)] = value;
    }
}

/// Dummy transfer engine emulating a register-file peripheral
pub struct DummyPeripheral {
    regs: Arc<Mutex<[u8; NUM_REGISTERS]>>,
    claimed: HashSet<u8>,
}

impl DummyPeripheral {
    /// Create a peripheral with all registers zeroed
    pub fn new() -> Self {
        Self {
            regs: Arc::new(Mutex::new([0u8; NUM_REGISTERS])),
            claimed: HashSet::new(),
        }
    }

    /// Create a peripheral with the first `init.len()` registers seeded
    pub fn with_registers(init: &[u8]) -> Self {
        let peripheral = Self::new();
        {
            let mut regs = peripheral.regs.lock().unwrap();
            let len = init.len().min(NUM_REGISTERS);
            regs[..len].copy_from_slice(&init[..len]);
        }
        peripheral
    }

    /// Handle for seeding/inspecting registers out of band
    pub fn registers(&self) -> DummyRegisters {
        DummyRegisters(Arc::clone(&self.regs))
    }
}

impl Default for DummyPeripheral {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferEngine for DummyPeripheral {
    fn claim(&mut self, config: &BusConfig) -> Result<()> {
        if !self.claimed.insert(config.cs) {
            return Err(Error::ResourceBusy(config.cs));
        }
        log::debug!("dummy: claimed cs={}", config.cs);
        Ok(())
    }

    fn release(&mut self, cs: u8) -> Result<()> {
        if !self.claimed.remove(&cs) {
            return Err(Error::NotOpen(cs));
        }
        log::debug!("dummy: released cs={}", cs);
        Ok(())
    }

    fn transfer(&mut self, cs: u8, out: &[u8]) -> Result<Vec<u8>> {
        if !self.claimed.contains(&cs) {
            return Err(Error::NotOpen(cs));
        }
        if out.is_empty() {
            return Ok(Vec::new());
        }

        let command = out[0];
        let reg = usize::from(command & REG_MASK);
        let mut regs = self.regs.lock().unwrap();

        let mut rx = vec![0u8; out.len()];
        rx[0] = command; // echo while the command byte clocks out

        if command & READ_FLAG != 0 {
            // stream consecutive registers, wrapping within the file
            for (i, byte) in rx[1..].iter_mut().enumerate() {
                *byte = regs[(reg + i) % NUM_REGISTERS];
            }
        } else {
            for (i, &byte) in out[1..].iter().enumerate() {
                regs[(reg + i) % NUM_REGISTERS] = byte;
            }
        }
        Ok(rx)
    }
}
