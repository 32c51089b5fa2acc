//! bbspi-core - Core library for bit-banged SPI register access
//!
//! This crate provides a register-oriented access layer on top of a
//! software (bit-banged) SPI bus. A logical bus is opened on four
//! arbitrary GPIO pins and identified by its chip-select pin; register
//! reads and writes then follow the common 1-byte-address-plus-data
//! convention used by simple sensor ICs (address byte with bit 7 as the
//! read flag, payload bytes after it).
//!
//! The electrical bit-banging itself is abstracted behind the
//! [`TransferEngine`] trait, so the core can be driven by a real GPIO
//! backend or by an in-memory peripheral for testing.
//!
//! # Example
//!
//! ```ignore
//! use bbspi_core::{BusConfig, BusRegistry, Mode};
//!
//! let registry = BusRegistry::new(engine);
//! registry.open(BusConfig::new(26, 20, 21, 16).with_baud(115_200))?;
//! registry.write8(26, 0x00, 0x5A)?;
//! let value = registry.read8(26, 0x00)?;
//! registry.close(26)?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bus;
pub mod codec;
pub mod engine;
pub mod error;
pub mod registry;
pub mod subsystem;

#[cfg(test)]
pub(crate) mod testutil;

pub use bus::{BusConfig, Mode};
pub use engine::TransferEngine;
pub use error::{Error, Result, TransferFailure};
pub use registry::BusRegistry;
