//! Transfer engine abstraction
//!
//! The electrical side of bit-banging (pin setup, clock generation,
//! sampling) lives behind this trait. The core validates configurations,
//! tracks which buses are open, and frames register transactions; the
//! engine moves the bytes.

use crate::bus::BusConfig;
use crate::error::Result;

/// A synchronous full-duplex bit-bang transfer engine
///
/// Implementations drive the actual GPIO lines (see `bbspi-linux-gpio`)
/// or emulate a peripheral in memory (see `bbspi-dummy`).
pub trait TransferEngine: Send {
    /// Claim the hardware resources for a bus
    ///
    /// Called by the registry after the configuration has been validated
    /// and checked for pin conflicts against other open buses.
    fn claim(&mut self, config: &BusConfig) -> Result<()>;

    /// Release the hardware resources claimed for the bus on `cs`
    fn release(&mut self, cs: u8) -> Result<()>;

    /// Perform one synchronous full-duplex transfer
    ///
    /// Clocks out `out` on the bus identified by `cs` and returns the
    /// bytes sampled in the same clock cycles. A conforming engine
    /// returns exactly `out.len()` bytes; the registry treats any other
    /// length as a transfer failure.
    fn transfer(&mut self, cs: u8, out: &[u8]) -> Result<Vec<u8>>;
}
