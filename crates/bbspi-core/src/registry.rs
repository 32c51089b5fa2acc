//! Bus slot registry and open/close lifecycle
//!
//! The registry is an arena of bus slots indexed by chip-select pin. A
//! registry-wide lock guards open/close (rare operations, coarse locking
//! is fine); each open slot carries its own transfer lock so transfers
//! on different buses only contend on the engine itself.

use std::sync::{Arc, Mutex};

use crate::bus::{BusConfig, MAX_USER_GPIO};
use crate::engine::TransferEngine;
use crate::error::{Error, Result, TransferFailure};

/// Number of bus slots (one per user GPIO pin usable as chip select)
pub const MAX_BUSES: usize = MAX_USER_GPIO as usize + 1;

struct Slot {
    config: BusConfig,
    /// Serializes transfers on this bus. Overlapping calls from multiple
    /// threads block here instead of interleaving on the GPIO lines.
    lock: Arc<Mutex<()>>,
}

/// Registry of open bit-banged SPI buses
///
/// Owns the transfer engine and tracks which chip selects map to an open
/// bus. At most one bus may be open per chip select, and no GPIO pin may
/// be shared between open buses.
pub struct BusRegistry {
    engine: Mutex<Box<dyn TransferEngine>>,
    slots: Mutex<[Option<Slot>; MAX_BUSES]>,
}

impl BusRegistry {
    /// Create a registry driving the given engine, with all slots closed
    pub fn new(engine: Box<dyn TransferEngine>) -> Self {
        Self {
            engine: Mutex::new(engine),
            slots: Mutex::new(std::array::from_fn(|_| None)),
        }
    }

    /// Open a bus on `config.cs`
    ///
    /// Validates the configuration, checks that the chip select slot is
    /// free and that none of the four pins is claimed by another open
    /// bus, then claims the pins through the engine.
    pub fn open(&self, config: BusConfig) -> Result<()> {
        config.validate()?;

        let mut slots = self.slots.lock().unwrap();
        if slots[config.cs as usize].is_some() {
            return Err(Error::ResourceBusy(config.cs));
        }
        for slot in slots.iter().flatten() {
            for &pin in &config.pins() {
                if slot.config.pins().contains(&pin) {
                    return Err(Error::ResourceBusy(pin));
                }
            }
        }

        self.engine.lock().unwrap().claim(&config)?;

        log::info!(
            "opened bus: cs={} miso={} mosi={} sclk={} baud={} mode={}",
            config.cs,
            config.miso,
            config.mosi,
            config.sclk,
            config.baud,
            config.mode.bits()
        );
        slots[config.cs as usize] = Some(Slot {
            config,
            lock: Arc::new(Mutex::new(())),
        });
        Ok(())
    }

    /// Close the bus on `cs`, releasing its pins
    ///
    /// Closing a chip select that is not open is an error, not a no-op.
    pub fn close(&self, cs: u8) -> Result<()> {
        if cs > MAX_USER_GPIO {
            return Err(Error::InvalidPin(cs));
        }
        let mut slots = self.slots.lock().unwrap();
        if slots[cs as usize].is_none() {
            return Err(Error::NotOpen(cs));
        }
        self.engine.lock().unwrap().release(cs)?;
        slots[cs as usize] = None;
        log::info!("closed bus: cs={}", cs);
        Ok(())
    }

    /// Whether a bus is currently open on `cs`
    pub fn is_open(&self, cs: u8) -> bool {
        cs <= MAX_USER_GPIO && self.slots.lock().unwrap()[cs as usize].is_some()
    }

    /// Configuration of the open bus on `cs`, if any
    pub fn config(&self, cs: u8) -> Option<BusConfig> {
        if cs > MAX_USER_GPIO {
            return None;
        }
        self.slots.lock().unwrap()[cs as usize]
            .as_ref()
            .map(|slot| slot.config)
    }

    /// Close every open bus, releasing all claimed pins
    ///
    /// Release failures are logged and do not stop the sweep. Used by
    /// subsystem shutdown.
    pub fn close_all(&self) {
        let mut slots = self.slots.lock().unwrap();
        let mut engine = self.engine.lock().unwrap();
        for (cs, slot) in slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                if let Err(e) = engine.release(cs as u8) {
                    log::warn!("failed to release bus on cs={}: {}", cs, e);
                }
            }
        }
    }

    /// Run one framed transaction on the bus open on `cs`
    ///
    /// Takes the slot's transfer lock, then the engine, and enforces the
    /// exact-length response policy.
    pub(crate) fn transact(&self, cs: u8, frame: &[u8]) -> Result<Vec<u8>> {
        if cs > MAX_USER_GPIO {
            return Err(Error::InvalidPin(cs));
        }
        let transfer_lock = {
            let slots = self.slots.lock().unwrap();
            match &slots[cs as usize] {
                Some(slot) => Arc::clone(&slot.lock),
                None => return Err(Error::NotOpen(cs)),
            }
        };
        let _guard = transfer_lock.lock().unwrap();

        log::trace!("cs={} tx={:02X?}", cs, frame);
        let rx = self.engine.lock().unwrap().transfer(cs, frame)?;
        log::trace!("cs={} rx={:02X?}", cs, rx);

        if rx.len() != frame.len() {
            return Err(Error::Transfer(TransferFailure::LengthMismatch {
                expected: frame.len(),
                actual: rx.len(),
            }));
        }
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FailingEngine, MockEngine};

    fn config(cs: u8) -> BusConfig {
        BusConfig::new(cs, 20, 21, 16).with_baud(115_200)
    }

    #[test]
    fn open_close_reopen() {
        let (registry, _shared) = MockEngine::registry();
        registry.open(config(26)).unwrap();
        assert!(registry.is_open(26));
        registry.close(26).unwrap();
        assert!(!registry.is_open(26));
        // slot is reusable after close
        registry.open(config(26)).unwrap();
    }

    #[test]
    fn double_open_is_busy() {
        let (registry, _shared) = MockEngine::registry();
        registry.open(config(26)).unwrap();
        assert!(matches!(
            registry.open(config(26)),
            Err(Error::ResourceBusy(26))
        ));
        // the failed open must not disturb the existing bus
        assert!(registry.is_open(26));
    }

    #[test]
    fn pin_overlap_across_chip_selects_is_busy() {
        let (registry, _shared) = MockEngine::registry();
        registry.open(config(26)).unwrap();
        // different cs, but sclk=16 is already claimed
        let conflicting = BusConfig::new(5, 6, 7, 16);
        assert!(matches!(
            registry.open(conflicting),
            Err(Error::ResourceBusy(16))
        ));
    }

    #[test]
    fn close_without_open_is_not_open() {
        let (registry, _shared) = MockEngine::registry();
        assert!(matches!(registry.close(26), Err(Error::NotOpen(26))));
    }

    #[test]
    fn close_bad_pin_is_invalid() {
        let (registry, _shared) = MockEngine::registry();
        assert!(matches!(registry.close(40), Err(Error::InvalidPin(40))));
    }

    #[test]
    fn open_propagates_validation_errors() {
        let (registry, _shared) = MockEngine::registry();
        let bad = BusConfig::new(26, 26, 21, 16);
        assert!(matches!(registry.open(bad), Err(Error::InvalidPin(26))));
        assert!(!registry.is_open(26));
    }

    #[test]
    fn failed_claim_leaves_slot_closed() {
        let registry = BusRegistry::new(Box::new(FailingEngine));
        assert!(registry.open(config(26)).is_err());
        assert!(!registry.is_open(26));
    }

    #[test]
    fn config_query_reflects_open_bus() {
        let (registry, _shared) = MockEngine::registry();
        assert_eq!(registry.config(26), None);
        registry.open(config(26)).unwrap();
        assert_eq!(registry.config(26), Some(config(26)));
        assert_eq!(registry.config(40), None);
    }

    #[test]
    fn transact_requires_open_bus() {
        let (registry, _shared) = MockEngine::registry();
        assert!(matches!(
            registry.transact(26, &[0x80, 0x00]),
            Err(Error::NotOpen(26))
        ));
    }

    #[test]
    fn short_response_is_length_mismatch() {
        let (registry, shared) = MockEngine::registry();
        registry.open(config(26)).unwrap();
        shared.push_response(vec![0x00]);
        let err = registry.transact(26, &[0x80, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            Error::Transfer(TransferFailure::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn close_all_empties_registry() {
        let (registry, _shared) = MockEngine::registry();
        registry.open(config(26)).unwrap();
        registry.open(BusConfig::new(5, 6, 7, 8)).unwrap();
        registry.close_all();
        assert!(!registry.is_open(26));
        assert!(!registry.is_open(5));
    }
}
