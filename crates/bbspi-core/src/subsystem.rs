//! Process-wide GPIO subsystem lifecycle
//!
//! The host application initializes the subsystem exactly once before
//! any bus operation and shuts it down at most once at exit. There is no
//! re-initialization path: after [`shutdown`], [`initialize`] keeps
//! failing with `AlreadyInitialized` and [`registry`] with
//! `NotInitialized`.
//!
//! Libraries and tests that do not want process globals can construct a
//! [`BusRegistry`] directly instead.

use std::sync::atomic::{AtomicU8, Ordering};

use once_cell::sync::OnceCell;

use crate::engine::TransferEngine;
use crate::error::{Error, Result};
use crate::registry::BusRegistry;

const UNINIT: u8 = 0;
const READY: u8 = 1;
const DOWN: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNINIT);
static REGISTRY: OnceCell<BusRegistry> = OnceCell::new();

/// Initialize the GPIO subsystem with the given transfer engine
///
/// Fails with `AlreadyInitialized` on any call but the first, including
/// after a shutdown.
pub fn initialize(engine: Box<dyn TransferEngine>) -> Result<()> {
    STATE
        .compare_exchange(UNINIT, READY, Ordering::SeqCst, Ordering::SeqCst)
        .map_err(|_| Error::AlreadyInitialized)?;
    // cannot race: the state transition above happens exactly once
    let _ = REGISTRY.set(BusRegistry::new(engine));
    log::info!("GPIO subsystem initialized");
    Ok(())
}

/// Access the process-wide bus registry
///
/// Fails with `NotInitialized` before [`initialize`] or after
/// [`shutdown`].
pub fn registry() -> Result<&'static BusRegistry> {
    if STATE.load(Ordering::SeqCst) != READY {
        return Err(Error::NotInitialized);
    }
    REGISTRY.get().ok_or(Error::NotInitialized)
}

/// Shut down the GPIO subsystem, closing every open bus
///
/// Idempotent: calls after the first (or before initialization) do
/// nothing.
pub fn shutdown() {
    if STATE
        .compare_exchange(READY, DOWN, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        if let Some(registry) = REGISTRY.get() {
            registry.close_all();
        }
        log::info!("GPIO subsystem shut down");
    }
}
