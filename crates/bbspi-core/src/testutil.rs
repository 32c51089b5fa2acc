//! Shared test helpers: scriptable mock transfer engines

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::bus::BusConfig;
use crate::engine::TransferEngine;
use crate::error::{Error, Result};
use crate::registry::BusRegistry;

/// Handle a test keeps to script responses and inspect captured frames
/// after the engine has been boxed into a registry.
#[derive(Clone, Default)]
pub(crate) struct SharedState {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl SharedState {
    /// Queue a canned response for the next transfer
    pub(crate) fn push_response(&self, response: Vec<u8>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// All outbound frames captured so far
    pub(crate) fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }

    /// The most recent outbound frame
    pub(crate) fn last_frame(&self) -> Option<Vec<u8>> {
        self.frames.lock().unwrap().last().cloned()
    }
}

/// Mock engine that captures frames and replays queued responses.
///
/// With no queued response it echoes the outbound frame back, which
/// makes write-then-read loopback tests trivial.
pub(crate) struct MockEngine {
    shared: SharedState,
}

impl MockEngine {
    /// Fresh mock with its own (inaccessible) script state
    pub(crate) fn new() -> Self {
        MockEngine {
            shared: SharedState::default(),
        }
    }

    /// Build a registry around a fresh mock, returning the script handle
    pub(crate) fn registry() -> (BusRegistry, SharedState) {
        let shared = SharedState::default();
        let registry = BusRegistry::new(Box::new(MockEngine {
            shared: shared.clone(),
        }));
        (registry, shared)
    }
}

impl TransferEngine for MockEngine {
    fn claim(&mut self, _config: &BusConfig) -> Result<()> {
        Ok(())
    }

    fn release(&mut self, _cs: u8) -> Result<()> {
        Ok(())
    }

    fn transfer(&mut self, _cs: u8, out: &[u8]) -> Result<Vec<u8>> {
        self.shared.frames.lock().unwrap().push(out.to_vec());
        match self.shared.responses.lock().unwrap().pop_front() {
            Some(response) => Ok(response),
            None => Ok(out.to_vec()),
        }
    }
}

/// Engine whose claim always fails, for lifecycle error paths
pub(crate) struct FailingEngine;

impl TransferEngine for FailingEngine {
    fn claim(&mut self, config: &BusConfig) -> Result<()> {
        Err(Error::ResourceBusy(config.cs))
    }

    fn release(&mut self, cs: u8) -> Result<()> {
        Err(Error::NotOpen(cs))
    }

    fn transfer(&mut self, _cs: u8, _out: &[u8]) -> Result<Vec<u8>> {
        Err(Error::io(std::io::Error::other("engine unavailable")))
    }
}
