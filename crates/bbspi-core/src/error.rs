//! Error types for bbspi-core

use thiserror::Error;

use crate::bus::{MAX_BAUD, MAX_USER_GPIO, MIN_BAUD};

/// Details about a failed bus transfer
#[derive(Debug, Error)]
pub enum TransferFailure {
    /// The engine returned a different number of bytes than were sent.
    ///
    /// The half-duplex register convention requires the response to match
    /// the request length exactly; no partial decode is attempted.
    #[error("engine returned {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Length of the outbound frame
        expected: usize,
        /// Length of the inbound frame actually returned
        actual: usize,
    },

    /// The underlying hardware driver reported an I/O fault
    #[error("bus I/O fault: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Pin is outside the user GPIO range, or pins are not distinct
    #[error("invalid GPIO pin {0} (user GPIO range is 0-{MAX_USER_GPIO})")]
    InvalidPin(u8),

    /// Baud rate is outside the supported bit-bang range
    #[error("invalid baud rate {0} (supported range is {MIN_BAUD}-{MAX_BAUD})")]
    InvalidBaud(u32),

    /// The pin is already claimed by an open bus
    #[error("GPIO pin {0} is already in use")]
    ResourceBusy(u8),

    /// No bus is open on the given chip select
    #[error("no bus open on chip select {0}")]
    NotOpen(u8),

    /// A transfer failed (length mismatch or underlying I/O fault)
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferFailure),

    /// The GPIO subsystem was initialized twice
    #[error("GPIO subsystem already initialized")]
    AlreadyInitialized,

    /// The GPIO subsystem is not initialized (or has been shut down)
    #[error("GPIO subsystem not initialized")]
    NotInitialized,
}

/// Result type alias using the core [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for wrapping a backend fault as a transfer error
    pub fn io(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Transfer(TransferFailure::Io(Box::new(source)))
    }
}
