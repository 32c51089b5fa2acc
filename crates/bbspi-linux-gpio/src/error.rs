//! Error types for the Linux GPIO engine

use thiserror::Error;

/// Linux GPIO engine construction errors
///
/// Faults hit while driving an open bus are reported through the core
/// error type instead, so they flow back to register operations.
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// The gpiochip device could not be opened
    #[error("failed to open GPIO chip '{path}': {source}")]
    ChipOpenFailed {
        /// Device path that was tried
        path: String,
        /// Underlying gpiocdev error
        #[source]
        source: gpiocdev::Error,
    },
}
