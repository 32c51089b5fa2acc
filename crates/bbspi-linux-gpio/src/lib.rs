//! bbspi-linux-gpio - Linux GPIO bit-bang transfer engine
//!
//! Implements the `bbspi-core` [`TransferEngine`](bbspi_core::TransferEngine)
//! trait on top of the Linux GPIO character device interface (gpiocdev).
//! Any four GPIO lines on a gpiochip can form a logical SPI bus; no
//! hardware SPI controller is involved.
//!
//! # Example
//!
//! ```no_run
//! use bbspi_core::{BusConfig, BusRegistry};
//! use bbspi_linux_gpio::LinuxGpioEngine;
//!
//! let engine = LinuxGpioEngine::new("/dev/gpiochip0")?;
//! let registry = BusRegistry::new(Box::new(engine));
//! registry.open(BusConfig::new(26, 20, 21, 16).with_baud(115_200))?;
//! let id = registry.read8(26, 0x00)?;
//! registry.close(26)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support
//! - Access to `/dev/gpiochipN` (may require root or udev rules)
//!
//! Known working on Raspberry Pi (gpiochip0 line offsets match BCM pin
//! numbers) and BeagleBone.

pub mod device;
pub mod error;

pub use device::LinuxGpioEngine;
pub use error::LinuxGpioError;
