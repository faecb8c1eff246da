//! fpgaflash-logipi - LOGI-Pi board backend
//!
//! The flash chip on a LOGI-Pi board hangs off the Raspberry Pi's spidev
//! bus, but its pins are shared with the FPGA configuration interface. An
//! I2C GPIO expander switches the bus between the two; the FPGA loader
//! leaves it pointing at the FPGA, so the switch has to be thrown before
//! the first flash command.
//!
//! # Example
//!
//! ```no_run
//! use fpgaflash_logipi::{FlashMux, LogiSpi, LogiSpiConfig};
//! use fpgaflash_core::transport::BusSwitch;
//!
//! let mut mux = FlashMux::new("/dev/i2c-1");
//! mux.connect_flash()?;
//!
//! let mut spi = LogiSpi::open(&LogiSpiConfig::new("/dev/spidev0.0"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod mux;
pub mod spi;

pub use error::{LogiPiError, Result};
pub use mux::FlashMux;
pub use spi::{LogiSpi, LogiSpiConfig};
