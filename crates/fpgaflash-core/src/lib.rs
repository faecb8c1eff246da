//! fpgaflash-core - flash programming engine for LOGI-Pi boards
//!
//! This crate locates the configuration payload inside an FPGA bitstream,
//! plans the sector erases and page writes that cover it, and drives the
//! SPI-NOR command sequence over a backend-provided transport.
//!
//! # Example
//!
//! ```ignore
//! use fpgaflash_core::{bitstream::Payload, driver, driver::NoProgress};
//! use fpgaflash_core::transport::SpiTransport;
//!
//! fn flash_bitstream<T: SpiTransport>(spi: &mut T, raw: &[u8]) {
//!     match Payload::from_bitstream(raw) {
//!         Ok(payload) => {
//!             driver::program(spi, payload.data(), &mut NoProgress)
//!                 .unwrap_or_else(|e| eprintln!("programming failed: {}", e));
//!         }
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bitstream;
pub mod chip;
pub mod driver;
pub mod error;
pub mod opcodes;
pub mod plan;
pub mod protocol;
pub mod transport;

pub use error::{Error, Result};
