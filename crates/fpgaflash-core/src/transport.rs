//! Transport traits implemented by programmer backends
//!
//! The engine is single-threaded and fully synchronous: every exchange
//! blocks until the underlying bus completes it, and there is exactly one
//! logical actor driving the bus.

use std::time::Duration;

use crate::chip;
use crate::error::Result;

/// Largest single exchange the driver will ever ask for: opcode plus a
/// 3-byte address plus one page of data.
pub const MAX_TRANSFER: usize = 4 + chip::PAGE_SIZE;

/// A half-duplex SPI link to the flash chip
pub trait SpiTransport {
    /// Exchange `buf.len()` bytes with the chip in one full-duplex
    /// transaction.
    ///
    /// Loop-back buffer semantics: the chip's reply overwrites the request
    /// bytes in place, so callers read response bytes back out of the same
    /// buffer positions they sent zero padding in. A transfer either
    /// completes in full or fails; there are no partial transfers.
    fn transfer(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Largest buffer `transfer` accepts. At least [`MAX_TRANSFER`].
    fn max_transfer(&self) -> usize {
        MAX_TRANSFER
    }

    /// Pause between status-register polls.
    fn delay(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// The switch that connects the flash chip's SPI bus to the host
///
/// The FPGA loader leaves the flash pins connected to the FPGA, so the bus
/// has to be handed over once before the first flash command. There is no
/// corresponding disconnect.
pub trait BusSwitch {
    /// Hand the flash SPI bus over to the host controller.
    fn connect_flash(&mut self) -> Result<()>;
}
