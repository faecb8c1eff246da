//! Error types for fpgaflash-core
//!
//! Every error is fatal to the run: the driver surfaces the first one it
//! encounters and halts, leaving the flash chip in whatever partial state
//! the aborted phase reached. A failed run needs a full re-run from the
//! erase phase to get back to a known-good state.

use std::time::Duration;
use thiserror::Error;

/// Core error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Bitstream file does not fit in the flash chip
    #[error("bitstream is {len} bytes but the flash holds {capacity}")]
    FileTooLarge {
        /// Size of the bitstream file
        len: usize,
        /// Total flash capacity
        capacity: usize,
    },

    /// Sync word not present anywhere in the bitstream
    #[error("couldn't find sync word in bitstream")]
    SyncWordNotFound,

    /// The bus switch refused to hand the flash SPI bus to the host
    #[error("failed to connect the flash SPI bus to the host")]
    BusSwitchFailed,

    /// JEDEC id read back from the chip does not match the expected part
    #[error("flash chip is not responding: id {found:02X?}")]
    IdentificationMismatch {
        /// Manufacturer/device id bytes the chip answered with
        found: [u8; 3],
    },

    /// SPI exchange failed; communication faults are not retried
    #[error("error communicating with flash")]
    TransportFailure,

    /// Write-in-progress never cleared within the allowed time
    #[error("flash stayed busy for more than {0:?}")]
    Timeout(Duration),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
