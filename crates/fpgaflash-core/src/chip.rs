//! Parameters of the flash chip soldered to the board
//!
//! The geometry is fixed for the one chip family the board ships with; it
//! is not negotiated from the identification response. The id bytes are
//! only compared for equality before any erase or program is issued.

/// Total flash capacity in bytes (1 MiB)
pub const TOTAL_SIZE: usize = 1 << 20;

/// Erase sector size in bytes (64 KiB)
pub const SECTOR_SIZE: usize = 1 << 16;

/// Program page size in bytes
pub const PAGE_SIZE: usize = 1 << 8;

/// Expected JEDEC manufacturer/device id of the soldered chip
pub const JEDEC_ID: [u8; 3] = [0x01, 0x02, 0x15];
