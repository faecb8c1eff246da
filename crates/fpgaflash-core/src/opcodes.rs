//! SPI flash command opcodes
//!
//! The subset of the standard JEDEC command set the driver uses.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before every erase and page program
pub const WREN: u8 = 0x06;
/// Write Disable - clears the WEL bit in the status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Identification and status
// ============================================================================

/// Read JEDEC ID (manufacturer + device id)
pub const RDID: u8 = 0x9F;
/// Read Status Register 1
pub const RDSR: u8 = 0x05;

// ============================================================================
// Data commands - 3-byte address
// ============================================================================

/// Read Data
pub const READ: u8 = 0x03;
/// Page Program
pub const PP: u8 = 0x02;
/// Sector Erase 64KB
pub const SE: u8 = 0xD8;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status Register 1: Write In Progress / Busy
pub const SR1_WIP: u8 = 0x01;
/// Status Register 1: Write Enable Latch
pub const SR1_WEL: u8 = 0x02;
