//! Erase and write planning
//!
//! NOR flash physics dictate the phase order: programming can only clear
//! bits, erasing sets a whole sector back to 0xFF. The erase plan therefore
//! has to cover every sector the write plan will touch.

use crate::chip;

/// Sector-aligned erase addresses covering `[0, payload_len + SECTOR_SIZE)`.
///
/// One sector past the payload's exact end is always included so the final
/// partial sector is erased as well.
pub fn erase_plan(payload_len: usize) -> impl Iterator<Item = u32> {
    (0..payload_len + chip::SECTOR_SIZE)
        .step_by(chip::SECTOR_SIZE)
        .map(|addr| addr as u32)
}

/// Number of sectors [`erase_plan`] will touch.
pub fn erase_sector_count(payload_len: usize) -> usize {
    (payload_len + chip::SECTOR_SIZE).div_ceil(chip::SECTOR_SIZE)
}

/// In-order `(address, chunk)` page writes covering the payload exactly.
///
/// Chunks are page-sized except for the final one, which may be short.
pub fn write_plan(payload: &[u8]) -> impl Iterator<Item = (u32, &[u8])> {
    payload
        .chunks(chip::PAGE_SIZE)
        .enumerate()
        .map(|(i, chunk)| ((i * chip::PAGE_SIZE) as u32, chunk))
}
