//! The programming driver
//!
//! Strictly sequential: identify the chip, erase every sector the payload
//! touches, then write it page by page. The run aborts on the first failure
//! of any step and leaves the flash in whatever partial state the failing
//! phase reached (erased-but-not-written sectors, or a partially programmed
//! page). There is no rollback; a failed run is repaired by running again.

use std::time::Duration;

use crate::chip;
use crate::error::{Error, Result};
use crate::plan;
use crate::protocol;
use crate::transport::SpiTransport;

/// Upper bound on any single erase or page program.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// A 64 KiB sector erase typically takes hundreds of milliseconds.
const ERASE_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// A page program typically completes within a few milliseconds.
const PROGRAM_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Progress callbacks for long-running flash operations
///
/// Implemented by the CLI to drive progress bars; use [`NoProgress`] when
/// nothing should be reported.
pub trait ProgressReport {
    /// Called when the erase phase starts
    fn erasing(&mut self, sectors: usize);

    /// Called after each sector has been erased
    fn sector_erased(&mut self, sectors_done: usize);

    /// Called when the program phase starts
    fn writing(&mut self, total_bytes: usize);

    /// Called after each page has been programmed
    fn bytes_written(&mut self, bytes_done: usize);

    /// Called when a readback starts
    fn reading(&mut self, total_bytes: usize);

    /// Called as readback proceeds
    fn bytes_read(&mut self, bytes_done: usize);

    /// Called when the whole operation has completed
    fn complete(&mut self);
}

/// A no-op progress reporter
pub struct NoProgress;

impl ProgressReport for NoProgress {
    fn erasing(&mut self, _sectors: usize) {}
    fn sector_erased(&mut self, _sectors_done: usize) {}
    fn writing(&mut self, _total_bytes: usize) {}
    fn bytes_written(&mut self, _bytes_done: usize) {}
    fn reading(&mut self, _total_bytes: usize) {}
    fn bytes_read(&mut self, _bytes_done: usize) {}
    fn complete(&mut self) {}
}

/// Check that the expected flash chip answers on the bus.
///
/// Runs before anything destructive; a mismatch aborts with zero erase or
/// program commands issued.
pub fn identify<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<()> {
    let id = protocol::read_jedec_id(spi)?;
    if id != chip::JEDEC_ID {
        return Err(Error::IdentificationMismatch { found: id });
    }
    log::debug!("flash id {:02X} {:02X} {:02X}", id[0], id[1], id[2]);
    Ok(())
}

/// Program `payload` into flash starting at address 0.
///
/// Erase comes first because programming can only clear bits. The erase
/// plan covers one sector past the payload's end; the write plan covers the
/// payload exactly. Neither phase is conditional on the flash's current
/// contents, so re-running on identical input succeeds identically.
pub fn program<T, P>(spi: &mut T, payload: &[u8], progress: &mut P) -> Result<()>
where
    T: SpiTransport + ?Sized,
    P: ProgressReport,
{
    identify(spi)?;

    let sectors = plan::erase_sector_count(payload.len());
    log::info!("erasing {} sectors", sectors);
    progress.erasing(sectors);
    for (n, addr) in plan::erase_plan(payload.len()).enumerate() {
        erase_sector(spi, addr).map_err(|e| {
            log::error!("erase failed at sector 0x{:06X}: {}", addr, e);
            e
        })?;
        progress.sector_erased(n + 1);
    }

    log::info!("writing {} bytes", payload.len());
    progress.writing(payload.len());
    let mut written = 0;
    for (addr, chunk) in plan::write_plan(payload) {
        program_page(spi, addr, chunk).map_err(|e| {
            log::error!("program failed at page 0x{:06X}: {}", addr, e);
            e
        })?;
        written += chunk.len();
        progress.bytes_written(written);
    }

    progress.complete();
    Ok(())
}

/// Read `len` bytes of flash starting at address 0.
///
/// Reads run a whole page at a time; the result is truncated to `len`.
pub fn read<T, P>(spi: &mut T, len: usize, progress: &mut P) -> Result<Vec<u8>>
where
    T: SpiTransport + ?Sized,
    P: ProgressReport,
{
    identify(spi)?;

    progress.reading(len);
    let mut data = Vec::with_capacity(len + chip::PAGE_SIZE);
    let mut page = [0u8; chip::PAGE_SIZE];
    let mut addr = 0u32;
    while data.len() < len {
        protocol::read_data(spi, addr, &mut page).map_err(|e| {
            log::error!("read failed at page 0x{:06X}: {}", addr, e);
            e
        })?;
        data.extend_from_slice(&page);
        addr += chip::PAGE_SIZE as u32;
        progress.bytes_read(data.len().min(len));
    }
    data.truncate(len);

    progress.complete();
    Ok(data)
}

/// One erase step: write-enable, erase, wait for WIP to clear.
fn erase_sector<T: SpiTransport + ?Sized>(spi: &mut T, addr: u32) -> Result<()> {
    protocol::write_enable(spi)?;
    protocol::sector_erase(spi, addr)?;
    protocol::wait_ready(spi, ERASE_POLL_INTERVAL, COMMAND_TIMEOUT)
}

/// One program step: write-enable, program, wait for WIP to clear.
fn program_page<T: SpiTransport + ?Sized>(spi: &mut T, addr: u32, data: &[u8]) -> Result<()> {
    protocol::write_enable(spi)?;
    protocol::page_program(spi, addr, data)?;
    protocol::wait_ready(spi, PROGRAM_POLL_INTERVAL, COMMAND_TIMEOUT)
}
