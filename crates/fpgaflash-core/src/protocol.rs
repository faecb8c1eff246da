//! SPI-NOR command sequences
//!
//! Stateless request/response encoding over an [`SpiTransport`]. Each
//! operation is a single full-duplex exchange; the request goes out
//! zero-padded and the chip's reply is read back out of the same buffer
//! positions afterwards.
//!
//! A transport failure during any operation aborts the run; communication
//! faults are treated as unrecoverable and never retried.

use std::time::{Duration, Instant};

use crate::chip;
use crate::error::{Error, Result};
use crate::opcodes;
use crate::transport::SpiTransport;

/// Encode a 3-byte big-endian flash address after the opcode.
fn put_addr(buf: &mut [u8], addr: u32) {
    buf[1] = (addr >> 16) as u8;
    buf[2] = (addr >> 8) as u8;
    buf[3] = addr as u8;
}

/// Read the JEDEC manufacturer/device id triple.
pub fn read_jedec_id<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<[u8; 3]> {
    let mut buf = [0u8; 4];
    buf[0] = opcodes::RDID;
    spi.transfer(&mut buf)?;
    Ok([buf[1], buf[2], buf[3]])
}

/// Set the write-enable latch.
///
/// The chip clears the latch again after every erase and page program
/// completes, so this is sent before each one individually; it is not
/// "set once". Skipping it turns the following command into a silent no-op.
pub fn write_enable<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<()> {
    let mut buf = [opcodes::WREN];
    spi.transfer(&mut buf)
}

/// Erase the 64 KiB sector starting at `addr`.
///
/// Erase addresses are always sector-aligned, so only the most significant
/// address byte carries information.
pub fn sector_erase<T: SpiTransport + ?Sized>(spi: &mut T, addr: u32) -> Result<()> {
    let mut buf = [0u8; 4];
    buf[0] = opcodes::SE;
    put_addr(&mut buf, addr);
    spi.transfer(&mut buf)
}

/// Program up to one page of data at `addr`.
///
/// `data` must not cross a page boundary.
pub fn page_program<T: SpiTransport + ?Sized>(spi: &mut T, addr: u32, data: &[u8]) -> Result<()> {
    debug_assert!(data.len() <= chip::PAGE_SIZE);
    let mut buf = vec![0u8; 4 + data.len()];
    buf[0] = opcodes::PP;
    put_addr(&mut buf, addr);
    buf[4..].copy_from_slice(data);
    spi.transfer(&mut buf)
}

/// Read status register 1.
pub fn read_status<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<u8> {
    let mut buf = [opcodes::RDSR, 0];
    spi.transfer(&mut buf)?;
    Ok(buf[1])
}

/// Read `out.len()` bytes of flash starting at `addr`.
pub fn read_data<T: SpiTransport + ?Sized>(spi: &mut T, addr: u32, out: &mut [u8]) -> Result<()> {
    debug_assert!(4 + out.len() <= spi.max_transfer());
    let mut buf = vec![0u8; 4 + out.len()];
    buf[0] = opcodes::READ;
    put_addr(&mut buf, addr);
    spi.transfer(&mut buf)?;
    out.copy_from_slice(&buf[4..]);
    Ok(())
}

/// Poll the status register until the write-in-progress bit clears.
///
/// The deadline is fixed when the poll starts. A chip still busy past it
/// fails with [`Error::Timeout`] instead of blocking forever on stuck or
/// miswired hardware; a sector erase physically takes hundreds of
/// milliseconds, so the bound has to be generous.
pub fn wait_ready<T: SpiTransport + ?Sized>(
    spi: &mut T,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if read_status(spi)? & opcodes::SR1_WIP == 0 {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(Error::Timeout(timeout));
        }
        spi.delay(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Records every frame sent and plays back canned replies.
    struct ScriptedSpi {
        sent: Vec<Vec<u8>>,
        replies: VecDeque<Vec<u8>>,
    }

    impl ScriptedSpi {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                replies: VecDeque::new(),
            }
        }

        fn reply(mut self, frame: &[u8]) -> Self {
            self.replies.push_back(frame.to_vec());
            self
        }
    }

    impl SpiTransport for ScriptedSpi {
        fn transfer(&mut self, buf: &mut [u8]) -> Result<()> {
            self.sent.push(buf.to_vec());
            if let Some(reply) = self.replies.pop_front() {
                assert_eq!(reply.len(), buf.len(), "scripted reply length mismatch");
                buf.copy_from_slice(&reply);
            }
            Ok(())
        }

        fn delay(&mut self, _interval: Duration) {}
    }

    /// Reports write-in-progress forever.
    struct StuckBusy {
        polls: usize,
    }

    impl SpiTransport for StuckBusy {
        fn transfer(&mut self, buf: &mut [u8]) -> Result<()> {
            assert_eq!(buf[0], opcodes::RDSR);
            self.polls += 1;
            buf[1] = opcodes::SR1_WIP;
            Ok(())
        }

        fn delay(&mut self, _interval: Duration) {}
    }

    #[test]
    fn jedec_id_comes_from_reply_offsets_1_to_3() {
        let mut spi = ScriptedSpi::new().reply(&[0x00, 0x01, 0x02, 0x15]);
        assert_eq!(read_jedec_id(&mut spi).unwrap(), [0x01, 0x02, 0x15]);
        assert_eq!(spi.sent[0], vec![opcodes::RDID, 0, 0, 0]);
    }

    #[test]
    fn write_enable_is_the_opcode_alone() {
        let mut spi = ScriptedSpi::new();
        write_enable(&mut spi).unwrap();
        assert_eq!(spi.sent[0], vec![opcodes::WREN]);
    }

    #[test]
    fn sector_erase_encodes_a_big_endian_address() {
        let mut spi = ScriptedSpi::new();
        sector_erase(&mut spi, 0x03_0000).unwrap();
        assert_eq!(spi.sent[0], vec![opcodes::SE, 0x03, 0x00, 0x00]);
    }

    #[test]
    fn page_program_frame_is_header_plus_data() {
        let mut spi = ScriptedSpi::new();
        page_program(&mut spi, 0x01_0203, &[0xAA, 0xBB]).unwrap();
        assert_eq!(spi.sent[0], vec![opcodes::PP, 0x01, 0x02, 0x03, 0xAA, 0xBB]);
    }

    #[test]
    fn status_is_the_second_reply_byte() {
        let mut spi = ScriptedSpi::new().reply(&[0x00, 0x03]);
        assert_eq!(read_status(&mut spi).unwrap(), 0x03);
    }

    #[test]
    fn read_data_strips_the_header_from_the_reply() {
        let mut spi = ScriptedSpi::new().reply(&[0, 0, 0, 0, 0x11, 0x22, 0x33]);
        let mut out = [0u8; 3];
        read_data(&mut spi, 0x20, &mut out).unwrap();
        assert_eq!(out, [0x11, 0x22, 0x33]);
        assert_eq!(spi.sent[0][..4], [opcodes::READ, 0x00, 0x00, 0x20]);
    }

    #[test]
    fn wait_ready_returns_once_wip_clears() {
        let mut spi = ScriptedSpi::new()
            .reply(&[0x00, opcodes::SR1_WIP])
            .reply(&[0x00, opcodes::SR1_WIP])
            .reply(&[0x00, 0x00]);
        wait_ready(&mut spi, Duration::ZERO, Duration::from_secs(5)).unwrap();
        assert_eq!(spi.sent.len(), 3);
    }

    #[test]
    fn wait_ready_times_out_against_a_stuck_chip() {
        let mut spi = StuckBusy { polls: 0 };
        let timeout = Duration::from_millis(20);
        assert_eq!(
            wait_ready(&mut spi, Duration::ZERO, timeout).unwrap_err(),
            Error::Timeout(timeout)
        );
        assert!(spi.polls >= 1);
    }

    #[test]
    fn wait_ready_polls_at_least_once() {
        // Even with a zero timeout an already-idle chip reports ready.
        let mut spi = ScriptedSpi::new().reply(&[0x00, 0x00]);
        wait_ready(&mut spi, Duration::ZERO, Duration::ZERO).unwrap();
    }
}
