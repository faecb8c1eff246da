//! fpgaflash-dummy - In-memory flash emulator for testing
//!
//! Emulates the board's flash chip behind the [`SpiTransport`] trait so the
//! engine can be exercised without hardware. The emulator models the
//! details the driver depends on: loop-back reply semantics, the
//! write-enable latch auto-clearing after every erase and program, NOR
//! program semantics (bits can only be cleared), and a write-in-progress
//! period after each erase/program.

use std::time::Duration;

use fpgaflash_core::chip;
use fpgaflash_core::error::{Error, Result};
use fpgaflash_core::opcodes;
use fpgaflash_core::transport::{BusSwitch, SpiTransport};

/// Configuration for the emulated chip
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// JEDEC id the chip answers identification with
    pub jedec_id: [u8; 3],
    /// Number of status polls that report busy after each erase/program
    pub busy_polls: u32,
    /// Never clear WIP; exercises poll timeouts
    pub stuck_busy: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            jedec_id: chip::JEDEC_ID,
            busy_polls: 2,
            stuck_busy: false,
        }
    }
}

/// In-memory flash chip
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    write_enabled: bool,
    busy: u32,
    transfers: usize,
    bus_connected: bool,
}

impl DummyFlash {
    /// Create an emulated chip with the given configuration, fully erased.
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            data: vec![0xFF; chip::TOTAL_SIZE],
            write_enabled: false,
            busy: 0,
            transfers: 0,
            bus_connected: false,
        }
    }

    /// Create an emulated chip with the expected id and default timings.
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// The emulated flash array.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the flash array, for seeding test contents.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Total number of SPI exchanges performed.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Whether the bus switch hand-over has happened.
    pub fn bus_connected(&self) -> bool {
        self.bus_connected
    }

    fn frame_addr(buf: &[u8]) -> usize {
        ((buf[1] as usize) << 16) | ((buf[2] as usize) << 8) | buf[3] as usize
    }

    fn poll_status(&mut self) -> u8 {
        if self.config.stuck_busy {
            return opcodes::SR1_WIP;
        }
        if self.busy > 0 {
            self.busy -= 1;
            return opcodes::SR1_WIP;
        }
        if self.write_enabled {
            opcodes::SR1_WEL
        } else {
            0
        }
    }

    fn sector_erase(&mut self, addr: usize) -> Result<()> {
        // A real chip drops erase/program commands when WEL is not set.
        if !self.write_enabled {
            return Ok(());
        }
        let start = addr & !(chip::SECTOR_SIZE - 1);
        if start + chip::SECTOR_SIZE > self.data.len() {
            return Err(Error::TransportFailure);
        }
        self.data[start..start + chip::SECTOR_SIZE].fill(0xFF);
        self.write_enabled = false;
        self.busy = self.config.busy_polls;
        Ok(())
    }

    fn page_program(&mut self, addr: usize, data_start: usize, buf: &[u8]) -> Result<()> {
        if !self.write_enabled {
            return Ok(());
        }
        let len = buf.len() - data_start;
        if addr + len > self.data.len() || len > chip::PAGE_SIZE {
            return Err(Error::TransportFailure);
        }
        // NOR programming can only clear bits
        for i in 0..len {
            self.data[addr + i] &= buf[data_start + i];
        }
        self.write_enabled = false;
        self.busy = self.config.busy_polls;
        Ok(())
    }

    fn read(&mut self, addr: usize, buf: &mut [u8]) -> Result<()> {
        let len = buf.len() - 4;
        if addr + len > self.data.len() {
            return Err(Error::TransportFailure);
        }
        buf[4..].copy_from_slice(&self.data[addr..addr + len]);
        Ok(())
    }
}

impl SpiTransport for DummyFlash {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<()> {
        self.transfers += 1;
        if buf.is_empty() {
            return Err(Error::TransportFailure);
        }

        match buf[0] {
            opcodes::RDID => {
                if buf.len() >= 4 {
                    buf[1..4].copy_from_slice(&self.config.jedec_id);
                }
                Ok(())
            }
            opcodes::RDSR => {
                let status = self.poll_status();
                if buf.len() >= 2 {
                    buf[1] = status;
                }
                Ok(())
            }
            opcodes::WREN => {
                self.write_enabled = true;
                Ok(())
            }
            opcodes::WRDI => {
                self.write_enabled = false;
                Ok(())
            }
            opcodes::SE if buf.len() >= 4 => {
                let addr = Self::frame_addr(buf);
                self.sector_erase(addr)
            }
            opcodes::PP if buf.len() >= 4 => {
                let addr = Self::frame_addr(buf);
                self.page_program(addr, 4, buf)
            }
            opcodes::READ if buf.len() >= 4 => {
                let addr = Self::frame_addr(buf);
                self.read(addr, buf)
            }
            _ => Err(Error::TransportFailure),
        }
    }

    fn delay(&mut self, _interval: Duration) {
        // in-memory, nothing to wait for
    }
}

impl BusSwitch for DummyFlash {
    fn connect_flash(&mut self) -> Result<()> {
        self.bus_connected = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpgaflash_core::protocol;

    #[test]
    fn answers_identification() {
        let mut flash = DummyFlash::new_default();
        assert_eq!(protocol::read_jedec_id(&mut flash).unwrap(), chip::JEDEC_ID);
    }

    #[test]
    fn program_and_read_back() {
        let mut flash = DummyFlash::new_default();
        let data = [0x12, 0x34, 0x56, 0x78];

        protocol::write_enable(&mut flash).unwrap();
        protocol::page_program(&mut flash, 0x1000, &data).unwrap();

        let mut buf = [0u8; 4];
        protocol::read_data(&mut flash, 0x1000, &mut buf).unwrap();
        assert_eq!(buf, data);
    }

    #[test]
    fn program_without_write_enable_is_a_no_op() {
        let mut flash = DummyFlash::new_default();
        protocol::page_program(&mut flash, 0, &[0x00; 16]).unwrap();
        assert!(flash.data()[..16].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn write_enable_latch_clears_after_program() {
        let mut flash = DummyFlash::new_default();
        protocol::write_enable(&mut flash).unwrap();
        protocol::page_program(&mut flash, 0, &[0x00; 4]).unwrap();
        // second program without a fresh WREN must not stick
        protocol::page_program(&mut flash, 0x100, &[0x00; 4]).unwrap();

        assert!(flash.data()[..4].iter().all(|&b| b == 0x00));
        assert!(flash.data()[0x100..0x104].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn erase_resets_the_sector_to_ff() {
        let mut flash = DummyFlash::new_default();
        protocol::write_enable(&mut flash).unwrap();
        protocol::page_program(&mut flash, 0, &[0x00; 256]).unwrap();

        protocol::write_enable(&mut flash).unwrap();
        protocol::sector_erase(&mut flash, 0).unwrap();

        assert!(flash.data()[..chip::SECTOR_SIZE].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn busy_period_is_reported_then_clears() {
        let mut flash = DummyFlash::new(DummyConfig {
            busy_polls: 3,
            ..DummyConfig::default()
        });
        protocol::write_enable(&mut flash).unwrap();
        protocol::sector_erase(&mut flash, 0).unwrap();

        for _ in 0..3 {
            assert_ne!(protocol::read_status(&mut flash).unwrap() & opcodes::SR1_WIP, 0);
        }
        assert_eq!(protocol::read_status(&mut flash).unwrap() & opcodes::SR1_WIP, 0);
    }

    #[test]
    fn stuck_chip_trips_the_poll_timeout() {
        let mut flash = DummyFlash::new(DummyConfig {
            stuck_busy: true,
            ..DummyConfig::default()
        });
        let timeout = Duration::from_millis(20);
        let err = protocol::wait_ready(&mut flash, Duration::ZERO, timeout).unwrap_err();
        assert_eq!(err, Error::Timeout(timeout));

        // nothing but status polls were issued while waiting
        assert!(flash.data().iter().all(|&b| b == 0xFF));
    }
}
