//! Linux spidev transport
//!
//! Implements [`SpiTransport`] over `/dev/spidevX.Y`. Exchanges use a
//! single `SPI_IOC_MESSAGE(1)` transaction whose tx and rx buffers alias
//! the same memory, which gives exactly the loop-back semantics the engine
//! expects: the chip's reply lands on top of the request bytes.

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

use fpgaflash_core::error::{Error as CoreError, Result as CoreResult};
use fpgaflash_core::transport::{SpiTransport, MAX_TRANSFER};

use crate::error::{LogiPiError, Result};

/// Default spidev device on the Pi header
pub const DEFAULT_DEVICE: &str = "/dev/spidev0.0";

/// Default SPI clock speed in Hz.
///
/// The flash chip is rated to 50 MHz but the shared bus is only stable up
/// to about 16 MHz on this board.
pub const DEFAULT_SPEED_HZ: u32 = 16_000_000;

/// Linux spidev ioctl numbers
mod ioctl {
    use nix::ioctl_write_ptr;

    const SPI_IOC_MAGIC: u8 = b'k';
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    /// Size of the kernel's struct spi_ioc_transfer
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// Ioctl number for SPI_IOC_MESSAGE(n), i.e.
    /// `_IOW(SPI_IOC_MAGIC, 0, char[n * sizeof(struct spi_ioc_transfer)])`.
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// Must match the kernel's struct spi_ioc_transfer layout
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    _pad: u8,
}

/// Configuration for opening the spidev transport
#[derive(Debug, Clone)]
pub struct LogiSpiConfig {
    /// Device path (e.g. "/dev/spidev0.0")
    pub device: String,
    /// SPI clock speed in Hz
    pub speed_hz: u32,
    /// SPI mode (0-3)
    pub mode: u8,
}

impl LogiSpiConfig {
    /// Create a configuration for the given device with default settings.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            speed_hz: DEFAULT_SPEED_HZ,
            mode: 0,
        }
    }

    /// Set the SPI clock speed in Hz.
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }
}

/// Spidev-backed SPI transport to the flash chip
pub struct LogiSpi {
    file: File,
    speed_hz: u32,
}

impl LogiSpi {
    /// Open and configure the spidev device.
    pub fn open(config: &LogiSpiConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LogiPiError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        let mode = config.mode;
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LogiPiError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LogiPiError::SetBitsPerWordFailed {
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let speed = config.speed_hz;
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| LogiPiError::SetSpeedFailed {
                speed,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        log::info!(
            "opened {} (mode={}, speed={} kHz)",
            config.device,
            mode,
            speed / 1000
        );

        Ok(Self {
            file,
            speed_hz: speed,
        })
    }

    /// One full-duplex exchange, reply overwriting the request in place.
    fn transfer_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() > MAX_TRANSFER {
            return Err(LogiPiError::TransferTooLarge {
                len: buf.len(),
                max: MAX_TRANSFER,
            });
        }

        let transfer = SpiIocTransfer {
            tx_buf: buf.as_ptr() as u64,
            rx_buf: buf.as_mut_ptr() as u64,
            len: buf.len() as u32,
            speed_hz: self.speed_hz,
            bits_per_word: 8,
            ..Default::default()
        };

        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                ioctl::spi_ioc_message(1),
                &transfer as *const SpiIocTransfer,
            )
        };
        if ret < 1 {
            return Err(LogiPiError::TransferFailed(std::io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl SpiTransport for LogiSpi {
    fn transfer(&mut self, buf: &mut [u8]) -> CoreResult<()> {
        self.transfer_in_place(buf).map_err(|e| {
            log::error!("{}", e);
            CoreError::TransportFailure
        })
    }
}
