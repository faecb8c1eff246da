//! I2C bus switch
//!
//! A GPIO expander at I2C address 0x20 routes the flash chip's SPI pins
//! either to the FPGA configuration interface or to the Pi. Setting the OE
//! bit in its data register hands the bus to the Pi. The hand-over happens
//! once per run, before the first flash command; nothing switches it back.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use fpgaflash_core::error::{Error as CoreError, Result as CoreResult};
use fpgaflash_core::transport::BusSwitch;

use crate::error::{LogiPiError, Result};

/// I2C address of the bus-switch expander
pub const MUX_I2C_ADDR: u16 = 0x20;

/// Expander data register
const DATA_REG: u8 = 0x00;

/// OE bit that routes the flash SPI pins to the Pi
const SPI_OE_BIT: u8 = 0x10;

/// ioctl that binds an i2c-dev fd to a slave address
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// The board's flash bus switch
pub struct FlashMux {
    path: PathBuf,
}

impl FlashMux {
    /// Address the switch through the given i2c-dev device.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| LogiPiError::MuxOpenFailed {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let ret = unsafe { libc::ioctl(file.as_raw_fd(), I2C_SLAVE, MUX_I2C_ADDR as libc::c_ulong) };
        if ret < 0 {
            return Err(LogiPiError::MuxSelectFailed {
                addr: MUX_I2C_ADDR,
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(file)
    }

    /// Read-modify-write the expander's data register to set the OE bit.
    fn connect(&self) -> Result<()> {
        let mut file = self.open()?;

        file.write_all(&[DATA_REG])
            .map_err(LogiPiError::MuxTransferFailed)?;
        let mut value = [0u8; 1];
        file.read_exact(&mut value)
            .map_err(LogiPiError::MuxTransferFailed)?;

        file.write_all(&[DATA_REG, value[0] | SPI_OE_BIT])
            .map_err(LogiPiError::MuxTransferFailed)?;

        log::debug!(
            "flash bus switched to host (expander data register 0x{:02X})",
            value[0] | SPI_OE_BIT
        );
        Ok(())
    }
}

impl BusSwitch for FlashMux {
    fn connect_flash(&mut self) -> CoreResult<()> {
        self.connect().map_err(|e| {
            log::error!("{}", e);
            CoreError::BusSwitchFailed
        })
    }
}
