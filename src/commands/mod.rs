//! Command implementations

pub mod program;
pub mod read;

mod progress;

use fpgaflash_core::transport::BusSwitch;
use fpgaflash_logipi::{FlashMux, LogiSpi, LogiSpiConfig};

use crate::cli::Cli;

pub(crate) use progress::IndicatifProgress;

/// Switch the flash bus over to the Pi and open the spidev transport.
pub(crate) fn open_transport(cli: &Cli) -> Result<LogiSpi, Box<dyn std::error::Error>> {
    let mut mux = FlashMux::new(&cli.i2c_dev);
    mux.connect_flash()?;

    let config = LogiSpiConfig::new(cli.device.as_str()).with_speed(cli.speed_khz * 1000);
    Ok(LogiSpi::open(&config)?)
}
