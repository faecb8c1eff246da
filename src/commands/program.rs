//! Program command implementation

use std::path::Path;

use fpgaflash_core::bitstream::Payload;
use fpgaflash_core::driver;

use crate::cli::Cli;
use crate::commands::{open_transport, IndicatifProgress};

/// Run the program command.
pub fn run(cli: &Cli, bitstream: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read(bitstream)?;
    println!("Bitstream size: {} bytes", raw.len());

    // Locate the payload before touching any hardware so a bad file leaves
    // the flash untouched.
    let payload = Payload::from_bitstream(&raw)?;
    println!(
        "Sync word found at 0x{:X}, {} bytes to flash",
        payload.sync_offset(),
        payload.len()
    );

    let mut spi = open_transport(cli)?;

    let mut progress = IndicatifProgress::new();
    driver::program(&mut spi, payload.data(), &mut progress)?;

    println!("Done!");
    Ok(())
}
