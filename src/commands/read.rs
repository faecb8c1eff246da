//! Read command implementation

use std::path::Path;

use fpgaflash_core::chip;
use fpgaflash_core::driver;

use crate::cli::Cli;
use crate::commands::{open_transport, IndicatifProgress};

/// Run the read command.
pub fn run(cli: &Cli, output: &Path, length: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let length = length.unwrap_or(chip::TOTAL_SIZE);
    if length == 0 || length > chip::TOTAL_SIZE {
        return Err(format!(
            "bad number of bytes: {} (flash holds {})",
            length,
            chip::TOTAL_SIZE
        )
        .into());
    }

    let mut spi = open_transport(cli)?;

    let mut progress = IndicatifProgress::new();
    let data = driver::read(&mut spi, length, &mut progress)?;

    std::fs::write(output, &data)?;
    println!("Wrote {} bytes to {}", data.len(), output.display());
    Ok(())
}
