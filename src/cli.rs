//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fpgaflash")]
#[command(author, version, about = "FPGA bitstream flash programmer for LOGI-Pi boards", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Spidev device connected to the flash chip
    #[arg(long, default_value = "/dev/spidev0.0", global = true)]
    pub device: String,

    /// SPI clock speed in kHz
    #[arg(long, default_value_t = 16_000, global = true)]
    pub speed_khz: u32,

    /// I2C device holding the bus-switch expander
    #[arg(long, default_value = "/dev/i2c-1", global = true)]
    pub i2c_dev: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Program a bitstream into the serial flash
    Program {
        /// Bitstream file (.bit)
        bitstream: PathBuf,
    },

    /// Read flash contents to a file
    Read {
        /// Output file path
        output: PathBuf,

        /// Number of bytes to read (defaults to the whole chip)
        #[arg(long)]
        length: Option<usize>,
    },
}
