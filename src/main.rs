//! fpgaflash - programs LOGI-Pi FPGA bitstreams into serial NOR flash
//!
//! The engine lives in `fpgaflash-core`; the LOGI-Pi spidev transport and
//! I2C bus switch live in `fpgaflash-logipi`. This binary wires them
//! together behind a small CLI.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match &cli.command {
        Commands::Program { bitstream } => commands::program::run(&cli, bitstream),
        Commands::Read { output, length } => commands::read::run(&cli, output, *length),
    };

    if let Err(e) = result {
        eprintln!("fpgaflash: {}", e);
        std::process::exit(1);
    }
}
