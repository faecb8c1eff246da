//! Error types for the LOGI-Pi backend

use thiserror::Error;

/// LOGI-Pi backend specific errors
#[derive(Debug, Error)]
pub enum LogiPiError {
    /// Failed to open the spidev device
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set SPI mode
    #[error("can't set SPI mode {mode}: {source}")]
    SetModeFailed {
        mode: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set bits per word
    #[error("can't set {bits} bits per word: {source}")]
    SetBitsPerWordFailed {
        bits: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set the SPI clock speed
    #[error("can't set SPI speed to {speed} Hz: {source}")]
    SetSpeedFailed {
        speed: u32,
        #[source]
        source: std::io::Error,
    },

    /// SPI transfer failed
    #[error("SPI transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// Transfer larger than the transport allows
    #[error("transfer of {len} bytes exceeds the {max} byte limit")]
    TransferTooLarge { len: usize, max: usize },

    /// Failed to open the I2C device holding the bus switch
    #[error("failed to open {path}: {source}")]
    MuxOpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to address the bus-switch expander
    #[error("can't select I2C slave 0x{addr:02X}: {source}")]
    MuxSelectFailed {
        addr: u16,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the expander's data register failed
    #[error("bus switch I2C transfer failed: {0}")]
    MuxTransferFailed(#[source] std::io::Error),
}

/// Result type for LOGI-Pi backend operations
pub type Result<T> = std::result::Result<T, LogiPiError>;
