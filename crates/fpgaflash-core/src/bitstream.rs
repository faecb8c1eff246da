//! Bitstream payload location
//!
//! Xilinx-style bitstream files carry vendor header bytes in front of the
//! configuration frame proper. The frame starts at a 4-byte sync word;
//! programming the header bytes would corrupt the chip's boot sequence, so
//! everything before the sync word is stripped before flashing.

use crate::chip;
use crate::error::{Error, Result};

/// The configuration-frame synchronization marker
pub const SYNC_WORD: [u8; 4] = [0xAA, 0x99, 0x55, 0x66];

/// Number of 0xFF padding bytes written in front of the configuration data
const PAD_LEN: usize = 16;

/// Find the first occurrence of the sync word in a bitstream.
pub fn find_sync_word(data: &[u8]) -> Option<usize> {
    data.windows(SYNC_WORD.len()).position(|w| w == SYNC_WORD)
}

/// The flashable image derived from a bitstream file
///
/// Owned by the programming driver for the duration of the run; it is only
/// ever read.
#[derive(Debug, Clone)]
pub struct Payload {
    data: Vec<u8>,
    sync_offset: usize,
}

impl Payload {
    /// Locate the configuration frame inside a raw bitstream and build the
    /// image that goes to flash: [`PAD_LEN`] bytes of `0xFF` followed by
    /// everything from the sync word to the end of the file.
    ///
    /// Fails with [`Error::FileTooLarge`] or [`Error::SyncWordNotFound`]
    /// before any hardware is touched.
    pub fn from_bitstream(bitstream: &[u8]) -> Result<Self> {
        if bitstream.len() > chip::TOTAL_SIZE {
            return Err(Error::FileTooLarge {
                len: bitstream.len(),
                capacity: chip::TOTAL_SIZE,
            });
        }

        let sync_offset = find_sync_word(bitstream).ok_or(Error::SyncWordNotFound)?;
        log::debug!("sync word found at 0x{:X}", sync_offset);

        let mut data = vec![0xFF; PAD_LEN];
        data.extend_from_slice(&bitstream[sync_offset..]);

        Ok(Self { data, sync_offset })
    }

    /// The bytes that go to flash, starting at address 0.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the flashable image in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the image is empty (never the case for a located payload).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset of the sync word in the original bitstream file.
    pub fn sync_offset(&self) -> usize {
        self.sync_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitstream(header_len: usize, body: &[u8]) -> Vec<u8> {
        let mut bit = vec![0x42u8; header_len];
        bit.extend_from_slice(&SYNC_WORD);
        bit.extend_from_slice(body);
        bit
    }

    #[test]
    fn payload_strips_header_and_prepends_pad() {
        let bit = bitstream(100, &[0xDE, 0xAD, 0xBE, 0xEF]);
        let payload = Payload::from_bitstream(&bit).unwrap();

        assert_eq!(payload.sync_offset(), 100);
        assert_eq!(payload.len(), 16 + 8);
        assert!(payload.data()[..16].iter().all(|&b| b == 0xFF));
        assert_eq!(&payload.data()[16..], &bit[100..]);
    }

    #[test]
    fn sync_word_at_start_of_file() {
        let bit = bitstream(0, &[1, 2, 3]);
        let payload = Payload::from_bitstream(&bit).unwrap();
        assert_eq!(payload.sync_offset(), 0);
        assert_eq!(&payload.data()[16..], &bit[..]);
    }

    #[test]
    fn missing_sync_word_is_rejected() {
        let bit = vec![0u8; 4096];
        assert_eq!(
            Payload::from_bitstream(&bit).unwrap_err(),
            Error::SyncWordNotFound
        );
    }

    #[test]
    fn file_shorter_than_sync_word_is_rejected() {
        assert_eq!(
            Payload::from_bitstream(&[0xAA, 0x99]).unwrap_err(),
            Error::SyncWordNotFound
        );
    }

    #[test]
    fn oversized_file_is_rejected_before_scanning() {
        let bit = vec![0u8; chip::TOTAL_SIZE + 1];
        assert_eq!(
            Payload::from_bitstream(&bit).unwrap_err(),
            Error::FileTooLarge {
                len: chip::TOTAL_SIZE + 1,
                capacity: chip::TOTAL_SIZE,
            }
        );
    }

    #[test]
    fn first_of_several_sync_words_wins() {
        let mut bit = bitstream(10, &[0u8; 4]);
        bit.extend_from_slice(&SYNC_WORD);
        let payload = Payload::from_bitstream(&bit).unwrap();
        assert_eq!(payload.sync_offset(), 10);
    }
}
