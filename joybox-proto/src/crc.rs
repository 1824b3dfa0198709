//! CRC-8 checksum for diagnostic viewer frames.
//!
//! Uses the CRC-8/SMBUS algorithm with a 256-byte lookup table.

use ::crc::{Crc, CRC_8_SMBUS};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Calculate the CRC-8 checksum of a byte slice.
#[inline]
#[must_use]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// CRC-8 digest for checksumming a frame while it is being written.
pub struct Crc8Digest {
    digest: ::crc::Digest<'static, u8>,
}

impl Crc8Digest {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            digest: CRC8.digest(),
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    #[inline]
    #[must_use]
    pub fn finalize(self) -> u8 {
        self.digest.finalize()
    }
}

impl Default for Crc8Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty() {
        assert_eq!(calculate_crc8(&[]), 0x00);
    }

    #[test]
    fn test_crc8_check_value() {
        // CRC-8/SMBUS check value for "123456789"
        assert_eq!(calculate_crc8(b"123456789"), 0xF4);
    }

    #[test]
    fn test_digest_matches_batch() {
        let data = b"000001:0:-12";
        let mut digest = Crc8Digest::new();
        digest.update(&data[..5]);
        digest.update(&data[5..]);
        assert_eq!(digest.finalize(), calculate_crc8(data));
    }
}
