//! CRC-32 checksum over payload bytes
//!
//! Standard CRC-32/ISO-HDLC, the same construction as zlib's `crc32`.
//! Computed over the unencoded payload on the transmit side and checked
//! against the frame header on the receive side.

use crc32fast::Hasher;

/// Compute the CRC-32 of a byte sequence.
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_value() {
        // zlib.crc32(b"123456789") == 0xCBF43926
        assert_eq!(crc32(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn test_crc32_deterministic() {
        assert_eq!(crc32(b"burstlink"), crc32(b"burstlink"));
    }

    #[test]
    fn test_crc32_distinct_for_corpus() {
        let corpus: &[&[u8]] = &[b"", b"a", b"b", b"ab", b"ba", b"hello", b"hellp"];
        let mut seen = std::collections::HashSet::new();
        for data in corpus {
            assert!(seen.insert(crc32(data)), "collision for {:?}", data);
        }
    }

    #[test]
    fn test_crc32_single_bit_flip_changes_checksum() {
        let data = b"payload under test".to_vec();
        let reference = crc32(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data.clone();
                corrupted[i] ^= 1 << bit;
                assert_ne!(crc32(&corrupted), reference);
            }
        }
    }
}
