//! Frame assembly and parsing
//!
//! Over-the-air layout, MSB-first bits:
//! `PREAMBLE(64) | LENGTH(u32 BE) | CRC32(u32 BE) | ENCODED_PAYLOAD`.
//! LENGTH and CRC32 describe the payload *before* FEC encoding.

use crate::crc::crc32;
use crate::fec::CodeRate;
use burstlink_core::bits::{bits_to_bytes, bits_to_u32, bytes_to_bits, u32_to_bits};
use tracing::debug;

/// The 16-bit preamble word, repeated [`PREAMBLE_REPEATS`] times.
pub const PREAMBLE_WORD: [u8; 16] = [1, 0, 1, 1, 0, 1, 0, 0, 1, 1, 1, 0, 0, 1, 0, 1];

/// Number of preamble word repetitions per frame.
pub const PREAMBLE_REPEATS: usize = 4;

/// Total preamble length in bits.
pub const PREAMBLE_LEN: usize = 64;

/// Length (u32) plus CRC (u32) header bits following the preamble.
pub const HEADER_LEN: usize = 64;

/// Largest payload byte count accepted on decode.
pub const MAX_PAYLOAD_LEN: usize = 50_000_000;

/// The full 64-bit preamble pattern.
pub fn preamble() -> [u8; PREAMBLE_LEN] {
    let mut bits = [0u8; PREAMBLE_LEN];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = PREAMBLE_WORD[i % PREAMBLE_WORD.len()];
    }
    bits
}

/// Assemble the complete frame bit sequence for one payload.
pub fn encode_frame(payload: &[u8], rate: CodeRate) -> Vec<u8> {
    let length = payload.len() as u32;
    let crc = crc32(payload);
    let encoded = rate.encode(&bytes_to_bits(payload));

    let mut bits = Vec::with_capacity(PREAMBLE_LEN + HEADER_LEN + encoded.len());
    bits.extend_from_slice(&preamble());
    bits.extend_from_slice(&u32_to_bits(length));
    bits.extend_from_slice(&u32_to_bits(crc));
    let encoded_len = encoded.len();
    bits.extend(encoded);

    debug!(
        payload_bytes = payload.len(),
        encoded_bits = encoded_len,
        total_bits = bits.len(),
        rate = %rate,
        "frame assembled"
    );
    bits
}

/// Parse and validate one frame candidate.
///
/// `start` indexes the first bit *after* the preamble. One deterministic
/// attempt against one alignment: any validation miss returns `None`,
/// it never retries and never errors.
pub fn decode_frame(bits: &[u8], start: usize, rate: CodeRate) -> Option<Vec<u8>> {
    let header_end = start.checked_add(HEADER_LEN)?;
    if header_end > bits.len() {
        return None;
    }

    let length = bits_to_u32(&bits[start..start + 32]).ok()? as usize;
    if length == 0 || length > MAX_PAYLOAD_LEN {
        return None;
    }
    let crc = bits_to_u32(&bits[start + 32..header_end]).ok()?;

    let payload_bits_len = length * 8;
    let enc_len = rate.encoded_len(payload_bits_len);
    let enc_end = header_end.checked_add(enc_len)?;
    if enc_end > bits.len() {
        return None;
    }

    let mut decoded = rate.decode(&bits[header_end..enc_end]);
    if decoded.len() < payload_bits_len {
        return None;
    }
    decoded.truncate(payload_bits_len);

    let payload = bits_to_bytes(&decoded);
    if payload.len() != length || crc32(&payload) != crc {
        return None;
    }
    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_preamble_pattern() {
        let p = preamble();
        assert_eq!(p.len(), 64);
        assert_eq!(&p[..16], &PREAMBLE_WORD);
        assert_eq!(&p[48..], &PREAMBLE_WORD);
    }

    #[test]
    fn test_hello_round_trip_rate_half() {
        let bits = encode_frame(b"HELLO", CodeRate::Half);
        let decoded = decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).unwrap();
        assert_eq!(decoded, b"HELLO");
        assert_eq!(crc32(&decoded), crc32(b"HELLO"));
    }

    #[test]
    fn test_large_payload_rate_third() {
        let payload = vec![b'A'; 520];
        let bits = encode_frame(&payload, CodeRate::Third);
        assert_eq!(bits.len(), 64 + 32 + 32 + 520 * 8 * 3);
        assert_eq!(
            decode_frame(&bits, PREAMBLE_LEN, CodeRate::Third).unwrap(),
            payload
        );
    }

    #[test]
    fn test_round_trip_all_rates() {
        // lengths chosen to exercise group-aligned and trailing cases
        for len in [1usize, 2, 3, 5, 64, 251] {
            let payload: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
            for rate in CodeRate::ALL {
                let bits = encode_frame(&payload, rate);
                let decoded = decode_frame(&bits, PREAMBLE_LEN, rate);
                assert_eq!(decoded.as_deref(), Some(&payload[..]), "rate {}", rate);
            }
        }
    }

    fn frame_with_header(length: u32, crc: u32, encoded: &[u8]) -> Vec<u8> {
        let mut bits = preamble().to_vec();
        bits.extend_from_slice(&u32_to_bits(length));
        bits.extend_from_slice(&u32_to_bits(crc));
        bits.extend_from_slice(encoded);
        bits
    }

    #[test]
    fn test_rejects_zero_length() {
        let bits = frame_with_header(0, crc32(&[]), &[0; 64]);
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).is_none());
    }

    #[test]
    fn test_rejects_oversize_length() {
        let bits = frame_with_header(50_000_001, 0, &[0; 64]);
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).is_none());
    }

    #[test]
    fn test_rejects_truncated_encoded_region() {
        let mut bits = encode_frame(b"HELLO", CodeRate::Half);
        bits.truncate(bits.len() - 1);
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).is_none());
    }

    #[test]
    fn test_rejects_truncated_header() {
        let bits = preamble()[..].to_vec();
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).is_none());
    }

    #[test]
    fn test_rejects_crc_mismatch() {
        let payload = b"HELLO";
        let encoded = CodeRate::Half.encode(&bytes_to_bits(payload));
        let bits = frame_with_header(payload.len() as u32, crc32(payload) ^ 1, &encoded);
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::Half).is_none());
    }

    #[test]
    fn test_rejects_corrupted_payload() {
        let mut bits = encode_frame(b"HELLO WORLD", CodeRate::TwoThirds);
        // 2/3 has no correction capability, so one data-bit flip must
        // surface as a CRC failure
        let flip = PREAMBLE_LEN + HEADER_LEN;
        bits[flip] ^= 1;
        assert!(decode_frame(&bits, PREAMBLE_LEN, CodeRate::TwoThirds).is_none());
    }

    #[test]
    fn test_repetition_rate_survives_single_repeat_errors() {
        let mut bits = encode_frame(b"HELLO", CodeRate::Third);
        // flip one of the three repeats of a payload bit
        bits[PREAMBLE_LEN + HEADER_LEN + 1] ^= 1;
        assert_eq!(
            decode_frame(&bits, PREAMBLE_LEN, CodeRate::Third).unwrap(),
            b"HELLO"
        );
    }

    #[quickcheck]
    fn prop_frame_round_trip(payload: Vec<u8>) -> bool {
        if payload.is_empty() || payload.len() > 4096 {
            return true;
        }
        CodeRate::ALL.iter().all(|&rate| {
            decode_frame(&encode_frame(&payload, rate), PREAMBLE_LEN, rate).as_deref()
                == Some(&payload[..])
        })
    }
}
