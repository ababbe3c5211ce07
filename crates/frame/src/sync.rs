//! Preamble synchronization
//!
//! Blind search for the frame start in a continuous bit stream: slide
//! the fixed 64-bit preamble across the received bits and keep the
//! offset with the highest Hamming similarity. The scan window is
//! capped to bound worst-case latency on long buffers, and a
//! near-perfect match exits early.

use crate::frame::{preamble, HEADER_LEN, PREAMBLE_LEN};

/// Hard cap on the number of offsets scanned per buffer.
pub const SCAN_LIMIT: usize = 30_000;

/// Bits that must remain past a candidate offset: preamble, header,
/// and a small margin of encoded payload.
const TAIL_RESERVE: usize = PREAMBLE_LEN + HEADER_LEN + 50;

/// Matches required before the scan exits early.
const EARLY_EXIT_MATCHES: usize = PREAMBLE_LEN - 2;

/// Minimum matches for an offset to be accepted at all.
const ACCEPT_MATCHES: usize = PREAMBLE_LEN - 6;

/// Locate the best preamble alignment in `bits`.
///
/// Returns the offset of the preamble's first bit, or `None` when no
/// offset matches in at least 58 of 64 positions. A weak or absent
/// preamble means "no frame here", not an error.
pub fn find_preamble(bits: &[u8]) -> Option<usize> {
    let pattern = preamble();
    let scan = bits.len().checked_sub(TAIL_RESERVE)?.min(SCAN_LIMIT);
    if scan == 0 {
        return None;
    }

    let mut best_pos = None;
    let mut best_matches = 0;
    for offset in 0..scan {
        let matches = bits[offset..offset + PREAMBLE_LEN]
            .iter()
            .zip(pattern.iter())
            .filter(|(a, b)| (**a & 1) == **b)
            .count();
        if matches > best_matches {
            best_matches = matches;
            best_pos = Some(offset);
            if best_matches >= EARLY_EXIT_MATCHES {
                break;
            }
        }
    }

    if best_matches >= ACCEPT_MATCHES {
        best_pos
    } else {
        None
    }
}
