//! Forward error correction
//!
//! Simple repetition/parity schemes, one per nominal code rate. The
//! decoder is a lossy estimator for a low-error channel, not a trellis
//! decode: the repetition rates vote, the parity rates discard the
//! parity bit without correcting. That asymmetry is part of the wire
//! format and must not be "improved" unilaterally.

use crate::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nominal code rate, selected once at configuration time.
///
/// Each variant carries its own expansion factor and encode/decode
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeRate {
    /// 1/2: every bit transmitted twice
    #[serde(rename = "1/2")]
    Half,
    /// 1/3: every bit transmitted three times
    #[serde(rename = "1/3")]
    Third,
    /// 2/3: bit pairs followed by one parity bit
    #[serde(rename = "2/3")]
    TwoThirds,
    /// 3/4: bit triples followed by one parity bit
    #[serde(rename = "3/4")]
    ThreeQuarters,
}

impl CodeRate {
    /// All supported rates, in menu order.
    pub const ALL: [CodeRate; 4] = [
        CodeRate::Half,
        CodeRate::Third,
        CodeRate::TwoThirds,
        CodeRate::ThreeQuarters,
    ];

    /// Output/input bit ratio of the encoder.
    pub fn expansion(&self) -> f64 {
        match self {
            CodeRate::Half => 2.0,
            CodeRate::Third => 3.0,
            CodeRate::TwoThirds => 1.5,
            CodeRate::ThreeQuarters => 4.0 / 3.0,
        }
    }

    /// Number of encoded bits the receiver must slice from the stream
    /// to recover `data_bits` bits of payload.
    pub fn encoded_len(&self, data_bits: usize) -> usize {
        (data_bits as f64 * self.expansion()).ceil() as usize
    }

    /// Encode a bit sequence into its redundant form.
    pub fn encode(&self, bits: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len(bits.len()) + 4);
        match self {
            CodeRate::Half => {
                for &b in bits {
                    out.extend_from_slice(&[b, b]);
                }
            }
            CodeRate::Third => {
                for &b in bits {
                    out.extend_from_slice(&[b, b, b]);
                }
            }
            CodeRate::TwoThirds => {
                for pair in bits.chunks(2) {
                    match *pair {
                        [b0, b1] => out.extend_from_slice(&[b0, b1, b0 ^ b1]),
                        [b] => out.extend_from_slice(&[b, 0, b]),
                        _ => unreachable!(),
                    }
                }
            }
            CodeRate::ThreeQuarters => {
                for group in bits.chunks(3) {
                    if let [b0, b1, b2] = *group {
                        out.extend_from_slice(&[b0, b1, b2, b0 ^ b1]);
                    } else {
                        // trailing partial group, zero-padded to 4 output bits
                        out.extend_from_slice(group);
                        out.resize(out.len() + 4 - group.len(), 0);
                    }
                }
            }
        }
        out
    }

    /// Decode a received (possibly corrupted) bit sequence back into an
    /// estimate of the original bits.
    ///
    /// The estimate's length is derived from the input length; callers
    /// with an a-priori target length must truncate to it. A trailing
    /// partial group at the parity rates still yields its data bits, so
    /// a stream sliced to [`encoded_len`](Self::encoded_len) always
    /// decodes to at least the original bit count.
    pub fn decode(&self, received: &[u8]) -> Vec<u8> {
        if received.len() < 2 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(received.len());
        match self {
            CodeRate::Half => {
                for pair in received.chunks_exact(2) {
                    let sum: u8 = pair.iter().map(|&b| b & 1).sum();
                    out.push(u8::from(sum >= 1));
                }
            }
            CodeRate::Third => {
                for triple in received.chunks_exact(3) {
                    let sum: u8 = triple.iter().map(|&b| b & 1).sum();
                    out.push(u8::from(sum >= 2));
                }
            }
            CodeRate::TwoThirds => {
                for triple in received.chunks(3) {
                    out.extend_from_slice(&triple[..triple.len().min(2)]);
                }
            }
            CodeRate::ThreeQuarters => {
                for group in received.chunks(4) {
                    out.extend_from_slice(&group[..group.len().min(3)]);
                }
            }
        }
        out
    }
}

impl FromStr for CodeRate {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1/2" => Ok(CodeRate::Half),
            "1/3" => Ok(CodeRate::Third),
            "2/3" => Ok(CodeRate::TwoThirds),
            "3/4" => Ok(CodeRate::ThreeQuarters),
            _ => Err(FrameError::UnknownCodeRate {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CodeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodeRate::Half => "1/2",
            CodeRate::Third => "1/3",
            CodeRate::TwoThirds => "2/3",
            CodeRate::ThreeQuarters => "3/4",
        };
        f.write_str(s)
    }
}
