//! Burstlink Frame - framing, FEC, and synchronization
//!
//! This crate implements the over-the-air frame layout of the link:
//! `PREAMBLE(64) | LENGTH(u32) | CRC32(u32) | FEC-encoded payload`,
//! together with the repetition/parity FEC rates and the preamble
//! correlation search used to locate a frame in a continuous bit stream.

pub mod crc;
pub mod error;
pub mod fec;
pub mod frame;
pub mod sync;

pub use error::{FrameError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        crc::crc32,
        error::{FrameError, Result},
        fec::CodeRate,
        frame::{decode_frame, encode_frame, preamble, MAX_PAYLOAD_LEN, PREAMBLE_LEN},
        sync::find_preamble,
    };
}
