//! Payload resolution
//!
//! A payload is the byte sequence handed to the frame codec, together
//! with a display name and the kind of artifact it came from. Sources
//! that read files or decode audio implement [`PayloadSource`]; the
//! core never interprets audio semantics.

use crate::{Result, SessionError};
use serde::{Deserialize, Serialize};

/// Kind of artifact a payload represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Text,
    File,
    Wav,
}

/// One resolved payload, owned by the session for the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub data: Vec<u8>,
    pub name: String,
    pub kind: PayloadKind,
}

impl Payload {
    /// Payload from a UTF-8 message.
    pub fn text(message: &str) -> Self {
        Self {
            data: message.as_bytes().to_vec(),
            name: "text.txt".to_string(),
            kind: PayloadKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Supplies the payload for one session.
pub trait PayloadSource: Send {
    /// Resolve the bytes to transmit. A missing or unreadable payload
    /// is a configuration error, reported before any device call.
    fn resolve(&self) -> Result<Payload>;
}

impl PayloadSource for Box<dyn PayloadSource> {
    fn resolve(&self) -> Result<Payload> {
        (**self).resolve()
    }
}

/// A pre-resolved payload is its own source.
impl PayloadSource for Payload {
    fn resolve(&self) -> Result<Payload> {
        if self.is_empty() {
            return Err(SessionError::invalid_config("payload is empty"));
        }
        Ok(self.clone())
    }
}
