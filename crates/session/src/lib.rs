//! Burstlink Session - one-shot transmit/receive cycle controller
//!
//! Drives a single link session against an abstract radio device:
//! configure, build one frame, arm cyclic transmit, then blind-search
//! the receive stream until a valid frame decodes or the read budget
//! runs out. The protocol core stays pure; this crate owns the state
//! machine, the worker thread, and the observer reporting.

pub mod config;
pub mod device;
pub mod error;
pub mod observer;
pub mod payload;
pub mod session;
pub mod state;

pub use error::{Result, SessionError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        config::SessionConfig,
        device::{DeviceError, RadioConfig, RadioDevice},
        error::{Result, SessionError},
        observer::{NullObserver, SessionObserver, Severity},
        payload::{Payload, PayloadKind, PayloadSource},
        session::{FailureReason, Session, SessionHandle, SessionOutcome},
        state::{SessionPhase, StatsSnapshot},
    };
}
