//! Session observer callbacks
//!
//! The presentation layer (UI, console, tests) watches a session
//! through this trait. Callbacks are invoked from the session worker;
//! implementations must be cheap or hand off to their own thread.

use crate::payload::Payload;
use crate::session::FailureReason;
use crate::state::StatsSnapshot;

/// Log severity, mirrored by the presentation layer's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Receives progress and outcome reports for one session.
pub trait SessionObserver: Send + Sync {
    fn on_log(&self, _message: &str, _severity: Severity) {}

    fn on_stats(&self, _stats: &StatsSnapshot) {}

    fn on_decoded(&self, _payload: &Payload) {}

    fn on_failed(&self, _reason: &FailureReason) {}
}

/// Observer that discards every report.
pub struct NullObserver;

impl SessionObserver for NullObserver {}
