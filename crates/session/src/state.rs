//! Session run-time state
//!
//! Counters and SNR history for one session. Mutated only by the
//! session worker; everyone else sees cloned snapshots, so no reader
//! ever observes a half-updated record.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Bounded SNR history length; the oldest estimate is evicted first.
pub const SNR_HISTORY_CAPACITY: usize = 100;

/// Lifecycle of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Configured,
    Transmitting,
    Listening,
    Decoded,
    Failed,
    Stopped,
}

/// Mutable per-session counters, owned by the worker.
#[derive(Debug, Default)]
pub struct SessionStats {
    pub frames_transmitted: u64,
    pub reads: u64,
    pub decodes: u64,
    pub rx_buffer_size: usize,
    pub frame_samples: usize,
    snr_history: VecDeque<f64>,
}

impl SessionStats {
    /// Reset everything; called on each `Configured` entry so nothing
    /// leaks from a previous session.
    pub fn reset(&mut self) {
        *self = SessionStats::default();
    }

    pub fn push_snr(&mut self, snr_db: f64) {
        if self.snr_history.len() == SNR_HISTORY_CAPACITY {
            self.snr_history.pop_front();
        }
        self.snr_history.push_back(snr_db);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let success_rate = if self.reads > 0 {
            self.decodes as f64 / self.reads as f64 * 100.0
        } else {
            0.0
        };
        StatsSnapshot {
            snr_db: self.snr_history.back().copied().unwrap_or(0.0),
            reads: self.reads,
            decodes: self.decodes,
            frames_transmitted: self.frames_transmitted,
            success_rate,
            rx_buffer_size: self.rx_buffer_size,
            frame_samples: self.frame_samples,
            snr_history: self.snr_history.iter().copied().collect(),
        }
    }
}

/// Immutable view of the session counters at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Most recent SNR estimate in dB (0.0 before the first read)
    pub snr_db: f64,
    pub reads: u64,
    pub decodes: u64,
    pub frames_transmitted: u64,
    /// Decodes per read, in percent
    pub success_rate: f64,
    pub rx_buffer_size: usize,
    pub frame_samples: usize,
    pub snr_history: Vec<f64>,
}

/// State shared between the session worker and its handle: the
/// cooperative running flag and the stats record.
#[derive(Debug, Default)]
pub struct SharedState {
    running: AtomicBool,
    stats: Mutex<SessionStats>,
}

impl SharedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request cooperative cancellation; observed between reads.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.with_stats(|stats| stats.snapshot())
    }

    pub(crate) fn with_stats<R>(&self, f: impl FnOnce(&mut SessionStats) -> R) -> R {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snr_history_evicts_oldest() {
        let mut stats = SessionStats::default();
        for i in 0..150 {
            stats.push_snr(i as f64);
        }
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.snr_history.len(), SNR_HISTORY_CAPACITY);
        assert_eq!(snapshot.snr_history[0], 50.0);
        assert_eq!(snapshot.snr_db, 149.0);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.snapshot().success_rate, 0.0);
        stats.reads = 4;
        stats.decodes = 1;
        assert_eq!(stats.snapshot().success_rate, 25.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = SessionStats::default();
        stats.reads = 9;
        stats.push_snr(3.0);
        stats.reset();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.reads, 0);
        assert!(snapshot.snr_history.is_empty());
    }

    #[test]
    fn test_shared_state_stop_flag() {
        let shared = SharedState::new();
        shared.set_running(true);
        assert!(shared.is_running());
        shared.request_stop();
        assert!(!shared.is_running());
    }
}
