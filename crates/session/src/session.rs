//! One-shot session controller
//!
//! State machine: Idle -> Configured -> Transmitting -> Listening ->
//! {Decoded | Failed} -> Stopped. The frame is built and armed once;
//! the device repeats it autonomously while the listen loop reads and
//! blind-decodes until a frame validates, the read budget runs out, or
//! a stop is requested. Buffer release on the way out is mandatory,
//! otherwise a cyclic transmission never ends.

use crate::config::SessionConfig;
use crate::device::RadioDevice;
use crate::observer::{SessionObserver, Severity};
use crate::payload::{Payload, PayloadSource};
use crate::state::{SessionPhase, SharedState, StatsSnapshot};
use crate::{Result, SessionError};
use burstlink_frame::frame::{decode_frame, encode_frame, PREAMBLE_LEN};
use burstlink_frame::sync::find_preamble;
use burstlink_modem::waveform::{detect_symbols, modulate, snr_db};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Buffers yielding this many detected symbols or fewer are skipped
/// without a synchronization attempt.
pub const MIN_SYMBOLS: usize = 200;

/// Reads between periodic stats reports.
const STATS_INTERVAL: usize = 25;

/// Receive window bounds in samples.
const RX_BUFFER_MIN: usize = 256 * 1024;
const RX_BUFFER_MAX: usize = 2 * 1024 * 1024;

/// Headroom over one frame so a whole frame fits in a single read.
const RX_BUFFER_HEADROOM: f64 = 1.25;

/// Why a session ended without a decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Config(String),
    Device(String),
    BudgetExhausted { reads: u64 },
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Config(msg) => write!(f, "configuration: {msg}"),
            FailureReason::Device(msg) => write!(f, "device: {msg}"),
            FailureReason::BudgetExhausted { reads } => {
                write!(f, "no valid frame within {reads} reads")
            }
            FailureReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Terminal result of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Decoded(Payload),
    Failed(FailureReason),
}

impl SessionOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, SessionOutcome::Decoded(_))
    }
}

/// Auto-sized receive window: large enough for one frame plus margin,
/// clamped to the device's practical limits.
pub fn receive_buffer_size(frame_samples: usize) -> usize {
    ((frame_samples as f64 * RX_BUFFER_HEADROOM) as usize).clamp(RX_BUFFER_MIN, RX_BUFFER_MAX)
}

/// Controller for one transmit/receive cycle.
///
/// Owns the radio device for the duration of the cycle. A session is
/// created in the running state; [`SharedState::request_stop`] cancels
/// it cooperatively between reads.
pub struct Session<D: RadioDevice> {
    config: SessionConfig,
    device: D,
    source: Box<dyn PayloadSource>,
    observer: Arc<dyn SessionObserver>,
    shared: Arc<SharedState>,
    phase: SessionPhase,
}

impl<D: RadioDevice> Session<D> {
    pub fn new(
        config: SessionConfig,
        device: D,
        source: Box<dyn PayloadSource>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let shared = SharedState::new();
        shared.set_running(true);
        Self {
            config,
            device,
            source,
            observer,
            shared,
            phase: SessionPhase::Idle,
        }
    }

    /// Shared handle for cancellation and stats snapshots.
    pub fn shared(&self) -> Arc<SharedState> {
        Arc::clone(&self.shared)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Run the cycle to completion. Never panics on protocol or device
    /// trouble: every path ends in `Stopped` with buffers released and
    /// the outcome reported, leaving the system ready for a new session.
    pub fn run(&mut self) -> SessionOutcome {
        let outcome = match self.run_cycle() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "session aborted");
                self.observer
                    .on_log(&format!("Session error: {err}"), Severity::Error);
                SessionOutcome::Failed(failure_reason(&err))
            }
        };

        self.phase = match outcome {
            SessionOutcome::Decoded(_) => SessionPhase::Decoded,
            SessionOutcome::Failed(_) => SessionPhase::Failed,
        };

        // Tearing these down is what stops a cyclic transmission; both
        // calls are idempotent and safe even if never armed.
        self.device.release_transmit_buffer();
        self.device.release_receive_buffer();

        match &outcome {
            SessionOutcome::Decoded(payload) => {
                self.observer.on_log(
                    &format!("Received {} ({} bytes)", payload.name, payload.len()),
                    Severity::Success,
                );
                self.observer.on_decoded(payload);
            }
            SessionOutcome::Failed(reason) => {
                self.observer
                    .on_log(&format!("Session failed: {reason}"), Severity::Error);
                self.observer.on_failed(reason);
            }
        }
        self.observer.on_stats(&self.shared.snapshot());
        self.shared.set_running(false);
        self.phase = SessionPhase::Stopped;
        outcome
    }

    fn run_cycle(&mut self) -> Result<SessionOutcome> {
        self.config.validate()?;
        let payload = self.source.resolve()?;

        // nothing survives from a previous session
        self.shared.with_stats(|stats| stats.reset());
        info!(rate = %self.config.rate, bytes = payload.len(), "starting one-shot session");
        self.observer.on_log(
            &format!(
                "Session start: BPSK {} | {} ({} bytes)",
                self.config.rate,
                payload.name,
                payload.len()
            ),
            Severity::Info,
        );

        self.device.configure(&self.config.radio_config())?;
        self.phase = SessionPhase::Configured;

        let frame_bits = encode_frame(&payload.data, self.config.rate);
        let waveform = modulate(&frame_bits, self.config.sps)?;
        let rx_buffer = receive_buffer_size(waveform.len());
        self.device.set_receive_buffer_size(rx_buffer)?;
        self.shared.with_stats(|stats| {
            stats.rx_buffer_size = rx_buffer;
            stats.frame_samples = waveform.len();
        });
        self.observer.on_log(
            &format!(
                "TX {} dB RX {} dB | cyclic on | rx buffer {} | frame {} samples",
                self.config.tx_gain_db,
                self.config.rx_gain_db,
                rx_buffer,
                waveform.len()
            ),
            Severity::Success,
        );
        self.observer.on_stats(&self.shared.snapshot());

        // settle the receive chain before the waveform is on the air
        for _ in 0..self.config.warmup_reads {
            self.device.receive()?;
        }

        self.device.transmit(&waveform)?;
        self.shared.with_stats(|stats| stats.frames_transmitted = 1);
        self.phase = SessionPhase::Transmitting;
        self.observer.on_log(
            "Transmit armed: device repeats the waveform",
            Severity::Info,
        );

        thread::sleep(Duration::from_millis(self.config.settle_millis));
        self.phase = SessionPhase::Listening;
        self.observer
            .on_log("Listening until a frame validates...", Severity::Info);
        self.listen(&payload)
    }

    fn listen(&mut self, payload: &Payload) -> Result<SessionOutcome> {
        for n in 0..self.config.max_reads {
            if !self.shared.is_running() {
                return Ok(SessionOutcome::Failed(FailureReason::Cancelled));
            }

            let buffer = self.device.receive()?;
            let snr = snr_db(&buffer);
            self.shared.with_stats(|stats| {
                stats.reads += 1;
                stats.push_snr(snr);
            });
            if n % STATS_INTERVAL == 0 {
                self.observer.on_stats(&self.shared.snapshot());
            }

            let bits = detect_symbols(&buffer, self.config.sps)?;
            if bits.len() <= MIN_SYMBOLS {
                continue;
            }
            let Some(offset) = find_preamble(&bits) else {
                continue;
            };
            debug!(offset, read = n + 1, "preamble candidate");
            if let Some(data) = decode_frame(&bits, offset + PREAMBLE_LEN, self.config.rate) {
                self.shared.with_stats(|stats| stats.decodes += 1);
                info!(bytes = data.len(), reads = n + 1, "frame decoded");
                return Ok(SessionOutcome::Decoded(Payload {
                    data,
                    name: payload.name.clone(),
                    kind: payload.kind,
                }));
            }
        }

        let reads = self.shared.snapshot().reads;
        Ok(SessionOutcome::Failed(FailureReason::BudgetExhausted {
            reads,
        }))
    }
}

fn failure_reason(err: &SessionError) -> FailureReason {
    match err {
        SessionError::Device(e) => FailureReason::Device(e.to_string()),
        other => FailureReason::Config(other.to_string()),
    }
}

/// A session running on its own worker thread.
///
/// The blocking device calls never stall the caller; the handle only
/// requests cancellation and reads snapshots.
pub struct SessionHandle {
    shared: Arc<SharedState>,
    worker: thread::JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    /// Spawn the session worker. One live session per device.
    pub fn spawn<D, S>(
        config: SessionConfig,
        device: D,
        source: S,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self>
    where
        D: RadioDevice + 'static,
        S: PayloadSource + 'static,
    {
        let mut session = Session::new(config, device, Box::new(source), observer);
        let shared = session.shared();
        let worker = thread::Builder::new()
            .name("burstlink-session".to_string())
            .spawn(move || session.run())?;
        Ok(Self { shared, worker })
    }

    /// Request cooperative cancellation; the worker observes it between
    /// reads and still releases both device buffers.
    pub fn stop(&self) {
        self.shared.request_stop();
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.snapshot()
    }

    /// Wait for the worker and return the session outcome.
    pub fn join(self) -> SessionOutcome {
        self.worker.join().unwrap_or_else(|_| {
            SessionOutcome::Failed(FailureReason::Device(
                "session worker panicked".to_string(),
            ))
        })
    }
}
