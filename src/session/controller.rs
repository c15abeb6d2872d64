//! Call session controller
//!
//! Owns the single `CallState` cell for one call session, drives the
//! connect delay and the elapsed-time ticker, and publishes every
//! transition through a watch channel.

use crate::history::{CallLog, CallRecord};
use crate::session::config::CallConfig;
use crate::session::state::{format_elapsed, CallState};
use crate::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// State cell shared between the controller and its session task.
///
/// Every mutation happens under this mutex, so intent-driven writes and
/// tick writes are serialized and observed in a single total order.
struct Inner {
    /// Current session state
    state: CallState,

    /// Bumped on every transition that invalidates the running session
    /// task. A task whose epoch no longer matches must not write.
    epoch: u64,

    /// Handle to the running session task, if any
    session: Option<JoinHandle<()>>,

    /// When the current call entered `Active`
    connected_at: Option<DateTime<Utc>>,
}

/// Controller for a single call session lifecycle
///
/// Valid transitions: `Idle → Connecting → Active → Ended → Idle` (reset)
/// or `Ended → Connecting` (new call). All intent methods are cheap and
/// non-blocking; the connect delay and ticking run on a background task.
pub struct CallController {
    inner: Arc<Mutex<Inner>>,

    /// State publisher; sent under the inner lock so the watch order
    /// equals the mutation order
    state_tx: Arc<watch::Sender<CallState>>,

    config: CallConfig,

    /// Optional recent-calls log, appended on `Active → Ended`
    log: Option<CallLog>,
}

impl CallController {
    /// Create a controller in the `Idle` state
    pub fn new(config: CallConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a controller that records completed calls into `log`
    pub fn with_log(config: CallConfig, log: CallLog) -> Result<Self> {
        Self::build(config, Some(log))
    }

    fn build(config: CallConfig, log: Option<CallLog>) -> Result<Self> {
        config.validate()?;
        let (state_tx, _state_rx) = watch::channel(CallState::Idle);
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                state: CallState::Idle,
                epoch: 0,
                session: None,
                connected_at: None,
            })),
            state_tx: Arc::new(state_tx),
            config,
            log,
        })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CallState {
        self.inner.lock().state
    }

    /// Subscribe to state transitions (last-value-wins, transition order)
    pub fn subscribe(&self) -> watch::Receiver<CallState> {
        self.state_tx.subscribe()
    }

    /// Start a call: enter `Connecting`, then `Active` after the
    /// configured setup delay
    ///
    /// Any session task still running from a previous call is cancelled
    /// first, so at most one ticker exists per controller.
    pub fn start_call(&self) {
        let epoch = {
            let mut inner = self.inner.lock();
            if let Some(task) = inner.session.take() {
                task.abort();
            }
            inner.epoch += 1;
            inner.connected_at = None;
            inner.state = CallState::Connecting;
            self.state_tx.send_replace(inner.state);
            inner.epoch
        };
        info!(mode = %self.config.mode, "call connecting");

        let task = tokio::spawn(run_session(
            Arc::clone(&self.inner),
            Arc::clone(&self.state_tx),
            self.config.clone(),
            epoch,
        ));

        let mut inner = self.inner.lock();
        if inner.epoch == epoch {
            inner.session = Some(task);
        } else {
            // An end/reset intent won the race; the task's epoch check
            // already makes it inert, abort is just cleanup.
            task.abort();
        }
    }

    /// End the call, retaining the elapsed duration
    ///
    /// Idempotent from any state: ending an `Idle` or `Connecting`
    /// session yields `Ended` with a zero duration, cancelling any
    /// pending connect.
    pub fn end_call(&self) {
        let record = {
            let mut inner = self.inner.lock();
            if let Some(task) = inner.session.take() {
                task.abort();
            }
            inner.epoch += 1;

            let final_elapsed_secs = match inner.state {
                CallState::Active { elapsed_secs, .. } => elapsed_secs,
                _ => 0,
            };
            let record = inner.connected_at.take().map(|connected_at| {
                CallRecord::new(self.config.mode, connected_at, Utc::now(), final_elapsed_secs)
            });
            inner.state = CallState::Ended { final_elapsed_secs };
            self.state_tx.send_replace(inner.state);
            record
        };

        if let Some(record) = record {
            info!(duration = %format_elapsed(record.duration_secs), "call ended");
            if let Some(log) = &self.log {
                log.add(record);
            }
        } else {
            info!("call ended before connecting");
        }
    }

    /// Flip the microphone mute toggle; silently ignored unless active
    pub fn toggle_mic_mute(&self) {
        self.toggle_active(|mic_muted, _| *mic_muted = !*mic_muted);
    }

    /// Flip the speaker (voice) or camera (video) toggle; silently
    /// ignored unless active
    pub fn toggle_speaker_or_video(&self) {
        self.toggle_active(|_, speaker_or_video_off| {
            *speaker_or_video_off = !*speaker_or_video_off
        });
    }

    fn toggle_active(&self, apply: impl FnOnce(&mut bool, &mut bool)) {
        let mut inner = self.inner.lock();
        if let CallState::Active {
            elapsed_secs,
            mut mic_muted,
            mut speaker_or_video_off,
        } = inner.state
        {
            apply(&mut mic_muted, &mut speaker_or_video_off);
            inner.state = CallState::Active {
                elapsed_secs,
                mic_muted,
                speaker_or_video_off,
            };
            self.state_tx.send_replace(inner.state);
            debug!(mic_muted, speaker_or_video_off, "toggle applied");
        }
    }

    /// Start a fresh call after one has ended
    ///
    /// Equivalent to `start_call()`: elapsed time always restarts from
    /// zero, never resuming a previous session's duration.
    pub fn start_new_call(&self) {
        self.start_call();
    }

    /// Cancel everything and return to `Idle`
    pub fn reset_to_idle(&self) {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.session.take() {
            task.abort();
        }
        inner.epoch += 1;
        inner.connected_at = None;
        inner.state = CallState::Idle;
        self.state_tx.send_replace(inner.state);
        debug!("session reset to idle");
    }
}

impl Drop for CallController {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.session.take() {
            task.abort();
        }
    }
}

/// One call session: connect delay, then a 1-per-interval elapsed tick.
///
/// Every write re-checks the epoch under the state lock; a tick that
/// lost a race with `end_call`/`reset_to_idle` terminates without
/// writing instead of relying on abort alone.
async fn run_session(
    inner: Arc<Mutex<Inner>>,
    state_tx: Arc<watch::Sender<CallState>>,
    config: CallConfig,
    epoch: u64,
) {
    tokio::time::sleep(config.setup_delay).await;
    {
        let mut inner = inner.lock();
        if inner.epoch != epoch || inner.state != CallState::Connecting {
            return;
        }
        inner.state = CallState::Active {
            elapsed_secs: 0,
            mic_muted: false,
            speaker_or_video_off: config.default_toggle_off(),
        };
        inner.connected_at = Some(Utc::now());
        state_tx.send_replace(inner.state);
    }
    info!(mode = %config.mode, "call active");

    loop {
        tokio::time::sleep(config.tick_interval).await;
        let mut inner = inner.lock();
        if inner.epoch != epoch {
            return;
        }
        let next = match inner.state {
            CallState::Active {
                elapsed_secs,
                mic_muted,
                speaker_or_video_off,
            } => CallState::Active {
                elapsed_secs: elapsed_secs + 1,
                mic_muted,
                speaker_or_video_off,
            },
            // Stale tick after a transition out of Active
            _ => return,
        };
        inner.state = next;
        state_tx.send_replace(next);
    }
}
