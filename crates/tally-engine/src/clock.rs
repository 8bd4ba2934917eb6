//! Pausable wall-clock accounting.
//!
//! [`Clock`] tracks how much time an agent run has actually been running,
//! excluding the spans between a `stop` and the next `start`. It is a pure
//! state machine: every method takes the current [`TimeSource`] reading
//! from the caller, so tests can drive it without sleeping.
//!
//! [`TimeSource`]: tally_core::TimeSource

use std::time::Duration;

/// Adjustable wall-clock origin that survives pause/resume cycles.
///
/// The reported wall clock is `now − offset`, where `offset` accumulates
/// the length of every completed pause. While paused, the reading is
/// frozen at the moment `stop` was called.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    /// Sum of all completed pause spans.
    offset: Duration,
    /// Set while paused; the reading `stop` was called with.
    paused_at: Option<Duration>,
}

impl Clock {
    /// Create a running clock with a zero offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume after a pause, folding the paused span into the offset.
    ///
    /// A no-op if the clock is already running (adds zero).
    pub fn start(&mut self, now: Duration) {
        if let Some(paused_at) = self.paused_at.take() {
            self.offset += now.saturating_sub(paused_at);
        }
    }

    /// Mark the clock paused as of `now`.
    ///
    /// A second `stop` while already paused is a no-op: the earliest stop
    /// wins, so the whole stop-to-start span is excluded from the wall
    /// clock. Flushing on stop is the writer's job, driven by the same
    /// host event.
    pub fn stop(&mut self, now: Duration) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// The wall clock in fractional seconds: `now − offset` while running,
    /// frozen at the stop reading while paused.
    ///
    /// Monotonically non-decreasing across any start/stop/start sequence.
    pub fn wall_clock(&self, now: Duration) -> f64 {
        let reading = self.paused_at.unwrap_or(now);
        reading.saturating_sub(self.offset).as_secs_f64()
    }

    /// Whether the clock is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Zero the offset and clear any pause marker.
    pub fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.paused_at = None;
    }
}
