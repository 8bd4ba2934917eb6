//! The collector facade wiring clock, scheduler, accumulator, and writer
//! to a host runtime's event callbacks.
//!
//! The host calls [`on_start`]/[`on_stop`] around run/pause transitions,
//! [`on_update_event`] once per runtime tick, and — when that returns
//! `true` — [`collect`] once per tracked agent. None of these methods can
//! fail from the host's point of view: every error is caught here, logged
//! through the `log` facade, and swallowed. A failed sample must never
//! take the host down.
//!
//! [`on_start`]: Collector::on_start
//! [`on_stop`]: Collector::on_stop
//! [`on_update_event`]: Collector::on_update_event
//! [`collect`]: Collector::collect

use std::io::Write;

use chrono::Local;
use tally_core::{CounterSource, SteadyTime, TimeSource};

use crate::accum::DeltaAccumulator;
use crate::clock::Clock;
use crate::csv::{CsvWriter, Row};
use crate::error::CollectError;
use crate::schedule::SampleScheduler;

/// Samples an agent runtime's counters and streams them as CSV rows.
///
/// Owns the four engine components and the optional free-text settings
/// suffix. Generic over the sink type `W` and the time source `T`;
/// production code uses the [`SteadyTime`] default and a buffered file
/// sink, tests substitute a manual time source and a `Vec<u8>`.
///
/// All methods take `&mut self`: the engine is single-threaded by
/// construction and performs no internal locking. Every operation runs to
/// completion on the calling thread; the only blocking is the sink's own
/// write or flush.
pub struct Collector<W: Write, T: TimeSource = SteadyTime> {
    time: T,
    clock: Clock,
    scheduler: SampleScheduler,
    accum: DeltaAccumulator,
    writer: CsvWriter<W>,
    additional_settings: Option<String>,
}

impl<W: Write> Collector<W, SteadyTime> {
    /// Create a collector on the system steady clock, with the default
    /// cycle-count period and no sink bound.
    ///
    /// Nothing is written until a sink is bound with
    /// [`set_output`](Self::set_output).
    pub fn new() -> Self {
        Self::with_time_source(SteadyTime::new())
    }
}

impl<W: Write> Default for Collector<W, SteadyTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write, T: TimeSource> Collector<W, T> {
    /// Create a collector reading time from `time`.
    pub fn with_time_source(time: T) -> Self {
        Self {
            time,
            clock: Clock::new(),
            scheduler: SampleScheduler::new(),
            accum: DeltaAccumulator::new(),
            writer: CsvWriter::new(),
            additional_settings: None,
        }
    }

    /// Bind an output sink, returning the previous one (flushed) if any.
    ///
    /// Each bound sink is a new stream: it gets its own header row and its
    /// own one-time settings field on the first sampled row.
    pub fn set_output(&mut self, sink: W) -> Option<W> {
        self.writer.bind(sink)
    }

    /// Unbind and return the output sink, flushed.
    ///
    /// With no sink bound the collector is disabled: `on_update_event`
    /// never asks for a sample and `collect` is a no-op, though the
    /// invocation counter keeps advancing.
    pub fn take_output(&mut self) -> Option<W> {
        self.writer.unbind()
    }

    /// Sample every `cycles` runtime ticks.
    pub fn set_period_cycles(&mut self, cycles: u64) {
        self.scheduler.set_period_cycles(cycles);
    }

    /// Sample every `millis` milliseconds of wall-clock time.
    pub fn set_period_millis(&mut self, millis: u64) {
        self.scheduler.set_period_millis(millis);
    }

    /// Set or clear the free-text suffix appended to the one-time settings
    /// field. Must not contain double quotes.
    pub fn set_additional_settings(&mut self, settings: Option<String>) {
        self.additional_settings = settings;
    }

    /// Resume the wall clock. Call on the runtime's run-start event.
    pub fn on_start(&mut self) {
        self.clock.start(self.time.now());
    }

    /// Pause the wall clock and flush buffered rows. Call on the runtime's
    /// stop event.
    pub fn on_stop(&mut self) {
        self.clock.stop(self.time.now());
        if let Err(e) = self.writer.flush() {
            log::warn!("flush on stop failed: {e}");
        }
    }

    /// Record one runtime tick; returns whether it is time to sample.
    ///
    /// Call once per tick for the whole runtime, not per agent. When this
    /// returns `true`, call [`collect`](Self::collect) for each tracked
    /// agent.
    pub fn on_update_event(&mut self) -> bool {
        self.scheduler
            .on_update(self.time.now(), self.writer.is_bound())
    }

    /// Sample one agent: read its counters, difference them against the
    /// previous sample, and write one CSV row.
    ///
    /// Any failure — a counter read, a sink write — is logged and the
    /// sample dropped; nothing propagates to the host. A no-op while no
    /// sink is bound.
    pub fn collect(&mut self, source: &dyn CounterSource) {
        if !self.writer.is_bound() {
            return;
        }
        if let Err(e) = self.try_collect(source) {
            log::warn!("sample from '{}' dropped: {e}", source.name());
        }
    }

    /// Flush the output sink. Failures are logged and swallowed.
    pub fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("flush failed: {e}");
        }
    }

    /// Return clock, scheduler, and accumulator to their initial state.
    ///
    /// Buffered rows are flushed first. The bound sink and its
    /// header/settings emission state are kept — `reset` starts a new
    /// measurement epoch, not a new stream. If the runtime's own counters
    /// were not reset at the same time, the next sample reports a one-time
    /// jump (deltas measured from zero).
    pub fn reset(&mut self) {
        self.flush();
        self.accum.reset();
        self.scheduler.reset();
        self.clock.reset();
    }

    fn try_collect(&mut self, source: &dyn CounterSource) -> Result<(), CollectError> {
        let now = self.time.now();
        let snapshot = source.snapshot()?;

        // Nothing to report before the first decision cycle completes.
        if snapshot.decision_cycles == 0 {
            return Ok(());
        }

        log::debug!("collecting sample from '{}'", source.name());
        let sample = self.accum.step(&snapshot);
        let row = Row {
            agent: source.name(),
            wall_clock: self.clock.wall_clock(now),
            sample: &sample,
        };
        let settings = if self.writer.settings_pending() {
            Some(self.settings_string(source))
        } else {
            None
        };
        self.writer.write_row(&row, settings.as_deref())?;

        // A sample taken while stopped always flushes, bounding data loss
        // to the unflushed tail since the last stop or explicit flush.
        if self.clock.is_paused() {
            self.writer.flush()?;
        }
        Ok(())
    }

    /// Build the content of the one-time settings field: a timestamp, the
    /// agent's static learning configuration, and the optional caller
    /// suffix.
    fn settings_string(&self, source: &dyn CounterSource) -> String {
        let mut s = format!(
            "{},Learning is {},memory learning {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            if source.learning_enabled() {
                "enabled"
            } else {
                "disabled"
            },
            if source.memory_learning_enabled() {
                "on"
            } else {
                "off"
            },
        );
        if let Some(extra) = &self.additional_settings {
            s.push(',');
            s.push_str(extra);
        }
        s
    }
}
