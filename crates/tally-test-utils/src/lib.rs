//! Test utilities and mock types for Tally development.
//!
//! Provides mock implementations of the core capability traits
//! ([`CounterSource`], [`TimeSource`]) and a shareable in-memory sink:
//!
//! - [`MockSource`] — scripted counter source with settable snapshots.
//! - [`FailingSource`] — fails deterministically after N reads.
//! - [`ManualTime`] — settable time source; tests advance it by hand.
//! - [`SharedSink`] — in-memory `Write` sink observable while owned by a
//!   collector, counting flushes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use tally_core::{CounterSnapshot, CounterSource, SourceError, TimeSource};

/// Mock counter source with a settable current snapshot.
///
/// [`CounterSnapshot`] is `Copy`, so the snapshot sits in a `Cell` and
/// tests can change it between `collect` calls through a shared reference.
/// [`fail_next`](MockSource::fail_next) makes exactly the next read fail,
/// for exercising the drop-and-recover path.
pub struct MockSource {
    name: String,
    snapshot: Cell<CounterSnapshot>,
    fail_next: Cell<bool>,
    learning: bool,
    memory_learning: bool,
}

impl MockSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snapshot: Cell::new(CounterSnapshot::default()),
            fail_next: Cell::new(false),
            learning: false,
            memory_learning: false,
        }
    }

    /// Set the learning flags reported for the settings field.
    pub fn with_learning(mut self, learning: bool, memory_learning: bool) -> Self {
        self.learning = learning;
        self.memory_learning = memory_learning;
        self
    }

    /// Replace the snapshot the next read returns.
    pub fn set(&self, snapshot: CounterSnapshot) {
        self.snapshot.set(snapshot);
    }

    /// Make exactly the next read fail with a runtime error.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }
}

impl CounterSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Result<CounterSnapshot, SourceError> {
        if self.fail_next.take() {
            return Err(SourceError::Runtime {
                detail: "scripted failure".to_string(),
            });
        }
        Ok(self.snapshot.get())
    }

    fn learning_enabled(&self) -> bool {
        self.learning
    }

    fn memory_learning_enabled(&self) -> bool {
        self.memory_learning
    }
}

/// Counter source that fails deterministically after N successful reads.
pub struct FailingSource {
    name: String,
    snapshot: Cell<CounterSnapshot>,
    fail_after: usize,
    reads: Cell<usize>,
}

impl FailingSource {
    /// Succeed for `fail_after` reads, then fail forever.
    pub fn new(name: impl Into<String>, fail_after: usize) -> Self {
        Self {
            name: name.into(),
            snapshot: Cell::new(CounterSnapshot::default()),
            fail_after,
            reads: Cell::new(0),
        }
    }

    /// Replace the snapshot returned while reads still succeed.
    pub fn set(&self, snapshot: CounterSnapshot) {
        self.snapshot.set(snapshot);
    }
}

impl CounterSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Result<CounterSnapshot, SourceError> {
        let reads = self.reads.get() + 1;
        self.reads.set(reads);
        if reads > self.fail_after {
            return Err(SourceError::Counter {
                name: "decision_cycles",
                detail: format!("failing after {} reads", self.fail_after),
            });
        }
        Ok(self.snapshot.get())
    }
}

/// Manually driven time source.
///
/// Clones share the same underlying reading, so a test can hand one clone
/// to a collector and advance time through another.
#[derive(Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    /// Create a time source at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute reading.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Advance the reading by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Advance the reading by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// In-memory sink whose contents stay observable after a collector takes
/// ownership of it.
///
/// Clones share the same buffer and flush counter.
#[derive(Clone, Default)]
pub struct SharedSink {
    inner: Rc<RefCell<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    data: Vec<u8>,
    flushes: usize,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.inner.borrow().data.clone()
    }

    /// Everything written so far, as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.contents()).expect("sink contents were not valid utf-8")
    }

    /// Number of `flush` calls observed.
    pub fn flush_count(&self) -> usize {
        self.inner.borrow().flushes
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_time_advances() {
        let t = ManualTime::new();
        let shared = t.clone();
        t.advance_millis(250);
        assert_eq!(shared.now(), Duration::from_millis(250));
    }

    #[test]
    fn mock_source_fails_once_then_recovers() {
        let src = MockSource::new("a1");
        src.fail_next();
        assert!(src.snapshot().is_err());
        assert!(src.snapshot().is_ok());
    }

    #[test]
    fn failing_source_fails_after_n_reads() {
        let src = FailingSource::new("a1", 2);
        assert!(src.snapshot().is_ok());
        assert!(src.snapshot().is_ok());
        assert!(src.snapshot().is_err());
        assert!(src.snapshot().is_err());
    }

    #[test]
    fn shared_sink_observes_writes_and_flushes() {
        let sink = SharedSink::new();
        let mut handle = sink.clone();
        handle.write_all(b"row\n").unwrap();
        handle.flush().unwrap();
        assert_eq!(sink.text(), "row\n");
        assert_eq!(sink.flush_count(), 1);
    }
}
