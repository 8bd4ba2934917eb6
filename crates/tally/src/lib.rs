//! Tally: counter sampling and CSV telemetry for cognitive-agent runtimes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Tally sub-crates. For most users, adding `tally` as a single
//! dependency is sufficient.
//!
//! A host wires a [`Collector`](prelude::Collector) to three runtime
//! events: run start, run stop, and the per-tick update. The collector
//! decides when to sample (by cycle count or wall-clock period), turns
//! monotonic counter snapshots into per-interval deltas and rates, and
//! streams them as CSV rows. Sampling never fails from the host's point
//! of view — errors are logged through the `log` facade and the sample
//! dropped.
//!
//! # Quick start
//!
//! ```rust
//! use tally::prelude::*;
//!
//! // One adapter per concrete runtime binding; the engine only sees the
//! // CounterSource capability.
//! struct StubRuntime;
//! impl CounterSource for StubRuntime {
//!     fn name(&self) -> &str {
//!         "agent-1"
//!     }
//!     fn snapshot(&self) -> Result<CounterSnapshot, SourceError> {
//!         Ok(CounterSnapshot {
//!             decision_cycles: 42,
//!             production_firings: 7,
//!             ..Default::default()
//!         })
//!     }
//! }
//!
//! let mut collector: Collector<Vec<u8>> = Collector::new();
//! collector.set_output(Vec::new());
//! collector.set_period_cycles(1);
//!
//! // Driven by the host's kernel events:
//! collector.on_start();
//! if collector.on_update_event() {
//!     collector.collect(&StubRuntime);
//! }
//! collector.on_stop();
//!
//! let csv = collector.take_output().unwrap();
//! assert!(csv.starts_with(b"agent,wall clock,dc num,"));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tally-core` | `CounterSnapshot`, capability traits, source errors |
//! | [`engine`] | `tally-engine` | Clock, scheduler, accumulator, CSV writer, collector |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and capability traits (`tally-core`).
///
/// Contains [`types::CounterSnapshot`], the [`types::CounterSource`] and
/// [`types::TimeSource`] traits a runtime binding implements, and
/// [`types::SourceError`].
pub use tally_core as types;

/// The sampling engine (`tally-engine`).
///
/// The [`engine::Collector`] facade plus the components it owns:
/// [`engine::Clock`], [`engine::SampleScheduler`],
/// [`engine::DeltaAccumulator`], and [`engine::CsvWriter`].
pub use tally_engine as engine;

/// Common imports for typical Tally usage.
///
/// ```rust
/// use tally::prelude::*;
/// ```
///
/// This imports the collector, the snapshot type, the capability traits a
/// runtime binding implements, and the error types.
pub mod prelude {
    pub use tally_core::{CounterSnapshot, CounterSource, SourceError, SteadyTime, TimeSource};

    pub use tally_engine::{CollectError, Collector};
}
