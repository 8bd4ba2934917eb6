//! Sampling engine for the Tally agent telemetry framework.
//!
//! Four components collaborate, wired together by the [`Collector`]
//! facade: [`Clock`] tracks a pausable wall-clock origin,
//! [`SampleScheduler`] decides once per runtime tick whether to sample,
//! [`DeltaAccumulator`] differences monotonic counter snapshots into
//! per-interval [`Sample`]s, and [`CsvWriter`] serializes them as
//! fixed-schema CSV rows with lazy header emission and flush-on-pause
//! discipline.
//!
//! Hosts normally depend on the `tally` facade crate instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accum;
pub mod clock;
pub mod collector;
pub mod csv;
pub mod error;
pub mod schedule;

pub use accum::{DeltaAccumulator, Sample};
pub use clock::Clock;
pub use collector::Collector;
pub use csv::{Cell, Column, CsvWriter, Row, SCHEMA};
pub use error::CollectError;
pub use schedule::{SampleScheduler, DEFAULT_PERIOD_CYCLES};
