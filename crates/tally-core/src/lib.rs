//! Core types and traits for the Tally agent telemetry framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the counter snapshot carried from a runtime to the sampling engine,
//! the capability traits the engine consumes ([`CounterSource`],
//! [`TimeSource`]), and the source-side error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod snapshot;
pub mod source;
pub mod time;

pub use error::SourceError;
pub use snapshot::CounterSnapshot;
pub use source::CounterSource;
pub use time::{SteadyTime, TimeSource};
