//! Error types for counter sources.

use std::fmt;

/// Errors reading counters from a runtime binding.
///
/// A capability the binding does not expose at all is not an error — the
/// adapter reports the `Default` zero for that field. `SourceError` is for
/// reads that were attempted and failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceError {
    /// A specific counter could not be read.
    Counter {
        /// Name of the counter that failed.
        name: &'static str,
        /// Human-readable description of the failure.
        detail: String,
    },
    /// The runtime itself could not be reached or gave an unusable reply.
    Runtime {
        /// Human-readable description of the failure.
        detail: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter { name, detail } => {
                write!(f, "counter '{name}' read failed: {detail}")
            }
            Self::Runtime { detail } => write!(f, "runtime read failed: {detail}"),
        }
    }
}

impl std::error::Error for SourceError {}
