//! The capability trait connecting a runtime binding to the engine.

use crate::error::SourceError;
use crate::snapshot::CounterSnapshot;

/// A source that yields a [`CounterSnapshot`] on demand.
///
/// This trait decouples the sampling engine from any concrete runtime
/// binding. Counter retrieval differs per binding (in-process property
/// reads, an RPC bridge, a command-line scrape), so each binding provides
/// one conforming adapter and the engine consumes `&dyn CounterSource`.
///
/// A snapshot read is allowed to fail — a remote runtime may be mid-restart,
/// a counter may be version-incompatible. A field the binding simply does
/// not expose is not a failure: the adapter leaves it at the `Default`
/// zero instead.
pub trait CounterSource {
    /// Human-readable agent name, written verbatim into the `agent` column.
    fn name(&self) -> &str;

    /// Read the current absolute counter values.
    fn snapshot(&self) -> Result<CounterSnapshot, SourceError>;

    /// Whether rule learning is enabled, for the one-time settings field.
    ///
    /// Bindings without the capability report `false`.
    fn learning_enabled(&self) -> bool {
        false
    }

    /// Whether long-term memory learning is enabled, for the one-time
    /// settings field.
    ///
    /// Bindings without the capability report `false`.
    fn memory_learning_enabled(&self) -> bool {
        false
    }
}
