//! Absolute counter readings taken from a running agent.
//!
//! [`CounterSnapshot`] is the unit of data exchanged between a runtime
//! adapter and the sampling engine: one absolute, point-in-time reading
//! of the runtime's internal counters. The engine differences consecutive
//! snapshots; it never interprets the absolute values beyond that.

/// One absolute reading of an agent runtime's performance counters.
///
/// Counter fields are cumulative and monotonically non-decreasing for the
/// lifetime of the runtime; gauge fields are instantaneous. A runtime that
/// cannot supply a field reports it as 0 — `Default` gives the all-zero
/// snapshot, so adapters fill in only what their binding exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CounterSnapshot {
    /// Decision cycles completed since the runtime started (counter).
    pub decision_cycles: u64,
    /// Cumulative kernel time in seconds (counter).
    pub kernel_time_secs: f64,
    /// Cumulative CPU time in seconds (counter).
    pub cpu_time_secs: f64,
    /// Production firings since the runtime started (counter).
    pub production_firings: u64,
    /// Working-memory elements currently held (gauge).
    pub wm_current: u64,
    /// Largest working-memory size observed so far (gauge).
    pub wm_max: u64,
    /// Working-memory element additions since start (counter).
    pub wm_additions: u64,
    /// Working-memory element removals since start (counter).
    pub wm_removals: u64,
    /// Cumulative time spent in the long-term memory subsystem, in
    /// seconds (counter).
    pub memory_time_secs: f64,
    /// Long-term memory retrieval count (counter).
    pub memory_retrieves: u64,
    /// Long-term memory query count (counter).
    pub memory_queries: u64,
    /// Long-term memory store count (counter).
    pub memory_stores: u64,
}
