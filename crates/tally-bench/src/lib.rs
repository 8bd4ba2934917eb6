//! Benchmark inputs for the Tally telemetry framework.
//!
//! Provides deterministic, seeded counter walks so benchmark runs are
//! comparable across machines and revisions.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tally_core::CounterSnapshot;

/// Generate a monotone counter walk of `steps` snapshots.
///
/// Each snapshot advances every counter by a seeded random increment, the
/// way a busy agent's counters move between samples. Gauges wander up and
/// down within a plausible band.
pub fn counter_walk(seed: u64, steps: usize) -> Vec<CounterSnapshot> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut snapshot = CounterSnapshot::default();
    let mut walk = Vec::with_capacity(steps);

    for _ in 0..steps {
        snapshot.decision_cycles += rng.random_range(1..500);
        snapshot.kernel_time_secs += rng.random_range(0.0..0.5);
        snapshot.cpu_time_secs += rng.random_range(0.0..0.8);
        snapshot.production_firings += rng.random_range(0..2_000);
        snapshot.wm_current = rng.random_range(100..10_000);
        snapshot.wm_max = snapshot.wm_max.max(snapshot.wm_current);
        snapshot.wm_additions += rng.random_range(0..5_000);
        snapshot.wm_removals += rng.random_range(0..5_000);
        snapshot.memory_time_secs += rng.random_range(0.0..0.05);
        snapshot.memory_retrieves += rng.random_range(0..50);
        snapshot.memory_queries += rng.random_range(0..50);
        snapshot.memory_stores += rng.random_range(0..20);
        walk.push(snapshot);
    }

    walk
}
