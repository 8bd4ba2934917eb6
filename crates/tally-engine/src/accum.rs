//! Delta and rate accounting over monotonic counter snapshots.
//!
//! The runtime's counters only ever go up; per-interval figures come from
//! differencing consecutive [`CounterSnapshot`]s. [`DeltaAccumulator`]
//! retains the last committed snapshot and turns each new one into a
//! [`Sample`] of deltas and derived rates.

use tally_core::CounterSnapshot;

/// Per-interval statistics derived from two consecutive snapshots.
///
/// Delta fields cover the interval since the previous committed snapshot;
/// the `decision_cycles`, `wm_current`, and `wm_max` fields pass the
/// absolute reading through. Rate fields are guarded: a zero divisor
/// yields 0.0, never NaN or infinity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    /// Absolute decision-cycle count at this sample.
    pub decision_cycles: u64,
    /// Decision cycles completed this interval.
    pub delta_decision_cycles: u64,
    /// Kernel time spent this interval, in seconds.
    pub delta_kernel_secs: f64,
    /// Kernel seconds per decision cycle this interval.
    pub kernel_secs_per_dc: f64,
    /// CPU time spent this interval, in seconds.
    pub delta_cpu_secs: f64,
    /// Production firings this interval.
    pub delta_production_firings: u64,
    /// Kernel seconds per production firing this interval.
    pub kernel_secs_per_firing: f64,
    /// Current working-memory size (absolute gauge).
    pub wm_current: u64,
    /// Working-memory growth per decision cycle this interval.
    ///
    /// The only signed rate: working memory shrinks as well as grows.
    pub wm_mean_per_dc: f64,
    /// Largest working-memory size observed so far (absolute gauge).
    pub wm_max: u64,
    /// Working-memory element additions this interval.
    pub delta_wm_additions: u64,
    /// Working-memory element removals this interval.
    pub delta_wm_removals: u64,
    /// Memory-subsystem time spent this interval, in seconds.
    pub delta_memory_time_secs: f64,
    /// Memory-subsystem seconds per decision cycle this interval.
    pub memory_time_secs_per_dc: f64,
    /// Memory-subsystem retrievals this interval.
    pub delta_memory_retrieves: u64,
    /// Memory-subsystem queries this interval.
    pub delta_memory_queries: u64,
    /// Memory-subsystem stores this interval.
    pub delta_memory_stores: u64,
}

/// Turns absolute counter snapshots into per-interval [`Sample`]s.
///
/// State is committed snapshot-then-commit: [`step`](Self::step) computes
/// every delta into the returned `Sample` first and only then replaces the
/// retained previous snapshot, in one assignment. A caller that drops the
/// sample before it reaches the sink has still consumed the interval — the
/// next delta is measured from this snapshot, not the one before it.
#[derive(Clone, Debug, Default)]
pub struct DeltaAccumulator {
    previous: CounterSnapshot,
}

/// Zero-divisor guard shared by every rate field.
fn rate(delta: f64, divisor: u64) -> f64 {
    if divisor > 0 {
        delta / divisor as f64
    } else {
        0.0
    }
}

impl DeltaAccumulator {
    /// Create an accumulator with an all-zero previous snapshot.
    ///
    /// The first `step` therefore reports deltas equal to the absolute
    /// counter values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Difference `snapshot` against the retained previous snapshot,
    /// then commit it as the new baseline.
    ///
    /// Integer counters difference with `saturating_sub`: a counter that
    /// wrapped or was reset by the runtime yields a 0 delta rather than a
    /// garbage value. Cumulative time totals subtract raw and can go
    /// negative once after an external reset; the value is passed through.
    pub fn step(&mut self, snapshot: &CounterSnapshot) -> Sample {
        let prev = &self.previous;

        let delta_dc = snapshot.decision_cycles.saturating_sub(prev.decision_cycles);
        let delta_kernel = snapshot.kernel_time_secs - prev.kernel_time_secs;
        let delta_cpu = snapshot.cpu_time_secs - prev.cpu_time_secs;
        let delta_pf = snapshot
            .production_firings
            .saturating_sub(prev.production_firings);
        // wm_current is a gauge, so this delta is signed
        let delta_wm = snapshot.wm_current as f64 - prev.wm_current as f64;
        let delta_memory_time = snapshot.memory_time_secs - prev.memory_time_secs;

        let sample = Sample {
            decision_cycles: snapshot.decision_cycles,
            delta_decision_cycles: delta_dc,
            delta_kernel_secs: delta_kernel,
            kernel_secs_per_dc: rate(delta_kernel, delta_dc),
            delta_cpu_secs: delta_cpu,
            delta_production_firings: delta_pf,
            kernel_secs_per_firing: rate(delta_kernel, delta_pf),
            wm_current: snapshot.wm_current,
            wm_mean_per_dc: rate(delta_wm, delta_dc),
            wm_max: snapshot.wm_max,
            delta_wm_additions: snapshot.wm_additions.saturating_sub(prev.wm_additions),
            delta_wm_removals: snapshot.wm_removals.saturating_sub(prev.wm_removals),
            delta_memory_time_secs: delta_memory_time,
            memory_time_secs_per_dc: rate(delta_memory_time, delta_dc),
            delta_memory_retrieves: snapshot
                .memory_retrieves
                .saturating_sub(prev.memory_retrieves),
            delta_memory_queries: snapshot.memory_queries.saturating_sub(prev.memory_queries),
            delta_memory_stores: snapshot.memory_stores.saturating_sub(prev.memory_stores),
        };

        self.previous = *snapshot;
        sample
    }

    /// Zero the retained previous snapshot.
    ///
    /// The next `step` reports deltas equal to the full absolute counter
    /// values. If the runtime's own counters were not reset at the same
    /// time this produces a one-time spurious jump; that is the documented
    /// behavior, not special-cased away.
    pub fn reset(&mut self) {
        self.previous = CounterSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_step_reports_absolute_values_as_deltas() {
        let mut accum = DeltaAccumulator::new();
        let sample = accum.step(&CounterSnapshot {
            decision_cycles: 100,
            kernel_time_secs: 2.0,
            production_firings: 40,
            ..Default::default()
        });
        assert_eq!(sample.delta_decision_cycles, 100);
        assert_eq!(sample.delta_kernel_secs, 2.0);
        assert_eq!(sample.delta_production_firings, 40);
        assert_eq!(sample.kernel_secs_per_dc, 0.02);
        assert_eq!(sample.kernel_secs_per_firing, 0.05);
    }

    #[test]
    fn consecutive_steps_report_per_interval_deltas() {
        let mut accum = DeltaAccumulator::new();
        accum.step(&CounterSnapshot {
            decision_cycles: 100,
            production_firings: 50,
            kernel_time_secs: 1.0,
            ..Default::default()
        });
        let sample = accum.step(&CounterSnapshot {
            decision_cycles: 150,
            production_firings: 80,
            kernel_time_secs: 2.5,
            ..Default::default()
        });
        assert_eq!(sample.decision_cycles, 150);
        assert_eq!(sample.delta_decision_cycles, 50);
        assert_eq!(sample.delta_production_firings, 30);
        assert_eq!(sample.delta_kernel_secs, 1.5);
        assert_eq!(sample.kernel_secs_per_dc, 1.5 / 50.0);
        assert_eq!(sample.kernel_secs_per_firing, 1.5 / 30.0);
    }

    #[test]
    fn zero_cycle_delta_zeroes_every_per_dc_rate() {
        let mut accum = DeltaAccumulator::new();
        let snapshot = CounterSnapshot {
            decision_cycles: 100,
            kernel_time_secs: 1.0,
            memory_time_secs: 0.5,
            wm_current: 20,
            ..Default::default()
        };
        accum.step(&snapshot);
        // no progress since the last sample
        let sample = accum.step(&CounterSnapshot {
            kernel_time_secs: 1.5,
            ..snapshot
        });
        assert_eq!(sample.delta_decision_cycles, 0);
        assert_eq!(sample.kernel_secs_per_dc, 0.0);
        assert_eq!(sample.wm_mean_per_dc, 0.0);
        assert_eq!(sample.memory_time_secs_per_dc, 0.0);
    }

    #[test]
    fn zero_firing_delta_zeroes_the_per_firing_rate() {
        let mut accum = DeltaAccumulator::new();
        let sample = accum.step(&CounterSnapshot {
            decision_cycles: 10,
            kernel_time_secs: 1.0,
            production_firings: 0,
            ..Default::default()
        });
        assert_eq!(sample.kernel_secs_per_firing, 0.0);
    }

    #[test]
    fn reset_makes_the_next_deltas_absolute_again() {
        let mut accum = DeltaAccumulator::new();
        let snapshot = CounterSnapshot {
            decision_cycles: 200,
            production_firings: 90,
            wm_additions: 40,
            ..Default::default()
        };
        accum.step(&snapshot);
        accum.reset();
        let sample = accum.step(&snapshot);
        assert_eq!(sample.delta_decision_cycles, 200);
        assert_eq!(sample.delta_production_firings, 90);
        assert_eq!(sample.delta_wm_additions, 40);
    }

    #[test]
    fn counter_regression_saturates_to_zero() {
        let mut accum = DeltaAccumulator::new();
        accum.step(&CounterSnapshot {
            decision_cycles: 500,
            production_firings: 100,
            ..Default::default()
        });
        // runtime restarted underneath us
        let sample = accum.step(&CounterSnapshot {
            decision_cycles: 10,
            production_firings: 2,
            ..Default::default()
        });
        assert_eq!(sample.delta_decision_cycles, 0);
        assert_eq!(sample.delta_production_firings, 0);
        assert_eq!(sample.kernel_secs_per_dc, 0.0);
    }

    #[test]
    fn shrinking_working_memory_yields_a_negative_mean() {
        let mut accum = DeltaAccumulator::new();
        accum.step(&CounterSnapshot {
            decision_cycles: 10,
            wm_current: 100,
            ..Default::default()
        });
        let sample = accum.step(&CounterSnapshot {
            decision_cycles: 20,
            wm_current: 60,
            ..Default::default()
        });
        assert_eq!(sample.wm_mean_per_dc, -4.0);
    }

    fn arb_snapshot() -> impl Strategy<Value = CounterSnapshot> {
        (
            any::<u32>(),
            0.0f64..1e9,
            0.0f64..1e9,
            any::<u32>(),
            any::<u32>(),
            0.0f64..1e9,
        )
            .prop_map(|(dc, kernel, cpu, pf, wm, mem)| CounterSnapshot {
                decision_cycles: dc as u64,
                kernel_time_secs: kernel,
                cpu_time_secs: cpu,
                production_firings: pf as u64,
                wm_current: wm as u64,
                memory_time_secs: mem,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn rates_are_always_finite(a in arb_snapshot(), b in arb_snapshot()) {
            let mut accum = DeltaAccumulator::new();
            accum.step(&a);
            let sample = accum.step(&b);
            prop_assert!(sample.kernel_secs_per_dc.is_finite());
            prop_assert!(sample.kernel_secs_per_firing.is_finite());
            prop_assert!(sample.wm_mean_per_dc.is_finite());
            prop_assert!(sample.memory_time_secs_per_dc.is_finite());
        }
    }
}
