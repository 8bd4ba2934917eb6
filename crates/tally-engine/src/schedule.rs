//! Sampling cadence decisions.
//!
//! [`SampleScheduler`] answers one question, once per runtime tick: is it
//! time to collect a sample? The answer comes from one of two mutually
//! exclusive policies, held as a tagged variant so the two modes can never
//! share half-updated fields.

use std::time::Duration;

/// Default cycle-count period for a freshly constructed scheduler.
pub const DEFAULT_PERIOD_CYCLES: u64 = 5000;

/// The active cadence policy.
///
/// Switching policies replaces the whole variant, which resets the new
/// mode's timer state. The invocation counter lives outside the variant
/// and is never reset by a mode switch.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    /// Trigger on every `period`-th invocation.
    Cycles {
        period: u64,
    },
    /// Trigger on a fixed wall-clock cadence.
    Elapsed {
        period: Duration,
        /// Cadence origin; `None` until the first enabled invocation arms it.
        last_trigger: Option<Duration>,
    },
}

/// Decides, once per runtime tick, whether to collect a sample.
///
/// The scheduler is a pure state machine: `on_update` takes the current
/// [`TimeSource`] reading from the caller. A disabled invocation (no sink
/// bound) never triggers but still advances the invocation counter, so
/// toggling output on and off does not shift the cadence.
///
/// A period of zero is configuration misuse and leaves the scheduler
/// inert (never triggers) rather than raising an error, so a long
/// unattended run keeps going.
///
/// [`TimeSource`]: tally_core::TimeSource
#[derive(Clone, Debug)]
pub struct SampleScheduler {
    mode: Mode,
    count: u64,
}

impl Default for SampleScheduler {
    fn default() -> Self {
        Self {
            mode: Mode::Cycles {
                period: DEFAULT_PERIOD_CYCLES,
            },
            count: 0,
        }
    }
}

impl SampleScheduler {
    /// Create a scheduler in cycle mode with the default period.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to cycle mode: trigger on every `cycles`-th invocation.
    pub fn set_period_cycles(&mut self, cycles: u64) {
        self.mode = Mode::Cycles { period: cycles };
    }

    /// Switch to elapsed-time mode: trigger every `millis` milliseconds.
    ///
    /// The cadence arms on the first enabled invocation after the switch;
    /// that invocation itself never triggers.
    pub fn set_period_millis(&mut self, millis: u64) {
        self.mode = Mode::Elapsed {
            period: Duration::from_millis(millis),
            last_trigger: None,
        };
    }

    /// Invocations seen so far, including disabled ones.
    pub fn invocation_count(&self) -> u64 {
        self.count
    }

    /// Record one runtime tick and decide whether to sample now.
    ///
    /// `enabled` is whether an output sink is currently bound; a disabled
    /// tick advances the counter and nothing else. In elapsed-time mode
    /// the trigger time advances by exactly one period per trigger
    /// (`last_trigger += period`, not `= now`), so irregular call timing
    /// does not accumulate drift.
    pub fn on_update(&mut self, now: Duration, enabled: bool) -> bool {
        self.count += 1;

        if !enabled {
            return false;
        }

        match &mut self.mode {
            Mode::Cycles { period } => *period >= 1 && self.count % *period == 0,
            Mode::Elapsed {
                period,
                last_trigger,
            } => {
                if period.is_zero() {
                    return false;
                }
                let Some(last) = *last_trigger else {
                    *last_trigger = Some(now);
                    return false;
                };
                let elapsed = now.saturating_sub(last);
                log::trace!("elapsed since last trigger: {}ms", elapsed.as_millis());
                if elapsed >= *period {
                    *last_trigger = Some(last + *period);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Zero the invocation counter and re-arm the elapsed-time cadence.
    ///
    /// The configured mode and period are kept.
    pub fn reset(&mut self) {
        self.count = 0;
        if let Mode::Elapsed { last_trigger, .. } = &mut self.mode {
            *last_trigger = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn cycle_mode_triggers_every_nth_invocation() {
        let mut sched = SampleScheduler::new();
        sched.set_period_cycles(3);
        let fired: Vec<bool> = (0..9).map(|_| sched.on_update(ms(0), true)).collect();
        assert_eq!(
            fired,
            [false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn period_one_triggers_every_invocation() {
        let mut sched = SampleScheduler::new();
        sched.set_period_cycles(1);
        assert!(sched.on_update(ms(0), true));
        assert!(sched.on_update(ms(0), true));
    }

    #[test]
    fn zero_period_is_inert() {
        let mut sched = SampleScheduler::new();
        sched.set_period_cycles(0);
        for _ in 0..10 {
            assert!(!sched.on_update(ms(0), true));
        }
        sched.set_period_millis(0);
        for t in 0..10 {
            assert!(!sched.on_update(ms(t * 1000), true));
        }
    }

    #[test]
    fn disabled_invocations_advance_the_counter() {
        let mut sched = SampleScheduler::new();
        sched.set_period_cycles(3);
        assert!(!sched.on_update(ms(0), false));
        assert!(!sched.on_update(ms(0), false));
        assert_eq!(sched.invocation_count(), 2);
        // invocation 3 is a multiple of 3 even though 1 and 2 were disabled
        assert!(sched.on_update(ms(0), true));
    }

    #[test]
    fn elapsed_mode_first_invocation_arms_without_triggering() {
        let mut sched = SampleScheduler::new();
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(500), true));
        assert!(sched.on_update(ms(600), true));
    }

    #[test]
    fn elapsed_cadence_does_not_drift_under_jitter() {
        let mut sched = SampleScheduler::new();
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(0), true)); // arm at t=0
        assert!(!sched.on_update(ms(50), true));
        assert!(sched.on_update(ms(130), true)); // cadence origin now 100
        assert!(!sched.on_update(ms(170), true));
        assert!(sched.on_update(ms(210), true)); // origin 200
        assert!(!sched.on_update(ms(299), true));
        assert!(sched.on_update(ms(301), true)); // origin 300
    }

    #[test]
    fn elapsed_mode_does_not_arm_while_disabled() {
        let mut sched = SampleScheduler::new();
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(0), false));
        // arming happens on the first enabled invocation
        assert!(!sched.on_update(ms(500), true));
        assert!(!sched.on_update(ms(550), true));
        assert!(sched.on_update(ms(600), true));
    }

    #[test]
    fn mode_switch_resets_timer_but_not_counter() {
        let mut sched = SampleScheduler::new();
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(0), true));
        assert!(sched.on_update(ms(100), true));
        assert_eq!(sched.invocation_count(), 2);

        sched.set_period_cycles(4);
        assert_eq!(sched.invocation_count(), 2);
        assert!(!sched.on_update(ms(200), true)); // count 3
        assert!(sched.on_update(ms(200), true)); // count 4

        // switching back re-arms the elapsed cadence
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(1000), true));
        assert!(sched.on_update(ms(1100), true));
    }

    #[test]
    fn reset_zeroes_count_and_rearms() {
        let mut sched = SampleScheduler::new();
        sched.set_period_millis(100);
        assert!(!sched.on_update(ms(0), true));
        assert!(sched.on_update(ms(100), true));
        sched.reset();
        assert_eq!(sched.invocation_count(), 0);
        assert!(!sched.on_update(ms(5000), true)); // re-arms, no trigger
        assert!(sched.on_update(ms(5100), true));
    }

    proptest! {
        #[test]
        fn cycle_mode_triggers_exactly_on_multiples(
            n in 1u64..50,
            enabled in prop::collection::vec(any::<bool>(), 1..200),
        ) {
            let mut sched = SampleScheduler::new();
            sched.set_period_cycles(n);
            for (i, &en) in enabled.iter().enumerate() {
                let fired = sched.on_update(Duration::ZERO, en);
                let count = (i + 1) as u64;
                prop_assert_eq!(fired, en && count % n == 0);
            }
        }

        #[test]
        fn counter_is_monotonic(
            calls in prop::collection::vec(any::<bool>(), 1..100),
        ) {
            let mut sched = SampleScheduler::new();
            let mut last = sched.invocation_count();
            for &en in &calls {
                sched.on_update(Duration::ZERO, en);
                prop_assert!(sched.invocation_count() > last);
                last = sched.invocation_count();
            }
        }
    }
}
