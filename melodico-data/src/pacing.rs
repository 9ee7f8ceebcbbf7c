//! Minimum-interval spacing for outbound catalogue requests.

use std::time::{Duration, Instant};

/// Clock and sleep primitives, injectable so pacing is testable without
/// real waits.
pub trait Pacing {
    /// The current monotonic instant.
    fn now(&mut self) -> Instant;
    /// Block for `duration`.
    fn pause(&mut self, duration: Duration);
}

/// Real pacing: the monotonic clock and a blocking thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicPacing;

impl Pacing for MonotonicPacing {
    fn now(&mut self) -> Instant {
        Instant::now()
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Spaces consecutive calls by at least a configured interval.
///
/// The interval is measured from the end of the previous call (recorded via
/// [`RateGate::complete`]) to the start of the next (gated by
/// [`RateGate::wait`]). The wait is a blocking sleep: the catalogue enforces
/// a server-side rate limit and the client is expected to be a well-behaved
/// citizen of that service.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use melodico_data::RateGate;
///
/// let mut gate = RateGate::new(Duration::from_millis(1100));
/// gate.wait();      // first call passes immediately
/// // ... issue request ...
/// gate.complete();  // stamp the end of the call
/// ```
#[derive(Debug)]
pub struct RateGate<P = MonotonicPacing> {
    interval: Duration,
    last_completed: Option<Instant>,
    pacing: P,
}

impl RateGate<MonotonicPacing> {
    /// Construct a gate over the real clock.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self::with_pacing(interval, MonotonicPacing)
    }
}

impl<P: Pacing> RateGate<P> {
    /// Construct a gate over injected pacing primitives.
    pub fn with_pacing(interval: Duration, pacing: P) -> Self {
        Self {
            interval,
            last_completed: None,
            pacing,
        }
    }

    /// The configured minimum interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until at least the configured interval has passed since the
    /// previous [`RateGate::complete`]. The first call never blocks.
    pub fn wait(&mut self) {
        let Some(last) = self.last_completed else {
            return;
        };
        let elapsed = self.pacing.now().saturating_duration_since(last);
        if elapsed < self.interval {
            self.pacing.pause(self.interval - elapsed);
        }
    }

    /// Record that a call has just finished.
    pub fn complete(&mut self) {
        self.last_completed = Some(self.pacing.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Fake pacing: time advances only when paused, and the total paused
    /// duration is observable.
    struct ScriptedPacing {
        current: Instant,
        slept: Duration,
    }

    impl ScriptedPacing {
        fn new() -> Self {
            Self {
                current: Instant::now(),
                slept: Duration::ZERO,
            }
        }
    }

    impl Pacing for &mut ScriptedPacing {
        fn now(&mut self) -> Instant {
            self.current
        }

        fn pause(&mut self, duration: Duration) {
            self.current += duration;
            self.slept += duration;
        }
    }

    #[rstest]
    fn first_call_is_not_delayed() {
        let mut pacing = ScriptedPacing::new();
        let mut gate = RateGate::with_pacing(Duration::from_millis(1100), &mut pacing);
        gate.wait();
        gate.complete();
        assert_eq!(pacing.slept, Duration::ZERO);
    }

    #[rstest]
    #[case(2)]
    #[case(5)]
    fn consecutive_calls_accumulate_the_interval(#[case] calls: u32) {
        let interval = Duration::from_millis(1100);
        let mut pacing = ScriptedPacing::new();
        let mut gate = RateGate::with_pacing(interval, &mut pacing);
        for _ in 0..calls {
            gate.wait();
            gate.complete();
        }
        assert!(pacing.slept >= interval * (calls - 1));
    }

    #[rstest]
    fn elapsed_time_reduces_the_wait() {
        let interval = Duration::from_millis(1000);
        let mut pacing = ScriptedPacing::new();
        // Simulate 400ms of work between calls.
        let mut gate = RateGate::with_pacing(interval, &mut pacing);
        gate.wait();
        gate.complete();
        gate.pacing.pause(Duration::from_millis(400));
        let already_slept = gate.pacing.slept;
        gate.wait();
        assert_eq!(
            gate.pacing.slept - already_slept,
            Duration::from_millis(600)
        );
    }
}
