use std::time::Duration;

use quanta::{Clock, Instant};

/// Monotonic time source shared by every phase of a trial.
///
/// Cloning is cheap; all clones read the same calibrated source.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    clock: Clock,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseClock {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    #[inline]
    pub fn elapsed(&self, since: Instant) -> Duration {
        self.clock.now().duration_since(since)
    }

    /// Runs `f` and returns its result with the time it took.
    pub fn time<R>(&self, f: impl FnOnce() -> R) -> (R, Duration) {
        let begin = self.now();
        let result = f();
        (result, self.elapsed(begin))
    }
}

pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
