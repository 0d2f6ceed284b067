use std::{hint::black_box, time::Duration};

use parking_lot::Mutex;
use quanta::Instant;

use crate::clock::PhaseClock;

/// Amounts added and then subtracted on every counter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementStep {
    pub add: u64,
    pub sub: u64,
}

impl Default for IncrementStep {
    fn default() -> Self {
        Self { add: 37, sub: 36 }
    }
}

impl IncrementStep {
    #[inline]
    pub fn net(&self) -> u64 {
        self.add.wrapping_sub(self.sub)
    }

    /// Counter value after `workers` workers each ran `per_worker` steps from zero.
    pub fn expected(&self, workers: u64, per_worker: u64) -> u64 {
        workers.wrapping_mul(per_worker).wrapping_mul(self.net())
    }
}

/// Runs `steps` read/add/subtract/write steps against `value`.
///
/// The read is opaque to the optimizer so every step is really executed.
#[inline(never)]
pub fn add_then_subtract(value: &mut u64, steps: u64, step: IncrementStep) {
    for _ in 0..steps {
        let mut temp = black_box(*value);
        temp = temp.wrapping_add(step.add);
        temp = temp.wrapping_sub(step.sub);
        *value = temp;
    }
}

#[derive(Debug, Default)]
struct CounterState {
    value: u64,
    phase_start: Option<Instant>,
    phase_elapsed: Duration,
    acquisitions: u64,
}

/// Counter shared by every worker of a trial, guarded by a single mutex.
///
/// A worker holds the lock for its whole loop, so all steps of all workers
/// are serialized.
#[derive(Debug)]
pub struct SharedCounter {
    state: Mutex<CounterState>,
    clock: PhaseClock,
}

impl SharedCounter {
    pub fn new(clock: PhaseClock) -> Self {
        Self {
            state: Mutex::new(CounterState::default()),
            clock,
        }
    }

    pub fn increment(&self, steps: u64, step: IncrementStep) {
        let mut state = self.state.lock();

        // first worker in opens the phase, every worker closes it
        let begin = *state.phase_start.get_or_insert_with(|| self.clock.now());

        add_then_subtract(&mut state.value, steps, step);

        state.acquisitions += 1;
        state.phase_elapsed = self.clock.elapsed(begin);
    }

    pub fn value(&self) -> u64 {
        self.state.lock().value
    }

    /// Time from the first lock acquisition to the latest release.
    pub fn phase_elapsed(&self) -> Duration {
        self.state.lock().phase_elapsed
    }

    pub fn acquisitions(&self) -> u64 {
        self.state.lock().acquisitions
    }
}
