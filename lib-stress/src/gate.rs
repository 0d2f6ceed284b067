use parking_lot::{Condvar, Mutex};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// One-shot gate holding spawned tasks until the whole fan-out exists.
///
/// Tasks call [`StartGate::wait`]; it returns `true` once the gate opens and
/// `false` if it was aborted, in which case the task must return without
/// touching shared trial state.
#[derive(Debug)]
pub struct StartGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
            cond: Condvar::new(),
        }
    }

    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while *state == GateState::Closed {
            self.cond.wait(&mut state);
        }
        *state == GateState::Open
    }

    pub fn open(&self) {
        self.settle(GateState::Open);
    }

    pub fn abort(&self) {
        self.settle(GateState::Aborted);
    }

    fn settle(&self, to: GateState) {
        let mut state = self.state.lock();
        if *state == GateState::Closed {
            *state = to;
            drop(state);
            trace!(?to, "start gate settled, releasing waiters");
            self.cond.notify_all();
        }
    }
}
