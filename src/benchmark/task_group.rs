use std::thread::{self, Scope, ScopedJoinHandle};

use libstress::gate::StartGate;
use tracing::warn;

use super::error::BenchError;

/// Bounded set of named threads released together through a [`StartGate`].
///
/// If any spawn fails the gate is aborted, so every task spawned so far
/// returns without running and the scope can join them.
pub struct TaskGroup<'scope, 'env> {
    scope: &'scope Scope<'scope, 'env>,
    gate: &'env StartGate,
    spawned: usize,
}

pub struct Task<'scope, T> {
    name: String,
    handle: ScopedJoinHandle<'scope, Option<T>>,
}

impl<'scope, 'env> TaskGroup<'scope, 'env> {
    pub fn new(scope: &'scope Scope<'scope, 'env>, gate: &'env StartGate) -> Self {
        Self {
            scope,
            gate,
            spawned: 0,
        }
    }

    pub fn spawn<F, T>(&mut self, name: String, f: F) -> Result<Task<'scope, T>, BenchError>
    where
        F: FnOnce() -> T + Send + 'scope,
        T: Send + 'scope,
    {
        let gate = self.gate;
        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn_scoped(self.scope, move || gate.wait().then(f));

        match spawned {
            Ok(handle) => {
                self.spawned += 1;
                Ok(Task { name, handle })
            }
            Err(source) => {
                warn!(worker = %name, spawned = self.spawned, "spawn failed, releasing the group");
                self.gate.abort();
                Err(BenchError::Spawn { name, source })
            }
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Lets every spawned task run.
    pub fn start(&self) {
        self.gate.open();
    }
}

impl<'scope, T> Task<'scope, T> {
    /// Maps a panic or an aborted start to an error.
    ///
    /// A panicking handshake task is not recovered: its partner stays blocked
    /// on the handshake, and the enclosing scope waits for it forever.
    pub fn join(self) -> Result<T, BenchError> {
        match self.handle.join() {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(BenchError::Aborted(self.name)),
            Err(_) => Err(BenchError::WorkerPanicked(self.name)),
        }
    }
}
