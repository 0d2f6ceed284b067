use std::{fmt, path::PathBuf, time::Duration};

use enum_dispatch::enum_dispatch;
use libstress::{
    clock::PhaseClock,
    counter::{IncrementStep, SharedCounter},
    equation::Coordinate,
    handshake::Handshake,
};

use super::{error::BenchError, replicator::FileReplicator};

mod bulk_parallel;
mod serial;
mod thread_per_unit;

pub use bulk_parallel::BulkParallel;
pub use serial::Serial;
pub use thread_per_unit::ThreadPerUnit;

/// Amount of work every strategy performs in one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    /// Equation points exchanged through the handshake.
    pub points: u32,
    /// Counter steps summed over all workers.
    pub increments: u64,
    /// Counter workers of the thread-per-unit strategy.
    pub fanout: usize,
    pub step: IncrementStep,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            points: 200_000,
            increments: 100_000_000,
            fanout: 100,
            step: IncrementStep::default(),
        }
    }
}

impl Workload {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.fanout == 0 {
            return Err(BenchError::Config("fan-out must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Steps given to each of `workers` workers. The remainder of an uneven
    /// split is dropped.
    pub fn per_worker(&self, workers: usize) -> u64 {
        self.increments / workers as u64
    }

    pub fn expected_counter(&self, workers: usize) -> u64 {
        self.step
            .expected(workers as u64, self.per_worker(workers))
    }
}

/// State of one trial. Built fresh for every trial, which is the reset of
/// the counter and the coordinate; shared by reference with every task.
pub struct TrialContext<'a> {
    pub index: usize,
    pub workload: &'a Workload,
    pub replicator: &'a FileReplicator,
    pub trial_dir: PathBuf,
    pub clock: PhaseClock,
    pub origin: Coordinate,
    pub counter: SharedCounter,
    pub handshake: Handshake,
}

impl<'a> TrialContext<'a> {
    pub fn new(
        index: usize,
        workload: &'a Workload,
        replicator: &'a FileReplicator,
        trial_dir: PathBuf,
        clock: PhaseClock,
    ) -> Self {
        let origin = Coordinate::origin(workload.points);
        Self {
            index,
            workload,
            replicator,
            trial_dir,
            counter: SharedCounter::new(clock.clone()),
            handshake: Handshake::new(origin),
            clock,
            origin,
        }
    }
}

/// Phase timings and final values of one strategy run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyOutcome {
    pub counter_time: Duration,
    pub equation_time: Duration,
    pub file_time: Duration,
    pub counter: u64,
    pub coordinate: Coordinate,
}

#[enum_dispatch]
pub trait Strategy {
    fn run(&self, ctx: &TrialContext<'_>) -> Result<StrategyOutcome, BenchError>;

    /// Number of workers splitting the counter increments.
    fn counter_workers(&self, workload: &Workload) -> usize;
}

#[enum_dispatch(Strategy)]
#[derive(Debug, Clone, Copy)]
pub enum ExecutionStrategy {
    Serial(Serial),
    ThreadPerUnit(ThreadPerUnit),
    BulkParallel(BulkParallel),
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(_) => write!(f, "serial"),
            Self::ThreadPerUnit(_) => write!(f, "thread-per-unit"),
            Self::BulkParallel(_) => write!(f, "bulk-parallel"),
        }
    }
}
