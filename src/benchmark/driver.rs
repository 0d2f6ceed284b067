use std::{fs::create_dir_all, path::PathBuf};

use libstress::clock::PhaseClock;
use quanta::Instant;
use tracing::debug;

use super::{
    error::BenchError,
    records::{TimingRecord, TrialReport},
    replicator::FileReplicator,
    strategy::{ExecutionStrategy, Strategy, TrialContext, Workload},
};

/// Runs single trials of one strategy and times them.
pub struct ExperimentDriver {
    strategy: ExecutionStrategy,
    workload: Workload,
    replicator: FileReplicator,
    trial_root: PathBuf,
    prefix: String,
    clock: PhaseClock,
    run_start: Instant,
}

impl ExperimentDriver {
    /// `run_start` is the reference point of every record's elapsed time.
    pub fn new(
        strategy: ExecutionStrategy,
        workload: Workload,
        replicator: FileReplicator,
        trial_root: PathBuf,
        prefix: String,
        clock: PhaseClock,
        run_start: Instant,
    ) -> Self {
        Self {
            strategy,
            workload,
            replicator,
            trial_root,
            prefix,
            clock,
            run_start,
        }
    }

    pub fn trial_dir(&self, index: usize) -> PathBuf {
        self.trial_root.join(format!("{}{}", self.prefix, index))
    }

    pub fn run_trial(&self, index: usize) -> Result<TrialReport, BenchError> {
        let trial_start = self.clock.now();

        let trial_dir = self.trial_dir(index);
        let ctx = TrialContext::new(
            index,
            &self.workload,
            &self.replicator,
            trial_dir.clone(),
            self.clock.clone(),
        );

        create_dir_all(&trial_dir).map_err(|source| BenchError::CreateDir {
            path: trial_dir,
            source,
        })?;

        let outcome = self.strategy.run(&ctx)?;

        let now = self.clock.now();
        let timing = TimingRecord {
            elapsed_time: now.duration_since(self.run_start),
            iteration_time: now.duration_since(trial_start),
            counter_time: outcome.counter_time,
            equation_time: outcome.equation_time,
            file_time: outcome.file_time,
        };

        debug!(
            trial = index,
            strategy = %self.strategy,
            counter = outcome.counter,
            x = outcome.coordinate.x,
            y = outcome.coordinate.y,
            z = outcome.coordinate.z,
            "trial finished"
        );

        Ok(TrialReport {
            trial: index,
            timing,
            counter: outcome.counter,
            coordinate: outcome.coordinate,
        })
    }
}
