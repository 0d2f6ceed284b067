use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use csv::Writer;
use histo::Histogram;
use itertools::{Itertools, MinMaxResult};
use libstress::clock::{as_millis_f64, PhaseClock};
use tracing::{info, warn};

use super::{
    driver::ExperimentDriver,
    error::BenchError,
    helper::create_writer,
    records::TrialReport,
    replicator::FileReplicator,
    strategy::{ExecutionStrategy, Strategy, Workload},
};

/// Repeats trials of one strategy and appends one log row per trial.
pub struct Bencher {
    strategy: ExecutionStrategy,
    workload: Workload,
    trials: usize,
    input: PathBuf,
    copies: usize,
    output_path: Box<Path>,
    prefix: String,
    screening: bool,
    verbose: bool,
}

impl Bencher {
    pub fn new(
        strategy: ExecutionStrategy,
        workload: Workload,
        trials: usize,
        input: PathBuf,
        copies: usize,
        output_path: Box<Path>,
        prefix: String,
        screening: bool,
        verbose: bool,
    ) -> Self {
        Self {
            strategy,
            workload,
            trials,
            input,
            copies,
            output_path,
            prefix,
            screening,
            verbose,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_path.join(format!("{}.csv", self.strategy))
    }

    pub fn trial_root(&self) -> PathBuf {
        self.output_path.join(self.strategy.to_string())
    }

    pub fn benchmark(&self) -> Result<Vec<TrialReport>, BenchError> {
        self.workload.validate()?;

        let workers = self.strategy.counter_workers(&self.workload);
        if self.workload.increments % workers as u64 != 0 {
            warn!(
                increments = self.workload.increments,
                workers,
                "increments do not split evenly, the remainder is dropped"
            );
        }

        let log_path = self.log_path();
        let log_error = |source| BenchError::Log {
            path: log_path.clone(),
            source,
        };

        let clock = PhaseClock::new();
        let run_start = clock.now();

        let mut writer = create_writer(&log_path).map_err(log_error)?;

        let driver = ExperimentDriver::new(
            self.strategy,
            self.workload,
            FileReplicator::new(&self.input, self.copies, clock.clone()),
            self.trial_root(),
            self.prefix.clone(),
            clock,
            run_start,
        );

        info!(
            strategy = %self.strategy,
            trials = self.trials,
            log = %log_path.display(),
            "Start benchmark"
        );

        let reports = match self.run_trials(&driver, &mut writer) {
            Ok(reports) => reports,
            Err(e) => {
                // keep every record written so far
                if let Err(flush) = writer.flush() {
                    warn!("failed to flush trial log: {}", flush);
                }
                return Err(e);
            }
        };

        writer.flush().map_err(|e| log_error(e.into()))?;

        self.summarize(&reports);

        Ok(reports)
    }

    fn run_trials(
        &self,
        driver: &ExperimentDriver,
        writer: &mut Writer<File>,
    ) -> Result<Vec<TrialReport>, BenchError> {
        let log_error = |source| BenchError::Log {
            path: self.log_path(),
            source,
        };

        let mut reports = Vec::with_capacity(self.trials);

        for trial in 0..self.trials {
            let report = driver.run_trial(trial)?;

            writer.serialize(report.timing).map_err(log_error)?;
            writer.flush().map_err(|e| log_error(e.into()))?;

            if self.screening {
                println!("{}", report);
            }

            reports.push(report);
        }

        Ok(reports)
    }

    fn summarize(&self, reports: &[TrialReport]) {
        let iteration_times = reports
            .iter()
            .map(|r| r.timing.iteration_time)
            .collect::<Vec<_>>();

        let (min, max) = match iteration_times.iter().minmax() {
            MinMaxResult::NoElements => return,
            MinMaxResult::OneElement(t) => (*t, *t),
            MinMaxResult::MinMax(min, max) => (*min, *max),
        };
        let mean = iteration_times.iter().sum::<Duration>() / iteration_times.len() as u32;

        info!(
            strategy = %self.strategy,
            trials = reports.len(),
            mean_ms = as_millis_f64(mean),
            min_ms = as_millis_f64(min),
            max_ms = as_millis_f64(max),
            "Finish benchmark"
        );

        if self.verbose {
            let mut histogram = Histogram::with_buckets(5);
            for time in iteration_times.iter() {
                histogram.add(time.as_millis() as u64);
            }

            println!("{}", histogram);
        }
    }
}
