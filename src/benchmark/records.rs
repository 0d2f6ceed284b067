use std::{fmt, time::Duration};

use libstress::{clock::as_millis_f64, equation::Coordinate};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSecondsWithFrac};

/// Per-trial timings, written as one row of the trial log in milliseconds.
#[serde_as]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimingRecord {
    /// Time since the first trial of the run started.
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub elapsed_time: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub iteration_time: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub counter_time: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub equation_time: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    pub file_time: Duration,
}

impl TimingRecord {
    pub const HEADER: [&'static str; 5] = [
        "ElapsedTime",
        "IterationTime",
        "CounterTime",
        "EquationTime",
        "FileTime",
    ];

    pub fn phases(&self) -> [Duration; 3] {
        [self.counter_time, self.equation_time, self.file_time]
    }
}

impl fmt::Display for TimingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}, {:.3}, {:.3}, {:.3}, {:.3}",
            as_millis_f64(self.elapsed_time),
            as_millis_f64(self.iteration_time),
            as_millis_f64(self.counter_time),
            as_millis_f64(self.equation_time),
            as_millis_f64(self.file_time),
        )
    }
}

/// Everything a trial produced. Only `timing` goes to the log; the final
/// counter and coordinate are kept to compare strategies and reruns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialReport {
    pub trial: usize,
    pub timing: TimingRecord,
    pub counter: u64,
    pub coordinate: Coordinate,
}

impl TrialReport {
    /// Whether both trials computed the same values, timings aside.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.counter == other.counter && self.coordinate.bit_eq(&other.coordinate)
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.trial, self.timing)
    }
}
