use clap::Subcommand;
use strum::{Display, EnumIter};

use crate::benchmark::strategy::{BulkParallel, ExecutionStrategy, Serial, ThreadPerUnit};

use super::GlobalOpts;

#[derive(Debug, Subcommand, EnumIter, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyTarget {
    /// Benchmark every phase one after another on one thread
    Serial,
    /// Benchmark one thread per counter unit plus handshake and file threads
    ThreadPerUnit,
    /// Benchmark one thread per phase
    BulkParallel,
}

impl StrategyTarget {
    pub fn to_strategy(&self, options: &GlobalOpts) -> ExecutionStrategy {
        match self {
            StrategyTarget::Serial => Serial.into(),
            StrategyTarget::ThreadPerUnit => ThreadPerUnit::new(options.fanout, options.cpus).into(),
            StrategyTarget::BulkParallel => BulkParallel.into(),
        }
    }
}
