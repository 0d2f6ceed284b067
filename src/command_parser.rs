use std::path::PathBuf;

use clap::*;
use libstress::counter::IncrementStep;

use crate::benchmark::strategy::Workload;

use self::strategy_target::StrategyTarget;

pub mod strategy_target;

#[derive(Debug, Parser)]
#[clap(name = "thread stress benchmark", version)]
/// Concurrency overhead benchmark: counter contention, producer/consumer
/// handshake and file replication under serial and threaded strategies
pub struct App {
    #[command(subcommand)]
    pub strategy: Option<StrategyTarget>,
    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Number of sequential trials
    #[arg(global = true, long, short, default_value_t = 100)]
    pub trials: usize,
    /// Counter steps per trial, split across the counter workers
    #[arg(global = true, long, default_value_t = 100_000_000)]
    pub increments: u64,
    /// Equation points per trial
    #[arg(global = true, long, short, default_value_t = 200_000)]
    pub points: u32,
    /// Copies of the input file per trial
    #[arg(global = true, long, default_value_t = 100)]
    pub copies: usize,
    /// Counter workers of the thread-per-unit strategy
    #[arg(global = true, long, short, default_value_t = 100)]
    pub fanout: usize,
    /// Amount added on every counter step
    #[arg(global = true, long, default_value_t = 37)]
    pub add: u64,
    /// Amount subtracted on every counter step
    #[arg(global = true, long, default_value_t = 36)]
    pub sub: u64,
    /// File replicated during the file phase
    #[arg(global = true, long, short, default_value = "gpl.txt")]
    pub input: PathBuf,
    /// Directory receiving the trial logs and copies
    #[arg(global = true, long, short, default_value = "output")]
    pub output_path: PathBuf,
    /// Name prefix of the per-trial directories
    #[arg(global = true, long, default_value = "outfiles")]
    pub prefix: String,
    /// Pin counter workers round-robin onto this many cores
    #[arg(global = true, long, short)]
    pub cpus: Option<usize>,
    /// Do not echo every trial to stdout
    #[arg(global = true, long, short)]
    pub quiet: bool,
    #[arg(global = true, long, short)]
    pub verbose: bool,
}

impl GlobalOpts {
    pub fn workload(&self) -> Workload {
        Workload {
            points: self.points,
            increments: self.increments,
            fanout: self.fanout,
            step: IncrementStep {
                add: self.add,
                sub: self.sub,
            },
        }
    }
}
