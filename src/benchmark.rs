use std::fs::create_dir_all;

use strum::IntoEnumIterator;
use tracing::info;

use crate::command_parser::{strategy_target::StrategyTarget, GlobalOpts};

use self::{bencher::Bencher, error::BenchError, records::TrialReport};

pub mod bencher;
pub mod driver;
pub mod error;
pub mod helper;
pub mod records;
pub mod replicator;
pub mod strategy;
pub mod task_group;

/// Runs `target`, or every strategy in turn when none is given.
pub fn benchmark(
    target: Option<StrategyTarget>,
    options: &GlobalOpts,
) -> Result<Vec<(StrategyTarget, Vec<TrialReport>)>, BenchError> {
    let targets = match target {
        Some(t) => vec![t],
        None => StrategyTarget::iter().collect(),
    };

    let workload = options.workload();
    workload.validate()?;

    create_dir_all(&options.output_path).map_err(|source| BenchError::CreateDir {
        path: options.output_path.clone(),
        source,
    })?;

    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let bencher = Bencher::new(
            target.to_strategy(options),
            workload,
            options.trials,
            options.input.clone(),
            options.copies,
            options.output_path.clone().into_boxed_path(),
            options.prefix.clone(),
            !options.quiet,
            options.verbose,
        );

        let reports = bencher.benchmark()?;
        info!("{} finished", target);

        results.push((target, reports));
    }

    Ok(results)
}
