use std::thread;

use libstress::{gate::StartGate, handshake::run_inline};

use crate::benchmark::task_group::TaskGroup;

use super::{BenchError, Strategy, StrategyOutcome, TrialContext, Workload};

/// One thread per phase: a single counter worker, the equation sequence
/// without handshake blocking, and the file copies, running side by side.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkParallel;

impl Strategy for BulkParallel {
    fn run(&self, ctx: &TrialContext<'_>) -> Result<StrategyOutcome, BenchError> {
        let workload = ctx.workload;
        let gate = StartGate::new();

        let (coordinate, equation_time, file_time) = thread::scope(|s| -> Result<_, BenchError> {
            let mut group = TaskGroup::new(s, &gate);

            let counter = group.spawn("counter".to_owned(), move || {
                ctx.counter.increment(workload.increments, workload.step)
            })?;
            let equation = group.spawn("equation".to_owned(), move || {
                let mut cord = ctx.origin;
                ctx.clock.time(|| run_inline(&mut cord, workload.points))
            })?;
            let replicator = group.spawn("replicator".to_owned(), move || {
                ctx.replicator.replicate(&ctx.trial_dir)
            })?;

            group.start();

            counter.join()?;
            let (coordinate, equation_time) = equation.join()?;
            let file_time = replicator.join()??;

            Ok((coordinate, equation_time, file_time))
        })?;

        Ok(StrategyOutcome {
            counter_time: ctx.counter.phase_elapsed(),
            equation_time,
            file_time,
            counter: ctx.counter.value(),
            coordinate,
        })
    }

    fn counter_workers(&self, _: &Workload) -> usize {
        1
    }
}
