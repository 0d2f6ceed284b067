use libstress::{counter::add_then_subtract, handshake::run_inline};

use super::{BenchError, Strategy, StrategyOutcome, TrialContext, Workload};

/// Baseline: every phase in turn on the calling thread, no locks taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl Strategy for Serial {
    fn run(&self, ctx: &TrialContext<'_>) -> Result<StrategyOutcome, BenchError> {
        let workload = ctx.workload;

        let mut counter = 0u64;
        let ((), counter_time) = ctx
            .clock
            .time(|| add_then_subtract(&mut counter, workload.increments, workload.step));

        let mut cord = ctx.origin;
        let (coordinate, equation_time) =
            ctx.clock.time(|| run_inline(&mut cord, workload.points));

        let file_time = ctx.replicator.replicate(&ctx.trial_dir)?;

        Ok(StrategyOutcome {
            counter_time,
            equation_time,
            file_time,
            counter,
            coordinate,
        })
    }

    fn counter_workers(&self, _: &Workload) -> usize {
        1
    }
}
