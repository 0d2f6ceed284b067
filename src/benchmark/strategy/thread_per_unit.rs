use std::thread;

use core_affinity::CoreId;
use libstress::gate::StartGate;
use tracing::debug;

use crate::benchmark::task_group::TaskGroup;

use super::{BenchError, Strategy, StrategyOutcome, TrialContext, Workload};

/// Stress pattern: one thread per counter unit contending on the counter
/// lock, a producer/consumer pair on the handshake and one file thread, all
/// released at once.
#[derive(Debug, Clone, Copy)]
pub struct ThreadPerUnit {
    pub fanout: usize,
    /// Pin counter worker `i` to core `i % cpus`.
    pub cpus: Option<usize>,
}

impl ThreadPerUnit {
    pub fn new(fanout: usize, cpus: Option<usize>) -> Self {
        Self { fanout, cpus }
    }
}

impl Strategy for ThreadPerUnit {
    fn run(&self, ctx: &TrialContext<'_>) -> Result<StrategyOutcome, BenchError> {
        let workload = ctx.workload;
        let per_worker = workload.per_worker(self.fanout);
        let step = workload.step;
        let cpus = self.cpus.filter(|cpus| *cpus > 0);

        let gate = StartGate::new();

        let (coordinate, equation_time, file_time) = thread::scope(|s| -> Result<_, BenchError> {
            let mut group = TaskGroup::new(s, &gate);

            let consumer = group.spawn("consumer".to_owned(), move || {
                ctx.clock
                    .time(|| ctx.handshake.run_consumer(workload.points))
            })?;
            let producer = group.spawn("producer".to_owned(), move || {
                ctx.handshake.run_producer(workload.points)
            })?;
            let replicator = group.spawn("replicator".to_owned(), move || {
                ctx.replicator.replicate(&ctx.trial_dir)
            })?;

            let workers = (0..self.fanout)
                .map(|id| {
                    group.spawn(format!("counter-{}", id), move || {
                        if let Some(cpus) = cpus {
                            core_affinity::set_for_current(CoreId { id: id % cpus });
                        }
                        ctx.counter.increment(per_worker, step);
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            debug!(trial = ctx.index, tasks = group.spawned(), "releasing thread-per-unit group");
            group.start();

            for worker in workers {
                worker.join()?;
            }
            producer.join()?;
            let (coordinate, equation_time) = consumer.join()?;
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
        self.fanout
    }
}
