use std::time::Instant;

use chrono::Utc;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::{BenchError, BenchmarkOutcome, BenchmarkPlan};
use crate::task::{ChainId, ChainRunner, ChainSummary, CompileTask, TaskReport};

/// Progress streamed from workers to the aggregating thread.
#[derive(Debug, Clone)]
pub enum ChainEvent {
    TaskFinished(TaskReport),
    ChainFinished(ChainSummary),
}

/// Runs one [`ChainRunner`] per worker on a fixed-size pool and waits for all
/// of them.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkScheduler {
    plan: BenchmarkPlan,
}

impl BenchmarkScheduler {
    pub fn new(plan: BenchmarkPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> BenchmarkPlan {
        self.plan
    }

    /// One chain per thread, each filled with fresh tasks from `factory`.
    pub fn build_chains<F>(&self, mut factory: F) -> Vec<ChainRunner>
    where
        F: FnMut() -> CompileTask,
    {
        (0..self.plan.threads)
            .map(|idx| {
                let tasks = (0..self.plan.iterations_per_thread).map(|_| factory()).collect();
                ChainRunner::new(ChainId(idx), tasks)
            })
            .collect()
    }

    /// Build the chains and run them. `on_event` is only ever called from the
    /// current thread.
    pub fn run<F, S>(&self, factory: F, on_event: S) -> Result<BenchmarkOutcome, BenchError>
    where
        F: FnMut() -> CompileTask,
        S: FnMut(ChainEvent),
    {
        let chains = self.build_chains(factory);
        self.run_chains(chains, on_event)
    }

    pub fn run_chains<S>(&self, chains: Vec<ChainRunner>, mut on_event: S) -> Result<BenchmarkOutcome, BenchError>
    where
        S: FnMut(ChainEvent),
    {
        let plan = self.plan;
        info!(
            requested = plan.requested,
            executed = plan.executed,
            threads = plan.threads,
            per_thread = plan.iterations_per_thread,
            "starting benchmark"
        );
        if plan.dropped() > 0 {
            debug!(dropped = plan.dropped(), "iterations not divisible by thread count");
        }
        if plan.executed == 0 {
            warn!(
                requested = plan.requested,
                threads = plan.threads,
                "fewer iterations than threads; nothing will be compiled"
            );
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(plan.threads)
            .thread_name("rsassc-bench")
            .build()
            .map_err(BenchError::Runtime)?;

        let (tx, mut rx) = mpsc::unbounded_channel::<ChainEvent>();
        let started_at = Utc::now();
        let clock = Instant::now();

        let mut pending = FuturesUnordered::new();
        for mut chain in chains {
            let tx = tx.clone();
            let id = chain.id();
            let handle = runtime.spawn_blocking(move || {
                chain.run_with(|report| {
                    let _ = tx.send(ChainEvent::TaskFinished(report.clone()));
                });
                let summary = chain.summary();
                let _ = tx.send(ChainEvent::ChainFinished(summary.clone()));
                summary
            });
            pending.push(async move { (id, handle.await) });
        }
        drop(tx);

        let mut summaries = Vec::with_capacity(plan.threads);
        let mut events_open = true;
        let joined: Result<(), BenchError> = runtime.block_on(async {
            loop {
                tokio::select! {
                    event = rx.recv(), if events_open => match event {
                        Some(event) => on_event(event),
                        None => events_open = false,
                    },
                    finished = pending.next(), if !pending.is_empty() => {
                        if let Some((id, joined)) = finished {
                            match joined {
                                Ok(summary) => summaries.push(summary),
                                Err(err) => {
                                    return Err(BenchError::WorkerFailed {
                                        chain: id.0,
                                        reason: describe_join_error(err),
                                    });
                                }
                            }
                        }
                    },
                    else => break,
                }
            }
            Ok(())
        });

        if let Err(err) = joined {
            // Remaining chains cannot be interrupted mid-compile; leave them behind.
            runtime.shutdown_background();
            return Err(err);
        }
        let wall_clock = clock.elapsed();

        summaries.sort_by_key(|summary| summary.chain);
        let total = summaries.iter().map(|summary| summary.elapsed).sum();
        let failures = summaries.iter().map(|summary| summary.failures).sum();

        Ok(BenchmarkOutcome {
            plan,
            total,
            wall_clock,
            failures,
            chains: summaries,
            started_at,
        })
    }
}

fn describe_join_error(err: JoinError) -> String {
    if !err.is_panic() {
        return "worker was cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", msg)
    } else {
        "worker panicked".to_string()
    }
}
