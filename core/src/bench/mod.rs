//! Multi-threaded benchmark scheduling.
//!
//! The requested iteration count is split evenly across a fixed pool of
//! workers. Every worker owns one [`ChainRunner`](crate::task::ChainRunner)
//! for the whole run; the calling thread only aggregates.

mod error;
mod scheduler;


pub use error::BenchError;
pub use scheduler::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::task::ChainSummary;

/// How a benchmark request maps onto workers.
///
/// `executed` is `requested` rounded down to a multiple of `threads`; the
/// remainder is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BenchmarkPlan {
    pub requested: usize,
    pub threads: usize,
    pub iterations_per_thread: usize,
    pub executed: usize,
}

impl BenchmarkPlan {
    pub fn new(requested: usize, threads: usize) -> Result<Self, BenchError> {
        if threads == 0 {
            return Err(BenchError::InvalidThreadCount(threads));
        }
        let iterations_per_thread = requested / threads;
        Ok(Self {
            requested,
            threads,
            iterations_per_thread,
            executed: iterations_per_thread * threads,
        })
    }

    pub fn dropped(&self) -> usize {
        self.requested - self.executed
    }
}

/// Aggregate timing of a finished benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkOutcome {
    pub plan: BenchmarkPlan,
    /// Sum of every chain's summed task time.
    pub total: Duration,
    /// Wall-clock span from submitting the first chain to the barrier.
    pub wall_clock: Duration,
    pub failures: usize,
    pub chains: Vec<ChainSummary>,
    pub started_at: DateTime<Utc>,
}

impl BenchmarkOutcome {
    pub fn executed(&self) -> usize {
        self.plan.executed
    }

    pub fn threads(&self) -> usize {
        self.plan.threads
    }

    /// Mean time per compilation, `None` when nothing ran.
    pub fn average(&self) -> Option<Duration> {
        if self.plan.executed == 0 {
            return None;
        }
        let nanos = self.total.as_nanos() / self.plan.executed as u128;
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }
}
