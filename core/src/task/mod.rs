//! Timed compile units.
//!
//! A [`CompileTask`] wraps exactly one engine call; a [`ChainRunner`] runs a
//! list of tasks back to back on the calling thread. Both expose the same
//! [`CompileRunner`] capability so callers can time either one.

mod chain;
mod compile;

#[cfg(test)]
mod chain_test;
#[cfg(test)]
mod compile_test;

pub use chain::*;
pub use compile::*;

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::compiler::CompilationResult;

/// Something that compiles and remembers how long it took.
pub trait CompileRunner {
    /// Execute. Compilation failures are recorded, never returned.
    fn run(&mut self);

    /// The most recent result, `None` until the runner has produced one.
    fn result(&self) -> Option<&CompilationResult>;

    /// Measured execution time, `None` until the runner has run.
    fn elapsed(&self) -> Option<Duration>;
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`CompileTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a chain within one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChainId(pub usize);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
