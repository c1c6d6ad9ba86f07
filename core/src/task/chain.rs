use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::{ChainId, CompileRunner, CompileTask, TaskId};
use crate::compiler::CompilationResult;

/// How a single task in a chain ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    Succeeded,
    Failed {
        code: i32,
        message: Option<String>,
        detail: Option<String>,
    },
}

/// Status of one finished task, emitted by a chain after every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub chain: ChainId,
    pub task: TaskId,
    pub elapsed: Duration,
    pub status: TaskStatus,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Succeeded)
    }
}

/// Totals of a finished chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub chain: ChainId,
    pub tasks: usize,
    pub failures: usize,
    /// Sum of the task durations, not the wall-clock span of the chain.
    pub elapsed: Duration,
}

/// Runs its tasks in insertion order on the calling thread.
///
/// A failing task never stops the chain. The chain's time is the sum of its
/// tasks' times and its result is whatever the last task produced.
#[derive(Debug)]
pub struct ChainRunner {
    id: ChainId,
    tasks: Vec<CompileTask>,
    elapsed: Option<Duration>,
    last: Option<usize>,
    failures: usize,
}

impl ChainRunner {
    pub fn new(id: ChainId, tasks: Vec<CompileTask>) -> Self {
        Self {
            id,
            tasks,
            elapsed: None,
            last: None,
            failures: 0,
        }
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[CompileTask] {
        &self.tasks
    }

    /// Run every task, calling `on_report` after each one.
    pub fn run_with<F>(&mut self, mut on_report: F)
    where
        F: FnMut(&TaskReport),
    {
        let mut total = Duration::ZERO;
        self.failures = 0;

        for (idx, task) in self.tasks.iter_mut().enumerate() {
            task.run();

            let elapsed = task.elapsed().unwrap_or_default();
            total += elapsed;
            self.last = Some(idx);

            let status = match task.result() {
                Some(result) if result.is_success() => TaskStatus::Succeeded,
                Some(result) => TaskStatus::Failed {
                    code: result.error_status,
                    message: result.error_message.clone(),
                    detail: result.error_json.clone(),
                },
                None => TaskStatus::Failed {
                    code: -1,
                    message: Some("compile task produced no result".to_string()),
                    detail: None,
                },
            };
            if !matches!(status, TaskStatus::Succeeded) {
                self.failures += 1;
            }

            on_report(&TaskReport {
                chain: self.id,
                task: task.id(),
                elapsed,
                status,
            });
        }

        debug!(chain = %self.id, tasks = self.tasks.len(), failures = self.failures, total_ms = total.as_millis() as u64, "chain finished");
        self.elapsed = Some(total);
    }

    pub fn summary(&self) -> ChainSummary {
        ChainSummary {
            chain: self.id,
            tasks: self.tasks.len(),
            failures: self.failures,
            elapsed: self.elapsed.unwrap_or_default(),
        }
    }
}

impl CompileRunner for ChainRunner {
    fn run(&mut self) {
        self.run_with(|_| {});
    }

    fn result(&self) -> Option<&CompilationResult> {
        self.last.and_then(|idx| self.tasks[idx].result())
    }

    fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}
