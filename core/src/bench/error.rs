use std::fmt;

/// Failures that abort a whole benchmark.
///
/// Compilation errors are not here: they are recorded per task and never
/// stop a run.
#[derive(Debug)]
pub enum BenchError {
    /// The pool needs at least one worker.
    InvalidThreadCount(usize),
    /// The worker pool could not be created.
    Runtime(std::io::Error),
    /// A worker panicked or was cancelled before its chain completed.
    WorkerFailed { chain: usize, reason: String },
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::InvalidThreadCount(n) => {
                write!(f, "benchmark needs at least one thread (got {})", n)
            }
            BenchError::Runtime(err) => write!(f, "failed to start benchmark worker pool: {}", err),
            BenchError::WorkerFailed { chain, reason } => {
                write!(f, "benchmark worker for chain {} failed: {}", chain, reason)
            }
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Runtime(err) => Some(err),
            _ => None,
        }
    }
}
