//! Core of `rsassc`: timed Sass compile tasks, sequential benchmark chains,
//! the multi-threaded benchmark scheduler and result formatting.
//!
//! The style-sheet engine itself sits behind [`compiler::StyleCompiler`].

pub mod bench;
pub mod compiler;
pub mod report;
pub mod task;

pub use bench::{BenchError, BenchmarkOutcome, BenchmarkPlan, BenchmarkScheduler, ChainEvent};
pub use compiler::{CompilationResult, CompileOptions, GrassCompiler, OutputStyle, StyleCompiler};
pub use task::{ChainRunner, CompileInput, CompileRunner, CompileTask, TaskReport, TaskStatus};
