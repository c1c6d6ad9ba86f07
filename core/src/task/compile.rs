use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{CompileRunner, TaskId};
use crate::compiler::{CompilationResult, CompileOptions, GrassCompiler, StyleCompiler};

pub const STDIN_INPUT_NAME: &str = "source.scss";
pub const STDIN_OUTPUT_NAME: &str = "source.css";

/// What a task compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileInput {
    /// A file on disk. `output` is only used for naming; tasks never write.
    Files { input: PathBuf, output: Option<PathBuf> },
    /// Source captured in memory, compiled under synthetic file names.
    Source {
        source: String,
        input_name: PathBuf,
        output_name: PathBuf,
    },
}

impl CompileInput {
    pub fn file(input: impl Into<PathBuf>, output: Option<PathBuf>) -> Self {
        CompileInput::Files {
            input: input.into(),
            output,
        }
    }

    /// Wrap source read from stdin, named `source.scss` -> `source.css`.
    pub fn from_stdin_buffer(source: impl Into<String>) -> Self {
        CompileInput::Source {
            source: source.into(),
            input_name: PathBuf::from(STDIN_INPUT_NAME),
            output_name: PathBuf::from(STDIN_OUTPUT_NAME),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CompileInput::Files { input, .. } => input.display().to_string(),
            CompileInput::Source { input_name, .. } => input_name.display().to_string(),
        }
    }
}

/// One timed invocation of a [`StyleCompiler`].
///
/// The task owns its engine and options outright, so it can be moved to a
/// worker thread without sharing anything with other tasks.
pub struct CompileTask {
    id: TaskId,
    input: CompileInput,
    options: CompileOptions,
    compiler: Box<dyn StyleCompiler>,
    result: Option<CompilationResult>,
    elapsed: Option<Duration>,
}

impl CompileTask {
    pub fn new(input: CompileInput, options: CompileOptions, compiler: Box<dyn StyleCompiler>) -> Self {
        Self {
            id: TaskId::next(),
            input,
            options,
            compiler,
            result: None,
            elapsed: None,
        }
    }

    /// Task backed by its own [`GrassCompiler`].
    pub fn with_grass(input: CompileInput, options: CompileOptions) -> Self {
        Self::new(input, options, Box::new(GrassCompiler::new()))
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn input(&self) -> &CompileInput {
        &self.input
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn has_run(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Consume the task, handing out its result.
    pub fn into_result(self) -> Option<CompilationResult> {
        self.result
    }

    fn invoke(&self) -> CompilationResult {
        match &self.input {
            CompileInput::Files { input, output } => self.compiler.compile_file(input, output.as_deref(), &self.options),
            CompileInput::Source {
                source,
                input_name,
                output_name,
            } => self
                .compiler
                .compile_string(source, input_name, output_name, &self.options),
        }
    }
}

impl CompileRunner for CompileTask {
    fn run(&mut self) {
        if self.has_run() {
            warn!(task = %self.id, "compile task already executed; keeping first result");
            return;
        }

        let started = Instant::now();
        let result = self.invoke();
        let elapsed = started.elapsed();

        debug!(
            task = %self.id,
            input = %self.input.display_name(),
            status = result.error_status,
            elapsed_ms = elapsed.as_millis() as u64,
            "compile task finished"
        );

        self.result = Some(result);
        self.elapsed = Some(elapsed);
    }

    fn result(&self) -> Option<&CompilationResult> {
        self.result.as_ref()
    }

    fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

impl std::fmt::Debug for CompileTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileTask")
            .field("id", &self.id)
            .field("input", &self.input.display_name())
            .field("options", &self.options)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}
