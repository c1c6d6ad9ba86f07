//! The seam between the harness and the style-sheet engine.
//!
//! Everything the harness knows about compiling Sass goes through
//! [`StyleCompiler`]. Implementations never fail at the type level: a broken
//! stylesheet or an unreadable file is reported as a [`CompilationResult`]
//! with a nonzero status so that benchmark chains can keep running.

mod grass_backend;
#[cfg(test)]
mod grass_backend_test;

pub use grass_backend::GrassCompiler;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status used for errors raised by the engine while compiling.
pub const STATUS_SASS_ERROR: i32 = 1;
/// Status used when the input file could not be read.
pub const STATUS_FILE_ERROR: i32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

impl OutputStyle {
    pub fn from_compress_flag(compress: bool) -> Self {
        if compress {
            OutputStyle::Compressed
        } else {
            OutputStyle::Expanded
        }
    }
}

/// Per-task compiler configuration. Cloned into every task, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub output_style: OutputStyle,
    /// Where the source map will be written. `None` disables source maps.
    pub source_map: Option<PathBuf>,
    /// Extra directories searched by `@use` / `@import`.
    pub load_paths: Vec<PathBuf>,
    /// Silence `@warn` and `@debug`.
    pub quiet: bool,
}

impl CompileOptions {
    pub fn new(output_style: OutputStyle) -> Self {
        Self {
            output_style,
            ..Self::default()
        }
    }

    pub fn with_source_map(mut self, target: Option<PathBuf>) -> Self {
        self.source_map = target;
        self
    }

    pub fn with_load_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.load_paths = paths;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Output of one engine invocation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    pub css: Option<String>,
    pub source_map: Option<String>,
    /// `0` on success, nonzero on failure.
    pub error_status: i32,
    pub error_message: Option<String>,
    /// Machine-readable diagnostic, a JSON document.
    pub error_json: Option<String>,
}

impl CompilationResult {
    pub fn success(css: String, source_map: Option<String>) -> Self {
        Self {
            css: Some(css),
            source_map,
            error_status: 0,
            error_message: None,
            error_json: None,
        }
    }

    pub fn failure(status: i32, message: impl Into<String>, json: Option<String>) -> Self {
        debug_assert!(status != 0, "failure results need a nonzero status");
        Self {
            css: None,
            source_map: None,
            error_status: status,
            error_message: Some(message.into()),
            error_json: json,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_status == 0
    }
}

/// A style-sheet engine. Instances are owned by a single task and may be moved
/// to a worker thread, but are never used from two threads at once.
pub trait StyleCompiler: Send {
    /// Compile the file at `input`. `output` is where the caller intends to
    /// write the CSS; it is only used to name things (source maps), never
    /// written to.
    fn compile_file(&self, input: &Path, output: Option<&Path>, options: &CompileOptions) -> CompilationResult;

    /// Compile in-memory source text. `input_name` and `output_name` are
    /// synthetic names used in diagnostics and source maps.
    fn compile_string(
        &self,
        source: &str,
        input_name: &Path,
        output_name: &Path,
        options: &CompileOptions,
    ) -> CompilationResult;
}
