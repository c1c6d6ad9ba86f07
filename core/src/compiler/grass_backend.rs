use std::path::Path;

use serde_json::json;
use tracing::debug;

use super::{CompilationResult, CompileOptions, OutputStyle, STATUS_FILE_ERROR, STATUS_SASS_ERROR, StyleCompiler};

/// [`StyleCompiler`] backed by the pure-Rust `grass` engine.
///
/// The engine options are rebuilt for every call, so an instance carries no
/// state between compilations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassCompiler;

impl GrassCompiler {
    pub fn new() -> Self {
        Self
    }

    fn engine_options(options: &CompileOptions, syntax: grass::InputSyntax) -> grass::Options<'static> {
        let style = match options.output_style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };
        grass::Options::default()
            .style(style)
            .quiet(options.quiet)
            .input_syntax(syntax)
            .load_paths(options.load_paths.as_slice())
    }

    fn finish(
        outcome: Result<String, Box<grass::Error>>,
        input_name: &Path,
        output_name: Option<&Path>,
        options: &CompileOptions,
    ) -> CompilationResult {
        match outcome {
            Ok(css) => match options.source_map.as_deref() {
                Some(map_path) => {
                    let (css, map) = attach_source_map(css, input_name, output_name, map_path);
                    CompilationResult::success(css, Some(map))
                }
                None => CompilationResult::success(css, None),
            },
            Err(err) => {
                let formatted = err.to_string();
                let message = headline(&formatted);
                debug!(input = %input_name.display(), %message, "sass compilation failed");
                let detail = error_json(STATUS_SASS_ERROR, input_name, &message, &formatted);
                CompilationResult::failure(STATUS_SASS_ERROR, message, Some(detail))
            }
        }
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile_file(&self, input: &Path, output: Option<&Path>, options: &CompileOptions) -> CompilationResult {
        let unreadable = match std::fs::metadata(input) {
            Ok(meta) if meta.is_file() => None,
            Ok(_) => Some("not a regular file".to_string()),
            Err(err) => Some(err.to_string()),
        };
        if let Some(reason) = unreadable {
            let message = format!("File to read not found or unreadable: {} ({})", input.display(), reason);
            let detail = error_json(STATUS_FILE_ERROR, input, &message, &message);
            return CompilationResult::failure(STATUS_FILE_ERROR, message, Some(detail));
        }
        let engine = Self::engine_options(options, syntax_for(input));
        Self::finish(grass::from_path(input, &engine), input, output, options)
    }

    fn compile_string(
        &self,
        source: &str,
        input_name: &Path,
        output_name: &Path,
        options: &CompileOptions,
    ) -> CompilationResult {
        let engine = Self::engine_options(options, syntax_for(input_name));
        Self::finish(
            grass::from_string(source.to_owned(), &engine),
            input_name,
            Some(output_name),
            options,
        )
    }
}

fn syntax_for(path: &Path) -> grass::InputSyntax {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("sass") => grass::InputSyntax::Sass,
        Some(ext) if ext.eq_ignore_ascii_case("css") => grass::InputSyntax::Css,
        _ => grass::InputSyntax::Scss,
    }
}

/// First line of an engine diagnostic without the `Error: ` prefix.
fn headline(formatted: &str) -> String {
    let first = formatted.lines().next().unwrap_or_default().trim();
    first.strip_prefix("Error: ").unwrap_or(first).to_string()
}

fn error_json(status: i32, file: &Path, message: &str, formatted: &str) -> String {
    json!({
        "status": status,
        "file": file.display().to_string(),
        "message": message,
        "formatted": formatted,
    })
    .to_string()
}

/// Build a v3 source map for `css` and append the `sourceMappingURL` comment.
///
/// The engine does not track mappings, so the map names its source and output
/// but carries an empty `mappings` string.
fn attach_source_map(mut css: String, input: &Path, output: Option<&Path>, map_path: &Path) -> (String, String) {
    let file = output
        .and_then(|out| out.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdout".to_string());
    let map = json!({
        "version": 3,
        "file": file,
        "sources": [input.display().to_string()],
        "names": [],
        "mappings": "",
    });

    let same_dir = output.map(|out| out.parent() == map_path.parent()).unwrap_or(false);
    let url = match map_path.file_name() {
        Some(name) if same_dir => name.to_string_lossy().into_owned(),
        _ => map_path.display().to_string(),
    };
    if !css.is_empty() && !css.ends_with('\n') {
        css.push('\n');
    }
    css.push_str(&format!("/*# sourceMappingURL={} */", url));
    (css, map.to_string())
}
