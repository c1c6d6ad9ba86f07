use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Context;
use clap::Parser;
use rsassc_core::{CompileInput, CompileOptions, OutputStyle};
use tracing_subscriber::EnvFilter;

mod bench;
mod single;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "rsassc_core=debug,rsassc=info";
const DEFAULT_SOURCE_MAP: &str = "style.css.map";

#[derive(Debug, Parser)]
#[command(
    name = "rsassc",
    author,
    version,
    about = "Compile Sass/SCSS to CSS, or benchmark the compiler",
    long_about = None,
    after_help = "Without IN the stylesheet is read from stdin. Without OUT the CSS is written to stdout."
)]
struct CliArgs {
    /// Input stylesheet
    #[arg(value_name = "IN")]
    input: Option<PathBuf>,

    /// Output CSS file
    #[arg(value_name = "OUT", requires = "input")]
    output: Option<PathBuf>,

    /// Run benchmark with N iterations
    #[arg(short = 'b', long = "bench", value_name = "N")]
    bench: Option<usize>,

    /// Run benchmark with T threads
    #[arg(short = 't', long, value_name = "T", default_value_t = 1, value_parser = parse_thread_count)]
    threads: usize,

    /// Compress (minify) the output
    #[arg(short = 'c', long)]
    compress: bool,

    /// Generate source map (OUT.map, or style.css.map without OUT)
    #[arg(short = 'm', long = "source-map")]
    source_map: bool,

    /// Additional directory searched by @use / @import (repeatable)
    #[arg(short = 'I', long = "load-path", value_name = "DIR")]
    load_paths: Vec<PathBuf>,

    /// Silence @warn and @debug output
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Print the benchmark summary as JSON
    #[arg(long, requires = "bench")]
    json: bool,
}

fn parse_thread_count(raw: &str) -> Result<usize, String> {
    let threads: usize = raw.trim().parse().map_err(|e| format!("invalid thread count '{}': {}", raw, e))?;
    if threads == 0 {
        return Err("thread count must be at least 1".to_string());
    }
    Ok(threads)
}

/// Where a compilation reads from and writes to, validated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Destinations {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub source_map: Option<PathBuf>,
}

pub(crate) fn source_map_path(output: Option<&Path>) -> PathBuf {
    match output {
        Some(out) => {
            let mut name: OsString = out.as_os_str().to_owned();
            name.push(".map");
            PathBuf::from(name)
        }
        None => PathBuf::from(DEFAULT_SOURCE_MAP),
    }
}

/// Absolute form of `path` with links and `.`/`..` resolved. OUT may not
/// exist yet, so its parent is resolved instead and the file name re-joined.
fn canonical_target(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = std::fs::canonicalize(path) {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (canonical_target(a), canonical_target(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub(crate) fn resolve_destinations(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    source_map: bool,
) -> anyhow::Result<Destinations> {
    if let (Some(input), Some(output)) = (&input, &output)
        && same_file(input, output)
    {
        anyhow::bail!("Output file '{}' would overwrite the input file", output.display());
    }
    if let Some(output) = &output
        && output.is_dir()
    {
        anyhow::bail!("Output path '{}' is a directory", output.display());
    }
    let source_map = source_map.then(|| source_map_path(output.as_deref()));
    Ok(Destinations {
        input,
        output,
        source_map,
    })
}

impl CliArgs {
    fn compile_options(&self, source_map: Option<PathBuf>) -> CompileOptions {
        CompileOptions::new(OutputStyle::from_compress_flag(self.compress))
            .with_source_map(source_map)
            .with_load_paths(self.load_paths.clone())
            .with_quiet(self.quiet)
    }
}

/// Build the task input. Stdin is read exactly once, here.
pub(crate) fn compile_input(dest: &Destinations) -> anyhow::Result<CompileInput> {
    match &dest.input {
        Some(input) => Ok(CompileInput::file(input.clone(), dest.output.clone())),
        None => {
            let source = std::io::read_to_string(std::io::stdin()).context("Failed to read stylesheet from stdin")?;
            Ok(CompileInput::from_stdin_buffer(source))
        }
    }
}

/// Logging requested through `RSASSC_TRACE`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TraceSetting {
    Off,
    /// `RUST_LOG` if set, else the built-in filter.
    Default,
    Filter(String),
}

impl TraceSetting {
    pub(crate) fn parse(raw: &str) -> Self {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "off" => TraceSetting::Off,
            "1" | "true" | "on" => TraceSetting::Default,
            _ => TraceSetting::Filter(value.to_string()),
        }
    }

    fn env_filter(self) -> Option<EnvFilter> {
        let expr = match self {
            TraceSetting::Off => return None,
            TraceSetting::Default => std::env::var("RUST_LOG").ok(),
            TraceSetting::Filter(expr) => Some(expr),
        };
        let filter = expr
            .and_then(|expr| EnvFilter::try_new(expr).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_TRACE_FILTER));
        Some(filter)
    }
}

fn init_tracing() {
    let Ok(raw) = std::env::var("RSASSC_TRACE") else {
        return;
    };
    let Some(filter) = TraceSetting::parse(&raw).env_filter() else {
        return;
    };
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let dest = resolve_destinations(args.input.clone(), args.output.clone(), args.source_map)?;
    let options = args.compile_options(dest.source_map.clone());

    match args.bench {
        Some(iterations) => bench::run_bench(&dest, options, iterations, args.threads, args.json),
        None => {
            let code = single::run_once(&dest, options)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
