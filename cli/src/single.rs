use std::io::Write;

use anyhow::Context;
use rsassc_core::report::format_single_run;
use rsassc_core::{CompileOptions, CompileRunner, CompileTask};

use crate::{Destinations, compile_input};

/// Compile once and write the CSS (and source map). Returns the exit code.
pub(crate) fn run_once(dest: &Destinations, options: CompileOptions) -> anyhow::Result<i32> {
    let input = compile_input(dest)?;
    let mut task = CompileTask::with_grass(input, options);
    task.run();

    let elapsed = task.elapsed().unwrap_or_default();
    let result = task.into_result().context("compile task produced no result")?;
    let status_line = format_single_run(&result, elapsed);

    if !result.is_success() {
        eprintln!("{}", status_line);
        return Ok(1);
    }

    let css = result.css.unwrap_or_default();
    match &dest.output {
        Some(path) => {
            println!("{}", status_line);
            std::fs::write(path, css.as_bytes())
                .with_context(|| format!("Failed to write CSS to '{}'", path.display()))?;
        }
        None => {
            eprintln!("{}", status_line);
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(css.as_bytes()).context("Failed to write CSS to stdout")?;
            if !css.ends_with('\n') {
                stdout.write_all(b"\n").context("Failed to write CSS to stdout")?;
            }
        }
    }

    if let (Some(map_path), Some(map)) = (&dest.source_map, &result.source_map) {
        std::fs::write(map_path, map.as_bytes())
            .with_context(|| format!("Failed to write source map to '{}'", map_path.display()))?;
    }

    Ok(0)
}
