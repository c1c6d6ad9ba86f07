use anyhow::Context;
use rsassc_core::report::{format_outcome, format_outcome_json, format_task_report};
use rsassc_core::{BenchmarkPlan, BenchmarkScheduler, ChainEvent, CompileOptions, CompileTask};

use crate::{Destinations, compile_input};

/// Run the benchmark. Only timing is produced; no CSS or map is written.
///
/// This thread is the only one that prints: workers hand their reports over
/// through the scheduler.
pub(crate) fn run_bench(
    dest: &Destinations,
    options: CompileOptions,
    iterations: usize,
    threads: usize,
    json: bool,
) -> anyhow::Result<()> {
    let plan = BenchmarkPlan::new(iterations, threads)?;
    let input = compile_input(dest)?;

    let factory = || CompileTask::with_grass(input.clone(), options.clone());
    let outcome = BenchmarkScheduler::new(plan)
        .run(factory, |event| match event {
            ChainEvent::TaskFinished(report) => {
                let line = format_task_report(&report);
                if report.is_success() && !json {
                    println!("{}", line);
                } else {
                    eprintln!("{}", line);
                }
            }
            ChainEvent::ChainFinished(summary) => {
                tracing::debug!(
                    chain = %summary.chain,
                    tasks = summary.tasks,
                    failures = summary.failures,
                    elapsed_ms = summary.elapsed.as_millis() as u64,
                    "chain complete"
                );
            }
        })
        .context("Benchmark aborted")?;

    if json {
        println!("{}", format_outcome_json(&outcome)?);
    } else {
        println!("{}", format_outcome(&outcome));
    }
    Ok(())
}
