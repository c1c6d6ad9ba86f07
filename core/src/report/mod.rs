//! Human-readable (and JSON) rendering of compile and benchmark results.
//!
//! Everything here is pure: callers decide which stream a line goes to.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::bench::BenchmarkOutcome;
use crate::compiler::CompilationResult;
use crate::task::{TaskReport, TaskStatus};

fn millis(duration: Duration) -> u128 {
    duration.as_millis()
}

fn push_error_lines(out: &mut String, message: Option<&str>, detail: Option<&str>) {
    if let Some(message) = message {
        out.push('\n');
        out.push_str(message);
    }
    if let Some(detail) = detail {
        out.push('\n');
        out.push_str(detail);
    }
}

/// Status line for one task of a benchmark chain.
pub fn format_task_report(report: &TaskReport) -> String {
    match &report.status {
        TaskStatus::Succeeded => format!(
            "Compiler {} finished after {} milliseconds",
            report.task,
            millis(report.elapsed)
        ),
        TaskStatus::Failed { message, detail, .. } => {
            let mut out = format!("Compiler {} failed after {} milliseconds", report.task, millis(report.elapsed));
            push_error_lines(&mut out, message.as_deref(), detail.as_deref());
            out
        }
    }
}

/// Status line for a single (non-benchmark) compilation.
pub fn format_single_run(result: &CompilationResult, elapsed: Duration) -> String {
    if result.is_success() {
        return format!("Compilation finished after {} milliseconds", millis(elapsed));
    }
    let mut out = format!("Compilation failed after {} milliseconds", millis(elapsed));
    push_error_lines(&mut out, result.error_message.as_deref(), result.error_json.as_deref());
    out
}

/// Summary block printed at the end of a benchmark.
pub fn format_outcome(outcome: &BenchmarkOutcome) -> String {
    let total_ms = millis(outcome.total);
    let seconds = total_ms / 1000;
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    let average = match outcome.average() {
        Some(avg) => millis(avg).to_string(),
        None => "n/a".to_string(),
    };

    let mut lines = vec![
        "Finished benchmark".to_string(),
        format!("  total {} compilations", outcome.executed()),
        format!("  with {} threads", outcome.threads()),
        format!("  total {} milliseconds / {}:{:02} minutes", total_ms, minutes, seconds),
        format!("  per compilation {} milliseconds", average),
    ];
    if outcome.failures > 0 {
        lines.push(format!("  {} failed compilations", outcome.failures));
    }
    lines.join("\n")
}

pub fn format_outcome_json(outcome: &BenchmarkOutcome) -> Result<String> {
    let mut value = serde_json::to_value(outcome).context("serialize benchmark outcome")?;
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "average_ms".to_string(),
            match outcome.average() {
                Some(avg) => serde_json::json!(avg.as_nanos() as f64 / 1_000_000.0),
                None => serde_json::Value::Null,
            },
        );
        map.insert("total_ms".to_string(), serde_json::json!(outcome.total.as_millis() as u64));
    }
    serde_json::to_string_pretty(&value).context("render benchmark outcome")
}
