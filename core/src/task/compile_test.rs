use std::time::Duration;

use super::test_support::ScriptedCompiler;
use super::*;
use crate::compiler::{CompileOptions, OutputStyle};

fn scripted_task(engine: &ScriptedCompiler) -> CompileTask {
    CompileTask::new(
        CompileInput::file("a.scss", None),
        CompileOptions::default(),
        Box::new(engine.clone()),
    )
}

#[test]
fn fresh_task_has_not_run() {
    let task = scripted_task(&ScriptedCompiler::default());
    assert!(!task.has_run());
    assert!(task.result().is_none());
    assert!(task.elapsed().is_none());
}

#[test]
fn run_records_result_and_elapsed_time() {
    let engine = ScriptedCompiler::with_delay(Duration::from_millis(5));
    let mut task = scripted_task(&engine);
    task.run();

    assert!(task.has_run());
    assert!(task.result().expect("result").is_success());
    assert!(task.elapsed().expect("elapsed") >= Duration::from_millis(5));
    assert_eq!(engine.call_count(), 1);
}

#[test]
fn failure_is_recorded_not_propagated() {
    let engine = ScriptedCompiler::failing_on(&[1]);
    let mut task = scripted_task(&engine);
    task.run();

    let result = task.result().expect("result");
    assert!(!result.is_success());
    assert_eq!(result.error_message.as_deref(), Some("call 1 failed"));
    assert!(task.elapsed().is_some());
}

#[test]
fn second_run_keeps_first_result() {
    let engine = ScriptedCompiler::failing_on(&[2]);
    let mut task = scripted_task(&engine);
    task.run();
    let first_elapsed = task.elapsed();
    task.run();

    assert_eq!(engine.call_count(), 1);
    assert!(task.result().expect("result").is_success());
    assert_eq!(task.elapsed(), first_elapsed);
}

#[test]
fn task_ids_are_unique() {
    let engine = ScriptedCompiler::default();
    let a = scripted_task(&engine);
    let b = scripted_task(&engine);
    assert_ne!(a.id(), b.id());
}

#[test]
fn stdin_buffer_uses_synthetic_names() {
    let input = CompileInput::from_stdin_buffer("a { b: c }");
    match &input {
        CompileInput::Source {
            source,
            input_name,
            output_name,
        } => {
            assert_eq!(source, "a { b: c }");
            assert_eq!(input_name.to_str(), Some(STDIN_INPUT_NAME));
            assert_eq!(output_name.to_str(), Some(STDIN_OUTPUT_NAME));
        }
        other => panic!("expected in-memory source, got {other:?}"),
    }
    assert_eq!(input.display_name(), "source.scss");
}

#[test]
fn grass_task_compiles_in_memory_source() {
    let mut task = CompileTask::with_grass(
        CompileInput::from_stdin_buffer(".a { .b { color: red; } }"),
        CompileOptions::new(OutputStyle::Compressed),
    );
    task.run();
    let css = task.into_result().and_then(|r| r.css).expect("css");
    assert_eq!(css.trim(), ".a .b{color:red}");
}
