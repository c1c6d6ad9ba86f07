use std::time::Duration;

use super::test_support::ScriptedCompiler;
use super::*;
use crate::compiler::CompileOptions;

fn chain_of(len: usize, engine: &ScriptedCompiler) -> ChainRunner {
    let tasks = (0..len)
        .map(|_| {
            CompileTask::new(
                CompileInput::file("a.scss", None),
                CompileOptions::default(),
                Box::new(engine.clone()),
            )
        })
        .collect();
    ChainRunner::new(ChainId(0), tasks)
}

#[test]
fn failing_middle_task_does_not_stop_chain() {
    let engine = ScriptedCompiler::failing_on(&[2]);
    let mut chain = chain_of(3, &engine);
    let mut reports = Vec::new();
    chain.run_with(|report| reports.push(report.clone()));

    assert_eq!(engine.call_count(), 3);
    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_success());
    assert!(!reports[1].is_success());
    assert!(reports[2].is_success());

    match &reports[1].status {
        TaskStatus::Failed { code, message, detail } => {
            assert_eq!(*code, 1);
            assert_eq!(message.as_deref(), Some("call 2 failed"));
            assert_eq!(detail.as_deref(), Some("{\"call\":2}"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let summary = chain.summary();
    assert_eq!(summary.tasks, 3);
    assert_eq!(summary.failures, 1);
}

#[test]
fn reports_follow_insertion_order() {
    let engine = ScriptedCompiler::default();
    let mut chain = chain_of(4, &engine);
    let expected: Vec<TaskId> = chain.tasks().iter().map(|t| t.id()).collect();
    let mut seen = Vec::new();
    chain.run_with(|report| seen.push(report.task));
    assert_eq!(seen, expected);
}

#[test]
fn elapsed_is_sum_of_task_times() {
    let engine = ScriptedCompiler::with_delay(Duration::from_millis(3));
    let mut chain = chain_of(3, &engine);
    chain.run();

    let sum: Duration = chain.tasks().iter().filter_map(|t| t.elapsed()).sum();
    assert_eq!(chain.elapsed(), Some(sum));
    assert!(sum >= Duration::from_millis(9));
}

#[test]
fn result_is_from_last_task_even_when_it_failed() {
    let engine = ScriptedCompiler::failing_on(&[3]);
    let mut chain = chain_of(3, &engine);
    chain.run();

    let last = chain.result().expect("result");
    assert!(!last.is_success());
    assert_eq!(last.error_message.as_deref(), Some("call 3 failed"));
}

#[test]
fn result_is_success_when_only_earlier_task_failed() {
    let engine = ScriptedCompiler::failing_on(&[1]);
    let mut chain = chain_of(2, &engine);
    chain.run();
    assert!(chain.result().expect("result").is_success());
}

#[test]
fn empty_chain_runs_with_zero_time() {
    let mut chain = ChainRunner::new(ChainId(7), Vec::new());
    assert!(chain.is_empty());
    assert!(chain.elapsed().is_none());
    chain.run();
    assert_eq!(chain.elapsed(), Some(Duration::ZERO));
    assert!(chain.result().is_none());
    assert_eq!(chain.summary().chain, ChainId(7));
}
