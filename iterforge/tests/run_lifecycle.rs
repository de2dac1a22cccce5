//! Lifecycle tests that drive a run through `RunState` and read the
//! persisted documents back from disk.

use std::fs;

use serde_json::Value;

use iterforge::core::config::RunConfig;
use iterforge::core::error::RunError;
use iterforge::core::iteration::{
    ConsoleMessage, EvaluationOutput, GenerationOutput, IterationResult, TestingOutput,
};
use iterforge::core::manifest::StopReason;
use iterforge::core::result::RunStatus;
use iterforge::io::store::{list_runs, load_manifest, load_result};
use iterforge::state::RunState;
use iterforge::test_support::{config_in, iteration};

fn read_json(path: &std::path::Path) -> Value {
    let contents = fs::read_to_string(path).expect("read document");
    serde_json::from_str(&contents).expect("parse document")
}

/// Two iterations, the second passing, then a clean completion.
///
/// Checks the mirrored outcome fields, timing, and that `state.json` and
/// `artifacts/report.json` hold the same document.
#[test]
fn quiz_app_run_completes_after_second_iteration() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = RunConfig::builder("build a quiz app")
        .max_iterations(2)
        .base_dir(temp.path())
        .build()
        .expect("config");
    let mut state = RunState::new(config).expect("state");

    state.add_iteration(iteration(1, 40, false)).expect("iter 1");
    state.add_iteration(iteration(2, 90, true)).expect("iter 2");
    state.complete(RunStatus::Completed).expect("complete");

    let result = state.result();
    assert_eq!(result.final_score, 90);
    assert!(result.final_passed);
    assert_eq!(result.current_iteration, 2);
    assert_eq!(result.status, RunStatus::Completed);
    assert!(result.total_duration_seconds >= 0.0);
    assert!(result.end_time.is_some());

    let state_path = state.save_state().expect("save state");
    let report_path = state.save_report().expect("save report");
    assert!(state_path.is_file());
    assert!(report_path.is_file());

    let state_doc = read_json(&state_path);
    let report_doc = read_json(&report_path);
    assert_eq!(state_doc, report_doc);
    assert_eq!(state_doc, result.to_value().expect("value"));
    assert_eq!(state_doc["status"], "completed");
    assert_eq!(state_doc["iterations"].as_array().map(Vec::len), Some(2));
    assert_eq!(state_doc["iterations"][0]["iteration"], 1);
    assert_eq!(state_doc["iterations"][1]["score"], 90);
}

/// A collaborator error ends the run; the last iteration's outcome survives.
#[test]
fn generation_timeout_fails_run_and_keeps_last_outcome() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut state = RunState::new(config_in(temp.path(), "run-timeout")).expect("state");

    state.add_iteration(iteration(1, 35, false)).expect("iter 1");
    state.fail("generation timed out", None).expect("fail");

    let result = state.result();
    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.error_message.as_deref(), Some("generation timed out"));
    assert!(result.end_time.is_some());
    assert_eq!(result.final_score, 35);
    assert!(!result.final_passed);

    let err = state
        .complete(RunStatus::Completed)
        .expect_err("terminal status is absorbing");
    assert_eq!(
        err,
        RunError::AlreadyFinished {
            status: RunStatus::Failed
        }
    );
    assert_eq!(state.result().status, RunStatus::Failed);

    state
        .finalize_manifest(StopReason::infer(state.result()))
        .expect("finalize");
    let manifest_path = state.save_manifest().expect("save manifest");
    let manifest = load_manifest(&manifest_path).expect("load manifest");
    assert_eq!(manifest.stop_reason, StopReason::Error);
    assert_eq!(
        manifest.error_message.as_deref(),
        Some("generation timed out")
    );
    assert_eq!(manifest.iteration_count, 1);
}

/// Documents written before and after later iterations diverge as expected:
/// each save is a full replace of that file only.
#[test]
fn state_and_report_are_independent_snapshots() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut state = RunState::new(config_in(temp.path(), "run-snap")).expect("state");

    state.add_iteration(iteration(1, 20, false)).expect("iter 1");
    let report_path = state.save_report().expect("early report");

    state.add_iteration(iteration(2, 60, false)).expect("iter 2");
    let state_path = state.save_state().expect("late state");

    let early = load_result(&report_path).expect("report");
    let late = load_result(&state_path).expect("state");
    assert_eq!(early.current_iteration, 1);
    assert_eq!(late.current_iteration, 2);
    assert_eq!(late.iterations[0], early.iterations[0]);
}

/// Iterations built from phase outputs persist every phase field.
#[test]
fn phase_outputs_survive_persistence() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut state = RunState::new(config_in(temp.path(), "run-phases")).expect("state");

    let mut generation = GenerationOutput {
        code_generated: Some("<main>quiz</main>".to_string()),
        time_seconds: 3.0,
        ..GenerationOutput::default()
    };
    generation
        .files_generated
        .insert("app.js".to_string(), "console.log('quiz')".to_string());
    let record = IterationResult::from_phases(
        1,
        generation,
        TestingOutput {
            screenshot_path: Some("shots/1.png".to_string()),
            page_snapshot: Some(serde_json::json!({"buttons": 4})),
            console_errors: vec![ConsoleMessage::new("warning", "deprecated api")],
            time_seconds: 1.5,
        },
        EvaluationOutput {
            evaluation: Some(serde_json::json!({"criteria": {"layout": 8}})),
            score: 72,
            passed: false,
            feedback: "tighten layout".to_string(),
            time_seconds: 0.5,
        },
    );
    state.add_iteration(record.clone()).expect("iter 1");
    let path = state.save_state().expect("save");

    let loaded = load_result(&path).expect("load");
    assert_eq!(loaded.iterations, vec![record]);
    assert_eq!(loaded.iterations[0].total_time_seconds, 5.0);
    assert_eq!(loaded.final_feedback, "tighten layout");
}

/// Two runs under the same base dir stay isolated and are both discoverable.
#[test]
fn separate_runs_are_listed_by_id() {
    let temp = tempfile::tempdir().expect("tempdir");
    let first = RunState::new(config_in(temp.path(), "run-b")).expect("first");
    let second = RunState::new(config_in(temp.path(), "run-a")).expect("second");
    first.save_state().expect("first state");
    second.save_state().expect("second state");

    assert_ne!(first.run_dir(), second.run_dir());
    assert_eq!(list_runs(temp.path()).expect("list"), vec!["run-a", "run-b"]);
}
