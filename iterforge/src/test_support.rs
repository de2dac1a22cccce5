//! Test-only fixtures for building configs and iterations.

use std::path::Path;

use crate::core::config::RunConfig;
use crate::core::iteration::IterationResult;

/// Config rooted at `base_dir` with a fixed id and the default budget.
pub fn config_in(base_dir: &Path, run_id: &str) -> RunConfig {
    RunConfig::builder("build a quiz app")
        .base_dir(base_dir)
        .run_id(run_id)
        .build()
        .expect("valid test config")
}

/// Iteration `n` with the given evaluation outcome and one generated file.
pub fn iteration(n: u32, score: i64, passed: bool) -> IterationResult {
    let mut record = IterationResult::new(n);
    record
        .files_generated
        .insert("index.html".to_string(), format!("<html>iteration {n}</html>"));
    record.generation_time_seconds = 1.0;
    record.testing_time_seconds = 0.5;
    record.evaluation_time_seconds = 0.25;
    record.total_time_seconds = record.phase_time_seconds();
    record.score = score;
    record.passed = passed;
    record.feedback = format!("iteration {n} scored {score}");
    record
}
