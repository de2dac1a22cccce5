//! The accumulating result record for a run.
//!
//! Status moves `running` → {`completed`, `failed`, `cancelled`} exactly once.
//! Terminal states are absorbing: once set, the record refuses further
//! iterations and further transitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::document::to_document;
use crate::core::error::RunError;
use crate::core::iteration::IterationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live status record for a run (`state.json`, `artifacts/report.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub task: String,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_duration_seconds: f64,

    /// Append-only, in iteration order.
    pub iterations: Vec<IterationResult>,
    pub current_iteration: u32,
    pub max_iterations: u32,

    /// Mirrors of the most recently appended iteration.
    pub final_score: i64,
    pub final_passed: bool,
    pub final_feedback: String,

    pub workspace_dir: Option<String>,
    pub artifacts_dir: Option<String>,
    pub site_dir: Option<String>,
    pub preview_url: Option<String>,

    pub github_branch: Option<String>,
    pub github_branch_url: Option<String>,

    pub error_message: Option<String>,
    pub error_traceback: Option<String>,
}

impl RunResult {
    pub fn new(run_id: impl Into<String>, task: impl Into<String>, max_iterations: u32) -> Self {
        Self {
            run_id: run_id.into(),
            task: task.into(),
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            total_duration_seconds: 0.0,
            iterations: Vec::new(),
            current_iteration: 0,
            max_iterations,
            final_score: 0,
            final_passed: false,
            final_feedback: String::new(),
            workspace_dir: None,
            artifacts_dir: None,
            site_dir: None,
            preview_url: None,
            github_branch: None,
            github_branch_url: None,
            error_message: None,
            error_traceback: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn last_iteration(&self) -> Option<&IterationResult> {
        self.iterations.last()
    }

    /// Append the next iteration and mirror its outcome onto the run.
    ///
    /// The iteration number must be exactly `len(iterations) + 1` and must
    /// fit inside the run's budget.
    pub fn add_iteration(&mut self, iteration: IterationResult) -> Result<(), RunError> {
        self.ensure_running()?;
        let expected = self.iterations.len() as u32 + 1;
        if iteration.iteration != expected {
            return Err(RunError::OutOfSequence {
                expected,
                got: iteration.iteration,
            });
        }
        if iteration.iteration > self.max_iterations {
            return Err(RunError::BudgetExceeded {
                max_iterations: self.max_iterations,
                got: iteration.iteration,
            });
        }

        self.current_iteration = iteration.iteration;
        self.final_score = iteration.score;
        self.final_passed = iteration.passed;
        self.final_feedback = iteration.feedback.clone();
        debug!(
            run_id = %self.run_id,
            iteration = iteration.iteration,
            score = iteration.score,
            passed = iteration.passed,
            "iteration recorded"
        );
        self.iterations.push(iteration);
        Ok(())
    }

    /// Move the run to a terminal `status` and stamp its timing.
    pub fn complete(&mut self, status: RunStatus) -> Result<(), RunError> {
        self.ensure_running()?;
        if !status.is_terminal() {
            return Err(RunError::NotTerminal(status));
        }
        self.finish(status, Utc::now());
        Ok(())
    }

    /// Mark the run failed, recording the error that ended it.
    pub fn fail(
        &mut self,
        error_message: impl Into<String>,
        traceback: Option<String>,
    ) -> Result<(), RunError> {
        self.ensure_running()?;
        self.error_message = Some(error_message.into());
        self.error_traceback = traceback;
        self.finish(RunStatus::Failed, Utc::now());
        Ok(())
    }

    fn finish(&mut self, status: RunStatus, end_time: DateTime<Utc>) {
        self.status = status;
        self.end_time = Some(end_time);
        self.total_duration_seconds = elapsed_seconds(self.start_time, end_time);
        info!(
            run_id = %self.run_id,
            status = %status,
            duration_secs = self.total_duration_seconds,
            "run finished"
        );
    }

    fn ensure_running(&self) -> Result<(), RunError> {
        if self.status.is_terminal() {
            return Err(RunError::AlreadyFinished {
                status: self.status,
            });
        }
        Ok(())
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Canonical on-disk document: pretty-printed, trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        to_document(self)
    }
}

/// Seconds between two instants, at millisecond resolution, never negative.
pub(crate) fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds().max(0);
    millis as f64 / 1000.0
}
