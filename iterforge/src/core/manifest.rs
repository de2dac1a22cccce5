//! Reproducibility manifest for a run (`artifacts/manifest.json`).
//!
//! The manifest overlaps with [`RunResult`] on purpose: the result is the live
//! status record, the manifest is the archive entry. Either file may be read
//! on its own, so both are kept.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::config::RunConfig;
use crate::core::document::to_document;
use crate::core::error::RunError;
use crate::core::result::{RunResult, RunStatus, elapsed_seconds};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    Passed,
    MaxIterations,
    Failed,
    Error,
    Unknown,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::Passed => "passed",
            StopReason::MaxIterations => "max_iterations",
            StopReason::Failed => "failed",
            StopReason::Error => "error",
            StopReason::Unknown => "unknown",
        }
    }

    /// Classify a result's outcome.
    ///
    /// A cancelled run never reached an outcome and is reported as `failed`.
    pub fn infer(result: &RunResult) -> StopReason {
        match result.status {
            RunStatus::Running => StopReason::Unknown,
            RunStatus::Failed => StopReason::Error,
            RunStatus::Cancelled => StopReason::Failed,
            RunStatus::Completed if result.final_passed => StopReason::Passed,
            RunStatus::Completed if result.current_iteration >= result.max_iterations => {
                StopReason::MaxIterations
            }
            RunStatus::Completed => StopReason::Completed,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One commit pushed to the run's branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub iteration: u32,
    pub commit_sha: String,
    pub commit_url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub task: String,
    /// SHA-256 of the task text.
    pub task_sha256: String,

    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: f64,

    pub gemini_model_version: Option<String>,
    pub evaluator_model_version: Option<String>,
    pub rubric_version: Option<String>,
    pub openhands_mode: String,

    pub max_iterations: u32,
    pub iteration_count: u32,

    pub final_score: i64,
    pub final_passed: bool,
    pub stop_reason: StopReason,

    pub github_enabled: bool,
    pub github_repo: Option<String>,
    pub github_branch: Option<String>,
    pub github_base_branch: Option<String>,
    pub github_commits: Vec<CommitRecord>,

    pub workspace_dir: Option<String>,
    pub artifacts_dir: Option<String>,
    pub site_dir: Option<String>,
    pub preview_url: Option<String>,

    pub error_message: Option<String>,
}

impl RunManifest {
    pub fn new(config: &RunConfig) -> Self {
        let provenance = &config.provenance;
        Self {
            run_id: config.run_id.clone(),
            task: config.task.clone(),
            task_sha256: sha256_hex(&config.task),
            start_time: Utc::now(),
            end_time: None,
            duration_seconds: 0.0,
            gemini_model_version: provenance.gemini_model_version.clone(),
            evaluator_model_version: provenance.evaluator_model_version.clone(),
            rubric_version: provenance.rubric_version.clone(),
            openhands_mode: provenance.openhands_mode.clone(),
            max_iterations: config.max_iterations,
            iteration_count: 0,
            final_score: 0,
            final_passed: false,
            stop_reason: StopReason::Unknown,
            github_enabled: false,
            github_repo: None,
            github_branch: None,
            github_base_branch: None,
            github_commits: Vec::new(),
            workspace_dir: None,
            artifacts_dir: None,
            site_dir: None,
            preview_url: None,
            error_message: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }

    /// Append a commit record stamped with the current instant.
    pub fn add_commit(
        &mut self,
        iteration: u32,
        commit_sha: impl Into<String>,
        commit_url: impl Into<String>,
    ) {
        let record = CommitRecord {
            iteration,
            commit_sha: commit_sha.into(),
            commit_url: commit_url.into(),
            timestamp: Utc::now(),
        };
        debug!(run_id = %self.run_id, iteration, sha = %record.commit_sha, "commit recorded");
        self.github_commits.push(record);
    }

    /// Stamp end time and duration and record why the run stopped.
    ///
    /// `end_time` defaults to now. Only the first call is accepted.
    pub fn complete(
        &mut self,
        stop_reason: StopReason,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<(), RunError> {
        if self.is_complete() {
            return Err(RunError::ManifestFinalized);
        }
        let end_time = end_time.unwrap_or_else(Utc::now);
        self.end_time = Some(end_time);
        self.duration_seconds = elapsed_seconds(self.start_time, end_time);
        self.stop_reason = stop_reason;
        info!(run_id = %self.run_id, stop_reason = %stop_reason, "manifest completed");
        Ok(())
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        to_document(self)
    }
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
