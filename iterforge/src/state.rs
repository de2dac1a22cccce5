//! Orchestration for one run's storage and bookkeeping.
//!
//! A [`RunState`] provisions `<base_dir>/runs/<run_id>/`, owns the run's
//! [`RunResult`] and [`RunManifest`], and persists them on demand. One
//! instance drives one run; parallel runs use separate instances and are kept
//! apart by their directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::config::RunConfig;
use crate::core::error::RunError;
use crate::core::iteration::IterationResult;
use crate::core::manifest::{RunManifest, StopReason};
use crate::core::result::{RunResult, RunStatus};
use crate::io::paths::{RunPaths, display_string};
use crate::io::store::write_json;

/// Compact view of a run for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub task: String,
    pub status: RunStatus,
    pub current_iteration: u32,
    pub max_iterations: u32,
    pub final_score: i64,
    pub final_passed: bool,
    pub preview_url: Option<String>,
    pub workspace_dir: Option<String>,
    pub artifacts_dir: Option<String>,
    pub site_dir: Option<String>,
}

impl RunSummary {
    pub fn from_result(result: &RunResult) -> Self {
        Self {
            run_id: result.run_id.clone(),
            task: result.task.clone(),
            status: result.status,
            current_iteration: result.current_iteration,
            max_iterations: result.max_iterations,
            final_score: result.final_score,
            final_passed: result.final_passed,
            preview_url: result.preview_url.clone(),
            workspace_dir: result.workspace_dir.clone(),
            artifacts_dir: result.artifacts_dir.clone(),
            site_dir: result.site_dir.clone(),
        }
    }
}

#[derive(Debug)]
pub struct RunState {
    config: RunConfig,
    paths: RunPaths,
    result: RunResult,
    manifest: RunManifest,
}

impl RunState {
    /// Provision the run directory tree and start fresh records.
    ///
    /// Directory creation is idempotent: existing directories and their
    /// contents are left alone.
    #[instrument(skip_all, fields(run_id = %config.run_id))]
    pub fn new(config: RunConfig) -> Result<Self> {
        let paths = RunPaths::new(config.base_dir(), &config.run_id);
        for dir in paths.dirs() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create run directory {}", dir.display()))?;
        }
        debug!(root = %paths.root.display(), "run directories ready");

        let mut result = RunResult::new(&config.run_id, &config.task, config.max_iterations);
        result.workspace_dir = Some(display_string(&paths.workspace_dir));
        result.artifacts_dir = Some(display_string(&paths.artifacts_dir));
        result.site_dir = Some(display_string(&paths.site_dir));

        let mut manifest = RunManifest::new(&config);
        manifest.workspace_dir = result.workspace_dir.clone();
        manifest.artifacts_dir = result.artifacts_dir.clone();
        manifest.site_dir = result.site_dir.clone();

        info!(
            task = %config.task,
            max_iterations = config.max_iterations,
            mode = %config.provenance.openhands_mode,
            "run state created"
        );
        Ok(Self {
            config,
            paths,
            result,
            manifest,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.config.run_id
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    pub fn run_dir(&self) -> &Path {
        &self.paths.root
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn manifest(&self) -> &RunManifest {
        &self.manifest
    }

    pub fn add_iteration(&mut self, iteration: IterationResult) -> Result<(), RunError> {
        self.result.add_iteration(iteration)
    }

    pub fn complete(&mut self, status: RunStatus) -> Result<(), RunError> {
        self.result.complete(status)
    }

    pub fn fail(
        &mut self,
        error_message: impl Into<String>,
        traceback: Option<String>,
    ) -> Result<(), RunError> {
        self.result.fail(error_message, traceback)
    }

    /// Build `<base_url>/preview/<run_id>/` and store it on the records.
    pub fn compute_preview_url(&mut self, base_url: &str) -> &str {
        let url = format!(
            "{}/preview/{}/",
            base_url.trim_end_matches('/'),
            self.config.run_id
        );
        debug!(url = %url, "preview url computed");
        self.manifest.preview_url = Some(url.clone());
        self.result.preview_url.insert(url).as_str()
    }

    /// Attach the run to a version-control branch.
    pub fn enable_github(
        &mut self,
        repo: impl Into<String>,
        branch: impl Into<String>,
        base_branch: impl Into<String>,
    ) {
        let repo = repo.into();
        let branch = branch.into();
        self.result.github_branch_url = Some(format!("https://github.com/{repo}/tree/{branch}"));
        self.result.github_branch = Some(branch.clone());
        self.manifest.github_enabled = true;
        self.manifest.github_repo = Some(repo);
        self.manifest.github_branch = Some(branch);
        self.manifest.github_base_branch = Some(base_branch.into());
    }

    pub fn record_commit(
        &mut self,
        iteration: u32,
        commit_sha: impl Into<String>,
        commit_url: impl Into<String>,
    ) {
        self.manifest.add_commit(iteration, commit_sha, commit_url);
    }

    /// Copy the finished result's outcome into the manifest and complete it.
    ///
    /// The run must already be terminal; the manifest's end time is the
    /// result's end time.
    pub fn finalize_manifest(&mut self, stop_reason: StopReason) -> Result<(), RunError> {
        let manifest = &mut self.manifest;
        let result = &self.result;
        if !result.is_terminal() {
            return Err(RunError::NotTerminal(result.status));
        }
        if manifest.is_complete() {
            return Err(RunError::ManifestFinalized);
        }
        manifest.iteration_count = result.iterations.len() as u32;
        manifest.final_score = result.final_score;
        manifest.final_passed = result.final_passed;
        manifest.error_message = result.error_message.clone();
        manifest.preview_url = result.preview_url.clone();
        manifest.complete(stop_reason, result.end_time)
    }

    /// Write the result document to `<run>/state.json`.
    pub fn save_state(&self) -> Result<PathBuf> {
        self.write_result(&self.paths.state_path)
    }

    /// Write the result document to `<run>/artifacts/report.json`.
    pub fn save_report(&self) -> Result<PathBuf> {
        self.write_result(&self.paths.report_path)
    }

    /// Write the manifest document to `<run>/artifacts/manifest.json`.
    pub fn save_manifest(&self) -> Result<PathBuf> {
        let path = self.paths.manifest_path.clone();
        write_json(&path, &self.manifest).context("save manifest")?;
        debug!(path = %path.display(), "manifest saved");
        Ok(path)
    }

    pub fn get_summary(&self) -> RunSummary {
        RunSummary::from_result(&self.result)
    }

    fn write_result(&self, path: &Path) -> Result<PathBuf> {
        write_json(path, &self.result).context("save run result")?;
        debug!(
            path = %path.display(),
            status = %self.result.status,
            iterations = self.result.iterations.len(),
            "run result saved"
        );
        Ok(path.to_path_buf())
    }
}
