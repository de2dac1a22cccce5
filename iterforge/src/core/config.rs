//! Run configuration.
//!
//! A [`RunConfig`] is built once per run request and is read-only afterward.
//! Callers that need a different run construct a new config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::RunError;
use crate::core::id::{generate_run_id, validate_run_id};

pub const DEFAULT_MAX_ITERATIONS: u32 = 3;
pub const DEFAULT_OPENHANDS_MODE: &str = "mock";

/// Versions and mode labels recorded into the manifest for reproducibility.
///
/// Informational only: nothing in the core branches on these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    pub openhands_mode: String,
    pub gemini_model_version: Option<String>,
    pub evaluator_model_version: Option<String>,
    pub rubric_version: Option<String>,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            openhands_mode: DEFAULT_OPENHANDS_MODE.to_string(),
            gemini_model_version: None,
            evaluator_model_version: None,
            rubric_version: None,
        }
    }
}

/// Identifies and parameterizes one run.
///
/// Only serialized, never parsed back: every config goes through
/// [`RunConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub task: String,
    pub max_iterations: u32,
    pub base_dir: PathBuf,
    pub run_id: String,
    pub provenance: Provenance,
}

impl RunConfig {
    /// Start building a config for `task` with default budget and base dir.
    pub fn builder(task: impl Into<String>) -> RunConfigBuilder {
        RunConfigBuilder {
            task: task.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            base_dir: None,
            run_id: None,
            provenance: Provenance::default(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Plain JSON mapping of the config, with paths rendered as strings.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    task: String,
    max_iterations: u32,
    base_dir: Option<PathBuf>,
    run_id: Option<String>,
    provenance: Provenance,
}

impl RunConfigBuilder {
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Validate inputs and assign the run id.
    ///
    /// A missing base dir resolves to `.` (the process working directory at
    /// the time paths are used).
    pub fn build(self) -> Result<RunConfig, RunError> {
        if self.task.trim().is_empty() {
            return Err(RunError::InvalidConfig("task must be non-empty".into()));
        }
        if self.max_iterations == 0 {
            return Err(RunError::InvalidConfig(
                "max_iterations must be > 0".into(),
            ));
        }
        let run_id = match self.run_id {
            Some(id) => {
                validate_run_id(&id)?;
                id
            }
            None => generate_run_id(),
        };
        Ok(RunConfig {
            task: self.task,
            max_iterations: self.max_iterations,
            base_dir: self.base_dir.unwrap_or_else(|| PathBuf::from(".")),
            run_id,
            provenance: self.provenance,
        })
    }
}
