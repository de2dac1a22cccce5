//! Process-level settings (`iterforge.toml`) with an environment overlay.
//!
//! This is the boundary where ambient process state is read. Everything past
//! it receives explicit values through [`RunConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{DEFAULT_MAX_ITERATIONS, Provenance, RunConfig, RunConfigBuilder};

pub const DEFAULT_SETTINGS_FILE: &str = "iterforge.toml";
pub const DEFAULT_PREVIEW_BASE_URL: &str = "http://localhost:8080";

pub const ENV_OPENHANDS_MODE: &str = "OPENHANDS_MODE";
pub const ENV_BASE_DIR: &str = "ITERFORGE_BASE_DIR";
pub const ENV_PREVIEW_BASE_URL: &str = "ITERFORGE_PREVIEW_BASE_URL";
pub const ENV_GEMINI_MODEL_VERSION: &str = "GEMINI_MODEL_VERSION";
pub const ENV_EVALUATOR_MODEL_VERSION: &str = "EVALUATOR_MODEL_VERSION";
pub const ENV_RUBRIC_VERSION: &str = "RUBRIC_VERSION";

/// Settings file contents. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory under which `runs/` lives.
    pub base_dir: PathBuf,

    /// Iteration budget for runs that don't ask for one.
    pub max_iterations_default: u32,

    /// Prefix for preview URLs (`<preview_base_url>/preview/<run_id>/`).
    pub preview_base_url: String,

    pub provenance: Provenance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            max_iterations_default: DEFAULT_MAX_ITERATIONS,
            preview_base_url: DEFAULT_PREVIEW_BASE_URL.to_string(),
            provenance: Provenance::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations_default == 0 {
            return Err(anyhow!("max_iterations_default must be > 0"));
        }
        if self.preview_base_url.trim().is_empty() {
            return Err(anyhow!("preview_base_url must be non-empty"));
        }
        if self.provenance.openhands_mode.trim().is_empty() {
            return Err(anyhow!("provenance.openhands_mode must be non-empty"));
        }
        Ok(())
    }

    /// Overlay values found through `lookup` (normally `std::env::var`).
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(mode) = get(ENV_OPENHANDS_MODE) {
            self.provenance.openhands_mode = mode;
        }
        if let Some(dir) = get(ENV_BASE_DIR) {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(url) = get(ENV_PREVIEW_BASE_URL) {
            self.preview_base_url = url;
        }
        if let Some(version) = get(ENV_GEMINI_MODEL_VERSION) {
            self.provenance.gemini_model_version = Some(version);
        }
        if let Some(version) = get(ENV_EVALUATOR_MODEL_VERSION) {
            self.provenance.evaluator_model_version = Some(version);
        }
        if let Some(version) = get(ENV_RUBRIC_VERSION) {
            self.provenance.rubric_version = Some(version);
        }
    }

    /// Start a run config for `task` seeded from these settings.
    pub fn run_config(&self, task: impl Into<String>) -> RunConfigBuilder {
        RunConfig::builder(task)
            .max_iterations(self.max_iterations_default)
            .base_dir(self.base_dir.clone())
            .provenance(self.provenance.clone())
    }
}

/// Load settings from a TOML file.
///
/// If the file is missing, returns `Settings::default()`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "settings file missing, using defaults");
        let settings = Settings::default();
        settings.validate()?;
        return Ok(settings);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(settings)
}

/// Load settings from `path`, then overlay the process environment.
pub fn load_settings_with_env(path: &Path) -> Result<Settings> {
    let mut settings = load_settings(path)?;
    settings.apply_env(|key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}
