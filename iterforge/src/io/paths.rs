//! On-disk layout for a run: `<base_dir>/runs/<run_id>/`.

use std::path::{Path, PathBuf};

pub const RUNS_DIR: &str = "runs";
pub const STATE_FILE: &str = "state.json";
pub const REPORT_FILE: &str = "report.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub root: PathBuf,
    /// Scratch area for generated artifacts.
    pub workspace_dir: PathBuf,
    /// Durable outputs (report, manifest).
    pub artifacts_dir: PathBuf,
    /// Servable preview output.
    pub site_dir: PathBuf,
    pub state_path: PathBuf,
    pub report_path: PathBuf,
    pub manifest_path: PathBuf,
}

impl RunPaths {
    pub fn new(base_dir: &Path, run_id: &str) -> Self {
        let root = runs_root(base_dir).join(run_id);
        let artifacts_dir = root.join("artifacts");
        Self {
            workspace_dir: root.join("workspace"),
            site_dir: root.join("site"),
            state_path: root.join(STATE_FILE),
            report_path: artifacts_dir.join(REPORT_FILE),
            manifest_path: artifacts_dir.join(MANIFEST_FILE),
            artifacts_dir,
            root,
        }
    }

    /// Directories created when a run is provisioned.
    pub fn dirs(&self) -> [&Path; 3] {
        [&self.workspace_dir, &self.artifacts_dir, &self.site_dir]
    }
}

pub fn runs_root(base_dir: &Path) -> PathBuf {
    base_dir.join(RUNS_DIR)
}

/// Render a path for embedding in JSON records.
pub fn display_string(path: &Path) -> String {
    path.display().to_string()
}
