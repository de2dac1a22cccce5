//! CLI command implementations.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use iterforge::core::id::validate_run_id;
use iterforge::io::paths::RunPaths;
use iterforge::io::settings::Settings;
use iterforge::io::store::{self, load_result};
use iterforge::state::{RunState, RunSummary};

/// Provision a run and write `state.json`, `report.json`, and `manifest.json`.
pub fn new_run(
    settings: &Settings,
    task: String,
    max_iterations: Option<u32>,
    run_id: Option<String>,
) -> Result<()> {
    let mut builder = settings.run_config(task);
    if let Some(max_iterations) = max_iterations {
        builder = builder.max_iterations(max_iterations);
    }
    if let Some(run_id) = run_id {
        builder = builder.run_id(run_id);
    }
    let config = builder.build().context("build run config")?;

    let mut state = RunState::new(config).context("create run state")?;
    state.compute_preview_url(&settings.preview_base_url);
    state.save_state()?;
    state.save_report()?;
    state.save_manifest()?;

    info!(run_id = %state.run_id(), "run provisioned");
    println!(
        "new: run_id={} dir={}",
        state.run_id(),
        state.run_dir().display()
    );
    Ok(())
}

/// Print the ids of all persisted runs.
pub fn list_runs(settings: &Settings) -> Result<()> {
    for run_id in store::list_runs(&settings.base_dir)? {
        println!("{run_id}");
    }
    Ok(())
}

/// Print the summary stored in a run's `state.json`.
pub fn show_run(settings: &Settings, run_id: &str) -> Result<()> {
    let summary = load_summary(settings, run_id)?;
    for line in render_summary(&summary) {
        println!("{line}");
    }
    Ok(())
}

/// Remove a run's directory tree.
pub fn clean_run(settings: &Settings, run_id: &str) -> Result<()> {
    validate_run_id(run_id)?;
    let paths = RunPaths::new(&settings.base_dir, run_id);
    if !paths.root.exists() {
        bail!("run {} not found at {}", run_id, paths.root.display());
    }
    fs::remove_dir_all(&paths.root)
        .with_context(|| format!("remove {}", paths.root.display()))?;
    println!("clean: run_id={} dir={}", run_id, paths.root.display());
    Ok(())
}

fn load_summary(settings: &Settings, run_id: &str) -> Result<RunSummary> {
    validate_run_id(run_id)?;
    let paths = RunPaths::new(&settings.base_dir, run_id);
    if !paths.state_path.exists() {
        bail!("run {} has no state at {}", run_id, paths.state_path.display());
    }
    debug!(run_id, path = %paths.state_path.display(), "loading summary");
    let result = load_result(&paths.state_path)?;
    Ok(RunSummary::from_result(&result))
}

fn render_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("run: id={} status={}", summary.run_id, summary.status),
        format!("run: task={}", summary.task),
        format!(
            "run: iteration={}/{} score={} passed={}",
            summary.current_iteration,
            summary.max_iterations,
            summary.final_score,
            summary.final_passed
        ),
    ];
    if let Some(url) = &summary.preview_url {
        lines.push(format!("run: preview={url}"));
    }
    for (label, dir) in [
        ("workspace", &summary.workspace_dir),
        ("artifacts", &summary.artifacts_dir),
        ("site", &summary.site_dir),
    ] {
        if let Some(dir) = dir {
            lines.push(format!("run: {label}={dir}"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use iterforge::core::result::RunStatus;
    use tempfile::tempdir;

    fn settings_in(base: &std::path::Path) -> Settings {
        Settings {
            base_dir: base.to_path_buf(),
            ..Settings::default()
        }
    }

    #[test]
    fn new_run_writes_all_documents() {
        let temp = tempdir().expect("tempdir");
        let settings = settings_in(temp.path());
        new_run(&settings, "build a quiz app".to_string(), Some(2), Some("run-1".to_string()))
            .expect("new run");

        let paths = RunPaths::new(temp.path(), "run-1");
        assert!(paths.state_path.is_file());
        assert!(paths.report_path.is_file());
        assert!(paths.manifest_path.is_file());

        let summary = load_summary(&settings, "run-1").expect("summary");
        assert_eq!(summary.status, RunStatus::Running);
        assert_eq!(summary.max_iterations, 2);
        assert_eq!(
            summary.preview_url.as_deref(),
            Some("http://localhost:8080/preview/run-1/")
        );
    }

    #[test]
    fn new_run_rejects_zero_budget() {
        let temp = tempdir().expect("tempdir");
        let settings = settings_in(temp.path());
        let err = new_run(&settings, "task".to_string(), Some(0), None).expect_err("invalid");
        assert!(format!("{err:#}").contains("max_iterations"));
    }

    #[test]
    fn clean_removes_run_directory() {
        let temp = tempdir().expect("tempdir");
        let settings = settings_in(temp.path());
        new_run(&settings, "task".to_string(), None, Some("run-1".to_string())).expect("new");

        clean_run(&settings, "run-1").expect("clean");
        assert!(!RunPaths::new(temp.path(), "run-1").root.exists());
        assert!(clean_run(&settings, "run-1").is_err());
    }

    #[test]
    fn show_rejects_unsafe_ids() {
        let temp = tempdir().expect("tempdir");
        let settings = settings_in(temp.path());
        assert!(show_run(&settings, "../etc").is_err());
    }

    #[test]
    fn renders_summary_lines() {
        let summary = RunSummary {
            run_id: "run-1".to_string(),
            task: "task".to_string(),
            status: RunStatus::Completed,
            current_iteration: 2,
            max_iterations: 3,
            final_score: 90,
            final_passed: true,
            preview_url: None,
            workspace_dir: Some("/w".to_string()),
            artifacts_dir: None,
            site_dir: None,
        };
        let lines = render_summary(&summary);
        assert_eq!(
            lines,
            vec![
                "run: id=run-1 status=completed",
                "run: task=task",
                "run: iteration=2/3 score=90 passed=true",
                "run: workspace=/w",
            ]
        );
    }
}
