//! JSON persistence for run documents.
//!
//! Writes are whole-document replacements done atomically (temp file +
//! rename), so a crash mid-write leaves the previous document in place.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::document::to_document;
use crate::core::manifest::RunManifest;
use crate::core::result::RunResult;
use crate::io::paths::{STATE_FILE, runs_root};

/// Atomically write `value` as pretty JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let buf = to_document(value).with_context(|| format!("serialize {}", path.display()))?;
    write_atomic(path, &buf)
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

pub fn load_result(path: &Path) -> Result<RunResult> {
    debug!(path = %path.display(), "loading run result");
    load_json(path)
}

pub fn load_manifest(path: &Path) -> Result<RunManifest> {
    debug!(path = %path.display(), "loading run manifest");
    load_json(path)
}

/// Ids of persisted runs under `<base_dir>/runs/`, sorted.
///
/// Only directories holding a `state.json` count as runs.
pub fn list_runs(base_dir: &Path) -> Result<Vec<String>> {
    let root = runs_root(base_dir);
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(&root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry.context("read entry")?;
        let path = entry.path();
        if !path.join(STATE_FILE).is_file() {
            continue;
        }
        ids.push(entry.file_name().to_string_lossy().into_owned());
    }
    ids.sort();
    Ok(ids)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "document written");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::RunStatus;

    #[test]
    fn result_round_trips_through_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        let mut result = RunResult::new("run-1", "task", 2);
        result.complete(RunStatus::Cancelled).expect("cancel");

        write_json(&path, &result).expect("write");
        let loaded = load_result(&path).expect("load");
        assert_eq!(loaded, result);
        assert!(!temp.path().join("state.json.tmp").exists());
    }

    #[test]
    fn write_replaces_previous_contents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("doc.json");
        write_json(&path, &vec![1, 2, 3]).expect("first write");
        write_json(&path, &vec![4]).expect("second write");
        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "[\n  4\n]\n");
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("broken.json");
        fs::write(&path, "{not json").expect("write");
        let err = load_result(&path).expect_err("parse failure");
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn list_runs_skips_dirs_without_state() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runs = runs_root(temp.path());
        fs::create_dir_all(runs.join("b-run")).expect("b");
        fs::create_dir_all(runs.join("a-run")).expect("a");
        fs::create_dir_all(runs.join("empty")).expect("empty");
        fs::write(runs.join("b-run").join(STATE_FILE), "{}").expect("b state");
        fs::write(runs.join("a-run").join(STATE_FILE), "{}").expect("a state");

        let ids = list_runs(temp.path()).expect("list");
        assert_eq!(ids, vec!["a-run", "b-run"]);
    }

    #[test]
    fn list_runs_without_runs_dir_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(list_runs(temp.path()).expect("list").is_empty());
    }
}
