//! Run identifiers.
//!
//! Ids look like `20260101_000000_abcd1234`: a UTC timestamp at second
//! granularity followed by 8 hex characters from a v4 UUID. The timestamp
//! prefix keeps ids sortable by creation time; the suffix keeps ids minted in
//! the same second apart.

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::RunError;

const SUFFIX_LEN: usize = 8;

/// Generate a fresh run id.
pub fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    build_run_id(&timestamp, &short_suffix())
}

pub fn build_run_id(timestamp: &str, suffix: &str) -> String {
    format!("{timestamp}_{suffix}")
}

fn short_suffix() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(SUFFIX_LEN);
    simple
}

/// Validate that an id is safe to use as a directory name under `runs/`.
pub fn validate_run_id(id: &str) -> Result<(), RunError> {
    if id.is_empty() {
        return Err(RunError::InvalidConfig("run_id must not be empty".into()));
    }
    if id == "." || id == ".." {
        return Err(RunError::InvalidConfig(format!(
            "run_id must not be '{id}'"
        )));
    }
    if id
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(RunError::InvalidConfig(format!(
            "run_id must be [A-Za-z0-9._-] only (got '{id}')"
        )));
    }
    Ok(())
}
