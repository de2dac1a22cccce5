//! Per-iteration records.
//!
//! One iteration is a generate → test → evaluate pass. The three phases are run
//! by external collaborators; their outputs arrive here as plain data and are
//! stored without inspecting scores or payload shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message captured from the browser console while testing a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub kind: String,
    pub message: String,
}

impl ConsoleMessage {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Output of the code-generation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub code_generated: Option<String>,
    pub files_generated: BTreeMap<String, String>,
    pub time_seconds: f64,
}

/// Output of the testing collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestingOutput {
    pub screenshot_path: Option<String>,
    pub page_snapshot: Option<Value>,
    pub console_errors: Vec<ConsoleMessage>,
    pub time_seconds: f64,
}

/// Output of the evaluation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub evaluation: Option<Value>,
    pub score: i64,
    pub passed: bool,
    pub feedback: String,
    pub time_seconds: f64,
}

/// The record of one iteration, flattened for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// 1-based sequence number within the run.
    pub iteration: u32,
    pub timestamp: DateTime<Utc>,

    pub code_generated: Option<String>,
    pub files_generated: BTreeMap<String, String>,
    pub generation_time_seconds: f64,

    pub screenshot_path: Option<String>,
    pub page_snapshot: Option<Value>,
    pub console_errors: Vec<ConsoleMessage>,
    pub testing_time_seconds: f64,

    pub evaluation: Option<Value>,
    pub score: i64,
    pub passed: bool,
    pub feedback: String,
    pub evaluation_time_seconds: f64,

    pub total_time_seconds: f64,
}

impl IterationResult {
    /// Empty record for `iteration`, stamped with the current instant.
    pub fn new(iteration: u32) -> Self {
        Self {
            iteration,
            timestamp: Utc::now(),
            code_generated: None,
            files_generated: BTreeMap::new(),
            generation_time_seconds: 0.0,
            screenshot_path: None,
            page_snapshot: None,
            console_errors: Vec::new(),
            testing_time_seconds: 0.0,
            evaluation: None,
            score: 0,
            passed: false,
            feedback: String::new(),
            evaluation_time_seconds: 0.0,
            total_time_seconds: 0.0,
        }
    }

    /// Build a record from the three phase outputs.
    ///
    /// `total_time_seconds` is derived as the sum of the phase durations.
    pub fn from_phases(
        iteration: u32,
        generation: GenerationOutput,
        testing: TestingOutput,
        evaluation: EvaluationOutput,
    ) -> Self {
        let total_time_seconds =
            generation.time_seconds + testing.time_seconds + evaluation.time_seconds;
        Self {
            iteration,
            timestamp: Utc::now(),
            code_generated: generation.code_generated,
            files_generated: generation.files_generated,
            generation_time_seconds: generation.time_seconds,
            screenshot_path: testing.screenshot_path,
            page_snapshot: testing.page_snapshot,
            console_errors: testing.console_errors,
            testing_time_seconds: testing.time_seconds,
            evaluation: evaluation.evaluation,
            score: evaluation.score,
            passed: evaluation.passed,
            feedback: evaluation.feedback,
            evaluation_time_seconds: evaluation.time_seconds,
            total_time_seconds,
        }
    }

    pub fn phase_time_seconds(&self) -> f64 {
        self.generation_time_seconds + self.testing_time_seconds + self.evaluation_time_seconds
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
