//! Per-recording outcomes of a batch run

use std::time::Duration;

use ink_core::RecordingId;
use serde::{Deserialize, Serialize};

use crate::table::FeatureTable;

/// What a batch does when one recording fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Return the first failure (in input order)
    #[default]
    FailFast,
    /// Log the failure, drop the recording, keep going
    SkipInvalid,
}

/// Final status of one recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingStatus {
    Completed,
    Failed,
}

/// Extraction result for one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingOutcome {
    pub recording: RecordingId,
    pub status: RecordingStatus,
    /// Rows contributed to the batch table
    pub rows: usize,
    pub duration: Duration,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl RecordingOutcome {
    pub fn success(recording: RecordingId, rows: usize, duration: Duration) -> Self {
        Self {
            recording,
            status: RecordingStatus::Completed,
            rows,
            duration,
            error: None,
        }
    }

    pub fn failure(recording: RecordingId, error: String, duration: Duration) -> Self {
        Self {
            recording,
            status: RecordingStatus::Failed,
            rows: 0,
            duration,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RecordingStatus::Completed
    }
}

/// Result of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Concatenated features of every completed recording
    pub table: FeatureTable,
    /// One entry per input recording, in input order
    pub outcomes: Vec<RecordingOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &RecordingOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
