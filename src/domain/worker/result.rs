use crate::domain::Payload;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether a single worker invocation produced output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerOutcome {
    Success,
    Error,
}

impl std::fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerOutcome::Success => write!(f, "success"),
            WorkerOutcome::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one worker invocation, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub worker_id: String,
    pub status: WorkerOutcome,
    #[serde(default)]
    pub output: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl WorkerResult {
    pub fn success(worker_id: impl Into<String>, output: Payload, duration: Duration) -> Self {
        Self {
            worker_id: worker_id.into(),
            status: WorkerOutcome::Success,
            output,
            error: None,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn failure(
        worker_id: impl Into<String>,
        error: impl std::fmt::Display,
        duration: Duration,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            status: WorkerOutcome::Error,
            output: Payload::new(),
            error: Some(error.to_string()),
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == WorkerOutcome::Success
    }
}
