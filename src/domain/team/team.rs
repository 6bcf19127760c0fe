use super::value_objects::{TeamMember, TeamStrategy};
use crate::domain::worker::WorkerResult;
use crate::domain::Payload;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Default per-invocation bound for team runs
pub const DEFAULT_TEAM_TIMEOUT_SECS: u64 = 300;

fn default_timeout_seconds() -> u64 {
    DEFAULT_TEAM_TIMEOUT_SECS
}

/// A team of workers executed together under one strategy
///
/// # Example
/// ```
/// use orchestration_engine::domain::team::{TeamConfiguration, TeamMember, TeamStrategy};
///
/// let config = TeamConfiguration::new(
///     "content_team",
///     TeamStrategy::Pipeline,
///     vec![TeamMember::new("writer", 2), TeamMember::new("editor", 1)],
/// );
///
/// assert_eq!(config.members.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamConfiguration {
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub strategy: TeamStrategy,
    /// Seed copied into every run's shared context
    #[serde(default)]
    pub shared_context: Payload,
    /// Upper bound on each individual worker call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl TeamConfiguration {
    pub fn new(team_id: impl Into<String>, strategy: TeamStrategy, members: Vec<TeamMember>) -> Self {
        let team_id = team_id.into();
        Self {
            name: team_id.clone(),
            team_id,
            description: None,
            members,
            strategy,
            shared_context: Payload::new(),
            timeout_seconds: DEFAULT_TEAM_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs().max(1);
        self
    }

    pub fn with_shared_context(mut self, seed: Payload) -> Self {
        self.shared_context = seed;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Overall verdict of a team run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRunStatus {
    Success,
    Error,
}

impl std::fmt::Display for TeamRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRunStatus::Success => write!(f, "success"),
            TeamRunStatus::Error => write!(f, "error"),
        }
    }
}

/// Structured outcome of a team run
///
/// `worker_results` is in invocation order for one-at-a-time strategies and
/// in completion order for parallel ones. Each entry names its worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub team_id: String,
    pub run_id: Uuid,
    pub status: TeamRunStatus,
    pub outputs: Payload,
    pub worker_results: Vec<WorkerResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    /// Shared context as it stood when the run ended
    #[serde(default)]
    pub context: Payload,
}

impl TeamResult {
    pub fn is_success(&self) -> bool {
        self.status == TeamRunStatus::Success
    }

    /// Result recorded for a given worker, if it was invoked
    pub fn result_for(&self, worker_id: &str) -> Option<&WorkerResult> {
        self.worker_results.iter().find(|r| r.worker_id == worker_id)
    }

    /// Worker ids in the order their results were recorded
    pub fn invocation_order(&self) -> Vec<&str> {
        self.worker_results
            .iter()
            .map(|r| r.worker_id.as_str())
            .collect()
    }
}
