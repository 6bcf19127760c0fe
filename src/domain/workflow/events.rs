use super::value_objects::WorkflowStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Named moments in a workflow's lifecycle
///
/// The serialized names are the analytics event types consumers filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEventKind {
    /// Workflow persisted and queued
    WorkflowCreated,
    /// Consumer claimed the workflow
    WorkflowStarted,
    /// A worker returned a successful result
    AgentTaskCompleted,
    /// A worker could not be resolved, failed or timed out
    AgentTaskFailed,
    /// Workflow reached a terminal status
    WorkflowFinished,
}

impl LifecycleEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEventKind::WorkflowCreated => "workflow_created",
            LifecycleEventKind::WorkflowStarted => "workflow_started",
            LifecycleEventKind::AgentTaskCompleted => "agent_task_completed",
            LifecycleEventKind::AgentTaskFailed => "agent_task_failed",
            LifecycleEventKind::WorkflowFinished => "workflow_finished",
        }
    }
}

impl std::fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow_created" => Ok(LifecycleEventKind::WorkflowCreated),
            "workflow_started" => Ok(LifecycleEventKind::WorkflowStarted),
            "agent_task_completed" => Ok(LifecycleEventKind::AgentTaskCompleted),
            "agent_task_failed" => Ok(LifecycleEventKind::AgentTaskFailed),
            "workflow_finished" => Ok(LifecycleEventKind::WorkflowFinished),
            other => Err(format!("Unknown lifecycle event: {}", other)),
        }
    }
}

/// Lifecycle event emitted by the coordinator
///
/// # Example
/// ```
/// use orchestration_engine::domain::workflow::{LifecycleEvent, LifecycleEventKind};
/// use uuid::Uuid;
///
/// let event = LifecycleEvent::created(Uuid::new_v4(), Uuid::new_v4());
/// assert_eq!(event.kind, LifecycleEventKind::WorkflowCreated);
/// assert_eq!(event.status, "pending");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "event_type")]
    pub kind: LifecycleEventKind,
    pub workflow_id: Uuid,
    pub worker_id: Option<String>,
    pub duration_ms: Option<u64>,
    pub status: String,
    pub owner_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    fn new(kind: LifecycleEventKind, workflow_id: Uuid, owner_id: Uuid, status: String) -> Self {
        Self {
            kind,
            workflow_id,
            worker_id: None,
            duration_ms: None,
            status,
            owner_id,
            timestamp: Utc::now(),
        }
    }

    pub fn created(workflow_id: Uuid, owner_id: Uuid) -> Self {
        Self::new(
            LifecycleEventKind::WorkflowCreated,
            workflow_id,
            owner_id,
            WorkflowStatus::Pending.to_string(),
        )
    }

    pub fn started(workflow_id: Uuid, owner_id: Uuid) -> Self {
        Self::new(
            LifecycleEventKind::WorkflowStarted,
            workflow_id,
            owner_id,
            WorkflowStatus::Running.to_string(),
        )
    }

    pub fn task_completed(
        workflow_id: Uuid,
        owner_id: Uuid,
        worker_id: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let mut event = Self::new(
            LifecycleEventKind::AgentTaskCompleted,
            workflow_id,
            owner_id,
            "success".to_string(),
        );
        event.worker_id = Some(worker_id.into());
        event.duration_ms = Some(duration.as_millis() as u64);
        event
    }

    pub fn task_failed(
        workflow_id: Uuid,
        owner_id: Uuid,
        worker_id: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let mut event = Self::new(
            LifecycleEventKind::AgentTaskFailed,
            workflow_id,
            owner_id,
            "failed".to_string(),
        );
        event.worker_id = Some(worker_id.into());
        event.duration_ms = Some(duration.as_millis() as u64);
        event
    }

    pub fn finished(
        workflow_id: Uuid,
        owner_id: Uuid,
        status: WorkflowStatus,
        duration: Duration,
    ) -> Self {
        let mut event = Self::new(
            LifecycleEventKind::WorkflowFinished,
            workflow_id,
            owner_id,
            status.to_string(),
        );
        event.duration_ms = Some(duration.as_millis() as u64);
        event
    }
}
