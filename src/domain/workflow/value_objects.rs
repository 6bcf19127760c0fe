use serde::{Deserialize, Serialize};

/// Represents the lifecycle status of a workflow
///
/// # Status Transitions
/// ```text
/// Pending -> Running -> Completed
///                  \--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workflow_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Persisted and queued, not yet picked up by the consumer
    Pending,
    /// Claimed by the consumer and executing tasks
    Running,
    /// Every task finished successfully
    Completed,
    /// A task failed, a worker could not be resolved, or a call timed out
    Failed,
}

impl WorkflowStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Pending -> Running
    /// - Running -> Completed
    /// - Running -> Failed
    ///
    /// # Example
    /// ```
    /// use orchestration_engine::domain::workflow::WorkflowStatus;
    ///
    /// assert!(WorkflowStatus::Pending.can_transition_to(WorkflowStatus::Running));
    /// assert!(!WorkflowStatus::Completed.can_transition_to(WorkflowStatus::Running));
    /// ```
    pub fn can_transition_to(&self, next: WorkflowStatus) -> bool {
        use WorkflowStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Completed) | (Running, Failed)
        )
    }

    /// The only status a workflow may hold right before entering `self`
    pub fn predecessor(&self) -> Option<WorkflowStatus> {
        match self {
            WorkflowStatus::Pending => None,
            WorkflowStatus::Running => Some(WorkflowStatus::Pending),
            WorkflowStatus::Completed | WorkflowStatus::Failed => Some(WorkflowStatus::Running),
        }
    }

    /// True once the workflow can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Failed)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Pending => write!(f, "pending"),
            WorkflowStatus::Running => write!(f, "running"),
            WorkflowStatus::Completed => write!(f, "completed"),
            WorkflowStatus::Failed => write!(f, "failed"),
        }
    }
}
