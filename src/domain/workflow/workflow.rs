use super::value_objects::WorkflowStatus;
use crate::domain::worker::{validate_worker_id, WorkerResult};
use crate::domain::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted workflow name, counted after trimming
pub const MAX_NAME_LEN: usize = 200;

/// Largest number of tasks a single workflow may carry
pub const MAX_TASKS: usize = 100;

/// A single unit of work bound to a registered worker
///
/// Immutable once it is part of a [`Workflow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "agent_id")]
    pub worker_id: String,
    #[serde(default, alias = "task_details")]
    pub task_payload: Payload,
}

impl Task {
    pub fn new(worker_id: impl Into<String>, task_payload: Payload) -> Self {
        Self {
            worker_id: worker_id.into(),
            task_payload,
        }
    }
}

/// Workflow aggregate root
///
/// An owner-scoped, ordered list of tasks with a lifecycle status and the
/// results accumulated while it runs.
///
/// # Invariants
/// - Name is 1-200 characters after trimming
/// - Holds between 1 and 100 tasks, each naming a well-formed worker id
/// - Status only moves forward (see [`WorkflowStatus::can_transition_to`])
///
/// # Example
/// ```
/// use orchestration_engine::domain::workflow::{Task, Workflow, WorkflowStatus};
/// use uuid::Uuid;
///
/// let workflow = Workflow::new(
///     "Weekly report",
///     vec![Task::new("seo_agent_001", Default::default())],
///     Uuid::new_v4(),
/// )
/// .expect("valid workflow");
///
/// assert_eq!(workflow.status(), WorkflowStatus::Pending);
/// ```
#[derive(Debug, Clone)]
pub struct Workflow {
    id: Uuid,
    name: String,
    tasks: Vec<Task>,
    status: WorkflowStatus,
    results: Vec<WorkerResult>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Creates a new pending workflow
    ///
    /// # Returns
    /// * `Ok(Workflow)` - New workflow in `Pending` status with a fresh id
    /// * `Err(String)` - If the name or task list violates an invariant
    pub fn new(name: impl Into<String>, tasks: Vec<Task>, owner_id: Uuid) -> Result<Self, String> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err("Workflow name cannot be empty".to_string());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(format!(
                "Workflow name cannot exceed {} characters",
                MAX_NAME_LEN
            ));
        }
        if tasks.is_empty() {
            return Err("Workflow must contain at least one task".to_string());
        }
        if tasks.len() > MAX_TASKS {
            return Err(format!("Workflow cannot contain more than {} tasks", MAX_TASKS));
        }
        for (index, task) in tasks.iter().enumerate() {
            validate_worker_id(&task.worker_id)
                .map_err(|e| format!("Task {}: {}", index + 1, e))?;
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            tasks,
            status: WorkflowStatus::Pending,
            results: Vec::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves the workflow to `next`, rejecting anything that is not a forward step
    pub fn transition_to(&mut self, next: WorkflowStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move workflow {} from {} to {}",
                self.id, self.status, next
            ));
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the accumulated results
    pub fn set_results(&mut self, results: Vec<WorkerResult>) {
        self.results = results;
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn results(&self) -> &[WorkerResult] {
        &self.results
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Id/name/status view used by listings
    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
        }
    }

    /// Reconstructs a Workflow from persistence layer data
    ///
    /// Bypasses validation since stored rows were validated on creation.
    /// Only to be used by store implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        tasks: Vec<Task>,
        status: WorkflowStatus,
        results: Vec<WorkerResult>,
        owner_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            tasks,
            status,
            results,
            owner_id,
            created_at,
            updated_at,
        }
    }
}

/// Listing entry for a workflow: no tasks, no results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: Uuid,
    pub name: String,
    pub status: WorkflowStatus,
}
