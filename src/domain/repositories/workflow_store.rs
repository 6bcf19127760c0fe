use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::worker::WorkerResult;
use crate::domain::workflow::{Workflow, WorkflowStatus, WorkflowSummary};

/// Repository trait for the Workflow aggregate
///
/// After creation a workflow has a single writer, the consumer executing it,
/// so partial updates are plain last-write-wins.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Insert a new workflow; fails with `Conflict` if the id already exists
    async fn insert(&self, workflow: &Workflow) -> Result<(), RepositoryError>;

    /// Find a workflow by id, optionally scoped to its owner
    ///
    /// Absence and owner mismatch both yield `NotFound`.
    async fn get(&self, id: Uuid, owner_id: Option<Uuid>) -> Result<Workflow, RepositoryError>;

    /// Move a workflow one step forward
    ///
    /// Anything other than a legal forward transition from the stored status
    /// fails with `InvalidTransition`, which makes the pending -> running step
    /// a claim that only one delivery can win.
    async fn update_status(&self, id: Uuid, next: WorkflowStatus) -> Result<(), RepositoryError>;

    /// Replace the accumulated results list
    async fn update_results(&self, id: Uuid, results: &[WorkerResult]) -> Result<(), RepositoryError>;

    /// Summaries of every workflow belonging to an owner, newest first
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<WorkflowSummary>, RepositoryError>;
}
