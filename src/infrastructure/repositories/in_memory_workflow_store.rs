use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, WorkflowStore};
use crate::domain::worker::WorkerResult;
use crate::domain::workflow::{Workflow, WorkflowStatus, WorkflowSummary};

/// Process-local WorkflowStore for tests and single-node deployments
#[derive(Debug, Default)]
pub struct InMemoryWorkflowStore {
    workflows: DashMap<Uuid, Workflow>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound(format!("workflow {}", id))
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn insert(&self, workflow: &Workflow) -> Result<(), RepositoryError> {
        match self.workflows.entry(workflow.id()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "workflow {} already exists",
                workflow.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(workflow.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid, owner_id: Option<Uuid>) -> Result<Workflow, RepositoryError> {
        let workflow = self.workflows.get(&id).ok_or_else(|| not_found(id))?;
        match owner_id {
            Some(owner) if workflow.owner_id() != owner => Err(not_found(id)),
            _ => Ok(workflow.clone()),
        }
    }

    async fn update_status(&self, id: Uuid, next: WorkflowStatus) -> Result<(), RepositoryError> {
        let mut workflow = self.workflows.get_mut(&id).ok_or_else(|| not_found(id))?;
        let current = workflow.status();
        workflow
            .transition_to(next)
            .map_err(|_| RepositoryError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            })
    }

    async fn update_results(&self, id: Uuid, results: &[WorkerResult]) -> Result<(), RepositoryError> {
        let mut workflow = self.workflows.get_mut(&id).ok_or_else(|| not_found(id))?;
        workflow.set_results(results.to_vec());
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<WorkflowSummary>, RepositoryError> {
        let mut owned: Vec<(chrono::DateTime<chrono::Utc>, WorkflowSummary)> = self
            .workflows
            .iter()
            .filter(|entry| entry.owner_id() == owner_id)
            .map(|entry| (entry.created_at(), entry.summary()))
            .collect();
        owned.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(owned.into_iter().map(|(_, summary)| summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::Task;
    use crate::domain::Payload;

    fn workflow(owner: Uuid) -> Workflow {
        Workflow::new("report", vec![Task::new("summarizer", Payload::new())], owner).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = InMemoryWorkflowStore::new();
        let wf = workflow(Uuid::new_v4());

        store.insert(&wf).await.unwrap();
        assert!(matches!(store.insert(&wf).await, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn get_hides_other_owners_workflows() {
        let store = InMemoryWorkflowStore::new();
        let owner = Uuid::new_v4();
        let wf = workflow(owner);
        store.insert(&wf).await.unwrap();

        assert!(store.get(wf.id(), Some(owner)).await.is_ok());
        assert!(store.get(wf.id(), None).await.is_ok());
        assert!(matches!(
            store.get(wf.id(), Some(Uuid::new_v4())).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            store.get(Uuid::new_v4(), None).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn status_never_regresses() {
        let store = InMemoryWorkflowStore::new();
        let wf = workflow(Uuid::new_v4());
        store.insert(&wf).await.unwrap();

        store.update_status(wf.id(), WorkflowStatus::Running).await.unwrap();
        assert!(store.update_status(wf.id(), WorkflowStatus::Running).await.is_err());
        store.update_status(wf.id(), WorkflowStatus::Completed).await.unwrap();

        let error = store.update_status(wf.id(), WorkflowStatus::Running).await.unwrap_err();
        assert!(matches!(
            error,
            RepositoryError::InvalidTransition { ref from, ref to } if from == "completed" && to == "running"
        ));
        assert_eq!(store.get(wf.id(), None).await.unwrap().status(), WorkflowStatus::Completed);
    }

    #[tokio::test]
    async fn results_are_replaced() {
        let store = InMemoryWorkflowStore::new();
        let wf = workflow(Uuid::new_v4());
        store.insert(&wf).await.unwrap();

        let first = WorkerResult::success("summarizer", Payload::new(), std::time::Duration::ZERO);
        store.update_results(wf.id(), &[first.clone()]).await.unwrap();
        store.update_results(wf.id(), &[first.clone(), first]).await.unwrap();

        assert_eq!(store.get(wf.id(), None).await.unwrap().results().len(), 2);
    }

    #[tokio::test]
    async fn list_only_returns_owner_summaries() {
        let store = InMemoryWorkflowStore::new();
        let owner = Uuid::new_v4();
        store.insert(&workflow(owner)).await.unwrap();
        store.insert(&workflow(owner)).await.unwrap();
        store.insert(&workflow(Uuid::new_v4())).await.unwrap();

        let summaries = store.list_for_owner(owner).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.status == WorkflowStatus::Pending));
    }
}
