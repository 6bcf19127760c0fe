//! Workflow façade: creation, asynchronous execution and status queries

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::context::SharedContext;
use super::dispatcher::{DispatchQueue, Dispatcher};
use super::errors::{OrchestrationError, OrchestrationResult};
use super::events::EventRecorder;
use super::strategy::StrategyExecutor;
use crate::domain::repositories::{RepositoryError, WorkflowStore};
use crate::domain::worker::WorkerResult;
use crate::domain::workflow::{LifecycleEvent, Task, Workflow, WorkflowStatus, WorkflowSummary};
use crate::domain::Payload;

pub const DEFAULT_STATUS_PATH: &str = "/api/v1/workflows";

/// Returned to the caller as soon as a workflow is accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedWorkflow {
    pub workflow_id: Uuid,
    pub status_url: String,
}

/// Point-in-time view of a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStatusView {
    pub id: Uuid,
    pub name: String,
    pub status: WorkflowStatus,
    pub results: Vec<WorkerResult>,
}

impl From<Workflow> for WorkflowStatusView {
    fn from(workflow: Workflow) -> Self {
        Self {
            id: workflow.id(),
            name: workflow.name().to_string(),
            status: workflow.status(),
            results: workflow.results().to_vec(),
        }
    }
}

pub struct WorkflowCoordinator {
    store: Arc<dyn WorkflowStore>,
    executor: StrategyExecutor,
    dispatcher: Arc<dyn Dispatcher>,
    events: Arc<dyn EventRecorder>,
    task_timeout: Duration,
    status_path: String,
}

impl WorkflowCoordinator {
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        executor: StrategyExecutor,
        dispatcher: Arc<dyn Dispatcher>,
        events: Arc<dyn EventRecorder>,
        task_timeout: Duration,
    ) -> Self {
        Self {
            store,
            executor,
            dispatcher,
            events,
            task_timeout,
            status_path: DEFAULT_STATUS_PATH.to_string(),
        }
    }

    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = path.into().trim_end_matches('/').to_string();
        self
    }

    pub fn executor(&self) -> &StrategyExecutor {
        &self.executor
    }

    pub fn events(&self) -> &Arc<dyn EventRecorder> {
        &self.events
    }

    /// Validate, persist as pending and queue for execution
    #[instrument(skip(self, tasks))]
    pub async fn create(
        &self,
        name: &str,
        tasks: Vec<Task>,
        owner_id: Uuid,
    ) -> OrchestrationResult<CreatedWorkflow> {
        let workflow = Workflow::new(name, tasks, owner_id).map_err(OrchestrationError::InvalidWorkflow)?;
        let workflow_id = workflow.id();

        self.store.insert(&workflow).await?;
        info!(
            "Workflow {} '{}' created with {} tasks",
            workflow_id,
            workflow.name(),
            workflow.tasks().len()
        );
        self.emit(LifecycleEvent::created(workflow_id, owner_id)).await;

        if let Err(e) = self.dispatcher.enqueue(workflow_id).await {
            error!("Workflow {} persisted but not queued: {}", workflow_id, e);
            return Err(e);
        }

        Ok(CreatedWorkflow {
            workflow_id,
            status_url: format!("{}/{}", self.status_path, workflow_id),
        })
    }

    /// Drive one workflow from pending to a terminal status
    ///
    /// Returns the status the workflow ended in. A delivery for a workflow
    /// that already left pending is skipped and its current status returned.
    #[instrument(skip(self))]
    pub async fn execute(&self, workflow_id: Uuid) -> OrchestrationResult<WorkflowStatus> {
        let workflow = self
            .store
            .get(workflow_id, None)
            .await
            .map_err(|e| self.infrastructure_failure(workflow_id, e))?;

        match self.store.update_status(workflow_id, WorkflowStatus::Running).await {
            Ok(()) => {}
            Err(RepositoryError::InvalidTransition { from, .. }) => {
                warn!(
                    "Workflow {} already {}; skipping duplicate delivery",
                    workflow_id, from
                );
                return Ok(workflow.status());
            }
            Err(e) => return Err(self.infrastructure_failure(workflow_id, e)),
        }

        let owner_id = workflow.owner_id();
        let started = Instant::now();
        info!("Executing workflow {} '{}'", workflow_id, workflow.name());
        self.emit(LifecycleEvent::started(workflow_id, owner_id)).await;

        let context = SharedContext::new(Uuid::new_v4(), owner_id, None, Payload::new());
        let mut results: Vec<WorkerResult> = Vec::with_capacity(workflow.tasks().len());
        let mut final_status = WorkflowStatus::Completed;

        for (index, task) in workflow.tasks().iter().enumerate() {
            let task_started = Instant::now();
            let outcome = self
                .executor
                .invoke_worker(&task.worker_id, &task.task_payload, &context, self.task_timeout)
                .await;
            let elapsed = task_started.elapsed();

            let event = match outcome {
                Ok(output) => {
                    info!("Task {} completed by worker {}", index + 1, task.worker_id);
                    context
                        .set(format!("{}_output", task.worker_id), Value::Object(output.clone()))
                        .await;
                    results.push(WorkerResult::success(&task.worker_id, output, elapsed));
                    LifecycleEvent::task_completed(workflow_id, owner_id, &task.worker_id, elapsed)
                }
                Err(e) => {
                    error!(
                        "Task {} for worker {} failed: {}. Aborting workflow.",
                        index + 1,
                        task.worker_id,
                        e
                    );
                    results.push(WorkerResult::failure(&task.worker_id, &e, elapsed));
                    final_status = WorkflowStatus::Failed;
                    LifecycleEvent::task_failed(workflow_id, owner_id, &task.worker_id, elapsed)
                }
            };

            self.store
                .update_results(workflow_id, &results)
                .await
                .map_err(|e| self.infrastructure_failure(workflow_id, e))?;
            self.emit(event).await;

            if final_status == WorkflowStatus::Failed {
                break;
            }
        }

        self.store
            .update_status(workflow_id, final_status)
            .await
            .map_err(|e| self.infrastructure_failure(workflow_id, e))?;

        let duration = started.elapsed();
        info!("Workflow {} finished as {} in {:?}", workflow_id, final_status, duration);
        self.emit(LifecycleEvent::finished(workflow_id, owner_id, final_status, duration))
            .await;

        Ok(final_status)
    }

    pub async fn get_status(&self, workflow_id: Uuid, owner_id: Uuid) -> OrchestrationResult<WorkflowStatusView> {
        let workflow = self.store.get(workflow_id, Some(owner_id)).await?;
        Ok(workflow.into())
    }

    pub async fn list(&self, owner_id: Uuid) -> OrchestrationResult<Vec<WorkflowSummary>> {
        Ok(self.store.list_for_owner(owner_id).await?)
    }

    /// Consume dispatched ids until every dispatcher is dropped
    pub async fn run_consumer(self: Arc<Self>, mut queue: DispatchQueue) {
        info!("Workflow consumer started");
        while let Some(workflow_id) = queue.next().await {
            if let Err(e) = self.execute(workflow_id).await {
                error!("Workflow {} left in its last known status: {}", workflow_id, e);
            }
        }
        info!("Dispatch queue closed, workflow consumer stopped");
    }

    pub fn spawn_consumer(self: &Arc<Self>, queue: DispatchQueue) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run_consumer(queue))
    }

    async fn emit(&self, event: LifecycleEvent) {
        if let Err(e) = self.events.record(&event).await {
            warn!(
                "Failed to record {} event for workflow {}: {}",
                event.kind, event.workflow_id, e
            );
        }
    }

    fn infrastructure_failure(&self, workflow_id: Uuid, error: RepositoryError) -> OrchestrationError {
        error!("Persistence failure while executing workflow {}: {}", workflow_id, error);
        error.into()
    }
}
