use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;
use crate::domain::workflow::LifecycleEvent;

/// Sink for workflow lifecycle events
///
/// Callers treat delivery as best effort: a failed `record` is logged and
/// never fails the workflow that produced the event.
#[async_trait]
pub trait EventRecorder: Send + Sync {
    async fn record(&self, event: &LifecycleEvent) -> Result<(), RepositoryError>;

    /// Events for one owner, newest first
    async fn events_for_owner(&self, owner_id: Uuid, limit: usize) -> Result<Vec<LifecycleEvent>, RepositoryError>;
}
