use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;
use crate::domain::workflow::LifecycleEvent;
use crate::orchestration::EventRecorder;

/// Keeps every recorded event in memory, in arrival order
#[derive(Debug, Default)]
pub struct InMemoryEventRecorder {
    events: RwLock<Vec<LifecycleEvent>>,
}

impl InMemoryEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<LifecycleEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventRecorder for InMemoryEventRecorder {
    async fn record(&self, event: &LifecycleEvent) -> Result<(), RepositoryError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn events_for_owner(&self, owner_id: Uuid, limit: usize) -> Result<Vec<LifecycleEvent>, RepositoryError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| e.owner_id == owner_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
