use chrono::Duration;
use std::sync::Arc;

use crate::domain::repositories::UserRepository;
use crate::orchestration::{EventRecorder, WorkerRegistry, WorkflowCoordinator};

/// Token signing settings
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<WorkflowCoordinator>,
    pub users: Arc<dyn UserRepository>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(coordinator: Arc<WorkflowCoordinator>, users: Arc<dyn UserRepository>, auth: AuthSettings) -> Self {
        Self {
            coordinator,
            users,
            auth,
        }
    }

    pub fn registry(&self) -> &WorkerRegistry {
        self.coordinator.executor().registry()
    }

    pub fn events(&self) -> &dyn EventRecorder {
        self.coordinator.events().as_ref()
    }
}
