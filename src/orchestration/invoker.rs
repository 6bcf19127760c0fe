//! Boundary between the orchestration core and the workers it calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::context::ContextEnvelope;
use super::errors::InvocationError;
use crate::domain::Payload;

/// One call to a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(skip)]
    pub worker_id: String,
    pub task_payload: Payload,
    pub context: ContextEnvelope,
}

/// Transport used to reach a worker endpoint
///
/// Implementations do not enforce a deadline; the executor wraps every call
/// in its own timeout.
#[async_trait]
pub trait WorkerInvoker: Send + Sync {
    async fn invoke(
        &self,
        endpoint: &str,
        request: &InvocationRequest,
    ) -> Result<Payload, InvocationError>;
}

type Handler = Arc<dyn Fn(&InvocationRequest) -> Result<Payload, String> + Send + Sync>;

/// Invoker that runs workers in-process
///
/// Handlers are looked up by worker id, so the endpoint is ignored. Used for
/// embedded workers and in tests.
#[derive(Clone, Default)]
pub struct LocalInvoker {
    handlers: HashMap<String, Handler>,
    latency: HashMap<String, Duration>,
}

impl LocalInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler<F>(mut self, worker_id: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&InvocationRequest) -> Result<Payload, String> + Send + Sync + 'static,
    {
        self.handlers.insert(worker_id.into(), Arc::new(handler));
        self
    }

    /// Delay every call to `worker_id` by `latency`
    pub fn latency(mut self, worker_id: impl Into<String>, latency: Duration) -> Self {
        self.latency.insert(worker_id.into(), latency);
        self
    }
}

#[async_trait]
impl WorkerInvoker for LocalInvoker {
    async fn invoke(
        &self,
        _endpoint: &str,
        request: &InvocationRequest,
    ) -> Result<Payload, InvocationError> {
        if let Some(latency) = self.latency.get(&request.worker_id) {
            tokio::time::sleep(*latency).await;
        }

        let handler = self.handlers.get(&request.worker_id).ok_or_else(|| {
            InvocationError::Transport(format!("no local handler for {}", request.worker_id))
        })?;

        handler(request).map_err(InvocationError::Rejected)
    }
}
