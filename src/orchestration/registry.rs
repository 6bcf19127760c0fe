//! In-memory catalog of invocable workers

use dashmap::DashMap;
use tracing::debug;

use super::errors::{OrchestrationError, OrchestrationResult};
use crate::domain::worker::{Worker, WorkerFilter, WorkerMetadata};

/// Maps worker ids to their endpoints and capabilities
///
/// Read-mostly and safe to share behind an `Arc`; every operation is a
/// single atomic map access.
#[derive(Debug, Default)]
pub struct WorkerRegistry {
    workers: DashMap<String, WorkerMetadata>,
    default_endpoint: Option<String>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose endpoint-less workers resolve to a shared runner
    pub fn with_default_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            workers: DashMap::new(),
            default_endpoint: Some(endpoint.into()),
        }
    }

    /// Insert or replace a worker; last write wins
    ///
    /// Returns `true` when an existing entry was replaced.
    pub fn register(&self, id: impl Into<String>, metadata: WorkerMetadata) -> bool {
        let id = id.into();
        let replaced = self.workers.insert(id.clone(), metadata).is_some();
        if replaced {
            debug!("Worker {} already registered. Updated metadata.", id);
        } else {
            debug!("Worker {} registered.", id);
        }
        replaced
    }

    /// Remove a worker; absent ids are ignored
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.workers.remove(id).is_some();
        if removed {
            debug!("Worker {} unregistered.", id);
        }
        removed
    }

    pub fn get(&self, id: &str) -> OrchestrationResult<WorkerMetadata> {
        self.workers
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| OrchestrationError::WorkerNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.workers.contains_key(id)
    }

    /// Ids of the workers matching `filter`, in no particular order
    pub fn list(&self, filter: &WorkerFilter) -> Vec<String> {
        self.workers
            .iter()
            .filter(|entry| entry.value().matches(filter))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Full records for the workers matching `filter`, sorted by id
    pub fn describe(&self, filter: &WorkerFilter) -> Vec<Worker> {
        let mut workers: Vec<Worker> = self
            .workers
            .iter()
            .filter(|entry| entry.value().matches(filter))
            .map(|entry| Worker {
                id: entry.key().clone(),
                metadata: entry.value().clone(),
            })
            .collect();
        workers.sort_by(|a, b| a.id.cmp(&b.id));
        workers
    }

    /// Endpoint to invoke for `id`
    ///
    /// Workers registered without an endpoint fall back to the default
    /// endpoint; without one they cannot be resolved.
    pub fn resolve(&self, id: &str) -> OrchestrationResult<String> {
        let entry = self
            .workers
            .get(id)
            .ok_or_else(|| OrchestrationError::WorkerNotFound(id.to_string()))?;

        entry
            .value()
            .endpoint
            .clone()
            .or_else(|| self.default_endpoint.clone())
            .ok_or_else(|| OrchestrationError::WorkerNotFound(format!("{} (no endpoint)", id)))
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
