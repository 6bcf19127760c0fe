//! Run-scoped key/value store shared by every worker invoked in one run

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Payload;

/// Mutable context propagated across one run
///
/// Clones share the same map. Each `get`/`set` is atomic on its own, but
/// concurrent writers are not ordered: in parallel runs the last write to a
/// key wins. A fresh context is created per run, so nothing leaks between
/// runs.
#[derive(Debug, Clone)]
pub struct SharedContext {
    run_id: Uuid,
    owner_id: Uuid,
    team_id: Option<String>,
    data: Arc<RwLock<Payload>>,
}

/// Serializable view of a context sent along with each invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEnvelope {
    pub run_id: Uuid,
    pub owner_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub data: Payload,
}

impl SharedContext {
    pub fn new(run_id: Uuid, owner_id: Uuid, team_id: Option<String>, seed: Payload) -> Self {
        Self {
            run_id,
            owner_id,
            team_id,
            data: Arc::new(RwLock::new(seed)),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    /// Value stored under `key`, or `default` when absent
    pub async fn get(&self, key: &str, default: Value) -> Value {
        self.data.read().await.get(key).cloned().unwrap_or(default)
    }

    /// Store `value` under `key`, returning what it replaced
    pub async fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.write().await.insert(key.into(), value)
    }

    pub async fn snapshot(&self) -> Payload {
        self.data.read().await.clone()
    }

    pub async fn envelope(&self) -> ContextEnvelope {
        ContextEnvelope {
            run_id: self.run_id,
            owner_id: self.owner_id,
            team_id: self.team_id.clone(),
            data: self.snapshot().await,
        }
    }
}
