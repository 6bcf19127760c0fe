// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod repositories;
pub mod team;
pub mod user;
pub mod worker;
pub mod workflow;

/// Opaque JSON object exchanged with workers
pub type Payload = serde_json::Map<String, serde_json::Value>;
