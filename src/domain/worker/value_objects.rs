use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Longest accepted worker id
pub const MAX_WORKER_ID_LEN: usize = 100;

/// Validates a worker id
///
/// # Validation Rules
/// - 1 to 100 characters
/// - Only ASCII letters, digits, underscores and hyphens
///
/// # Example
/// ```
/// use orchestration_engine::domain::worker::validate_worker_id;
///
/// assert!(validate_worker_id("seo_agent-001").is_ok());
/// assert!(validate_worker_id("seo agent").is_err());
/// ```
pub fn validate_worker_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Worker id cannot be empty".to_string());
    }
    if id.len() > MAX_WORKER_ID_LEN {
        return Err(format!(
            "Worker id cannot exceed {} characters",
            MAX_WORKER_ID_LEN
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!(
            "Invalid worker id '{}': only letters, numbers, underscores and hyphens are allowed",
            id
        ));
    }
    Ok(())
}

/// Everything the registry knows about a worker apart from its id
///
/// `url` is accepted as an alias of `endpoint` so definition files written
/// for the older catalog format load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl WorkerMetadata {
    /// Metadata with only an endpoint set
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Checks this worker against every criterion set on the filter
    pub fn matches(&self, filter: &WorkerFilter) -> bool {
        if let Some(category) = &filter.category {
            match &self.category {
                Some(own) if own.eq_ignore_ascii_case(category) => {}
                _ => return false,
            }
        }

        if let Some(capability) = &filter.capability {
            if !self.capabilities.contains(capability) {
                return false;
            }
        }

        if let Some(query) = &filter.query {
            let query = query.to_lowercase();
            let in_name = self
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&query));
            let in_description = self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query));
            if !in_name && !in_description {
                return false;
            }
        }

        true
    }
}

/// A registered worker: its id plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    #[serde(flatten)]
    pub metadata: WorkerMetadata,
}

/// Criteria for listing workers; unset fields match everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerFilter {
    pub category: Option<String>,
    pub capability: Option<String>,
    #[serde(alias = "q")]
    pub query: Option<String>,
}

impl WorkerFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn capability(capability: impl Into<String>) -> Self {
        Self {
            capability: Some(capability.into()),
            ..Self::default()
        }
    }

    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}
