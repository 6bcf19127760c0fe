use std::time::Duration;
use thiserror::Error;

use crate::domain::repositories::RepositoryError;

/// Failures at the worker invocation boundary
///
/// Every way a remote call can go wrong collapses into one of these.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("worker responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("worker reported an error: {0}")]
    Rejected(String),
}

/// Errors that can occur in the orchestration core
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("Worker not found: {0}")]
    WorkerNotFound(String),

    #[error("Worker {worker_id} invocation failed: {source}")]
    WorkerInvocation {
        worker_id: String,
        source: InvocationError,
    },

    #[error("Required member {worker_id} failed: {source}")]
    RequiredMemberFailed {
        worker_id: String,
        source: Box<OrchestrationError>,
    },

    #[error("Strategy misconfigured: {0}")]
    StrategyMisconfigured(String),

    #[error("Member task aborted: {0}")]
    MemberAborted(String),

    #[error("Invalid workflow: {0}")]
    InvalidWorkflow(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

impl OrchestrationError {
    /// Wraps a member failure so the run reports which required seat broke
    pub fn required(worker_id: impl Into<String>, source: OrchestrationError) -> Self {
        OrchestrationError::RequiredMemberFailed {
            worker_id: worker_id.into(),
            source: Box::new(source),
        }
    }

    /// True for unknown or endpoint-less workers
    pub fn is_resolution(&self) -> bool {
        match self {
            OrchestrationError::WorkerNotFound(_) => true,
            OrchestrationError::RequiredMemberFailed { source, .. } => source.is_resolution(),
            _ => false,
        }
    }
}

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_failure_keeps_cause_in_message() {
        let error = OrchestrationError::required(
            "b",
            OrchestrationError::WorkerInvocation {
                worker_id: "b".to_string(),
                source: InvocationError::HttpStatus(503),
            },
        );

        assert_eq!(
            error.to_string(),
            "Required member b failed: Worker b invocation failed: worker responded with HTTP 503"
        );
        assert!(!error.is_resolution());
    }

    #[test]
    fn resolution_errors_are_detected_through_wrapping() {
        let error = OrchestrationError::required("ghost", OrchestrationError::WorkerNotFound("ghost".into()));
        assert!(error.is_resolution());
    }
}
