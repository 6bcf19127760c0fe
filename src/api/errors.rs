use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::auth::jwt::TokenError;
use crate::auth::password::CredentialError;
use crate::domain::repositories::RepositoryError;
use crate::orchestration::OrchestrationError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(what) => Self::not_found(format!("Not found: {}", what)),
            RepositoryError::Conflict(what) => Self::conflict(what),
            RepositoryError::InvalidTransition { .. } => Self::conflict(e.to_string()),
            RepositoryError::Serialization(_) | RepositoryError::Database(_) => {
                error!("Repository failure: {}", e);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<OrchestrationError> for ApiError {
    fn from(e: OrchestrationError) -> Self {
        match e {
            OrchestrationError::Repository(inner) => inner.into(),
            OrchestrationError::WorkerNotFound(_) => Self::not_found(e.to_string()),
            OrchestrationError::InvalidWorkflow(message) => Self::bad_request(message),
            OrchestrationError::StrategyMisconfigured(_) => Self::bad_request(e.to_string()),
            OrchestrationError::WorkerInvocation { .. }
            | OrchestrationError::RequiredMemberFailed { .. }
            | OrchestrationError::MemberAborted(_)
            | OrchestrationError::Dispatch(_) => {
                error!("Orchestration failure: {}", e);
                Self::internal_server_error(e.to_string())
            }
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Hashing(_) => {
                error!("{}", e);
                Self::internal_server_error("Failed to process credentials")
            }
            _ => Self::bad_request(e.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(_) => {
                error!("{}", e);
                Self::internal_server_error("Failed to create token")
            }
            _ => Self::unauthorized(e.to_string()),
        }
    }
}
