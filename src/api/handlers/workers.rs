use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::worker::{validate_worker_id, Worker, WorkerFilter, WorkerMetadata};

#[derive(Debug, Serialize)]
pub struct WorkerListResponse {
    pub workers: Vec<Worker>,
    pub count: usize,
}

/// Request body for registering a worker
#[derive(Debug, Deserialize)]
pub struct RegisterWorkerRequest {
    #[serde(alias = "agent_id")]
    pub id: String,
    #[serde(flatten)]
    pub metadata: WorkerMetadata,
}

/// List the worker catalog
///
/// GET /api/v1/workers?category=&capability=&q=
pub async fn list_workers(
    State(state): State<AppState>,
    Query(filter): Query<WorkerFilter>,
) -> Json<WorkerListResponse> {
    let workers = state.registry().describe(&filter);
    Json(WorkerListResponse {
        count: workers.len(),
        workers,
    })
}

/// Get one worker
///
/// GET /api/v1/workers/:id
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Worker>, ApiError> {
    let metadata = state.registry().get(&id)?;
    Ok(Json(Worker { id, metadata }))
}

/// Register or replace a worker
///
/// POST /api/v1/workers
pub async fn register_worker(
    State(state): State<AppState>,
    JwtAuth(_user_id): JwtAuth,
    Json(req): Json<RegisterWorkerRequest>,
) -> Result<(StatusCode, Json<Worker>), ApiError> {
    validate_worker_id(&req.id).map_err(ApiError::bad_request)?;

    let replaced = state.registry().register(req.id.clone(), req.metadata.clone());
    let status = if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(Worker {
            id: req.id,
            metadata: req.metadata,
        }),
    ))
}

/// Remove a worker
///
/// DELETE /api/v1/workers/:id
pub async fn unregister_worker(
    State(state): State<AppState>,
    JwtAuth(_user_id): JwtAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.registry().unregister(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Worker not found: {}", id)))
    }
}
