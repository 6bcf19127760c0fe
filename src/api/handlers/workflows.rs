use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::workflow::{Task, WorkflowSummary};
use crate::orchestration::WorkflowStatusView;

/// Request body for creating a workflow
#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// Response from workflow creation
#[derive(Debug, Serialize)]
pub struct CreateWorkflowResponse {
    pub message: String,
    pub workflow_id: Uuid,
    pub status_url: String,
}

#[derive(Debug, Serialize)]
pub struct WorkflowListResponse {
    pub workflows: Vec<WorkflowSummary>,
}

/// Accept a workflow for asynchronous execution
///
/// POST /api/v1/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    JwtAuth(owner_id): JwtAuth,
    Json(req): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<CreateWorkflowResponse>), ApiError> {
    let created = state.coordinator.create(&req.name, req.tasks, owner_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateWorkflowResponse {
            message: "Workflow accepted for processing".to_string(),
            workflow_id: created.workflow_id,
            status_url: created.status_url,
        }),
    ))
}

/// List the caller's workflows, newest first
///
/// GET /api/v1/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
    JwtAuth(owner_id): JwtAuth,
) -> Result<Json<WorkflowListResponse>, ApiError> {
    let workflows = state.coordinator.list(owner_id).await?;
    Ok(Json(WorkflowListResponse { workflows }))
}

/// Status and results of one of the caller's workflows
///
/// GET /api/v1/workflows/:id
pub async fn get_workflow(
    State(state): State<AppState>,
    JwtAuth(owner_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowStatusView>, ApiError> {
    let view = state.coordinator.get_status(id, owner_id).await?;
    Ok(Json(view))
}
