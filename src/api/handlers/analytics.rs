use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::workflow::LifecycleEvent;

const DEFAULT_EVENT_LIMIT: usize = 100;
const MAX_EVENT_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<LifecycleEvent>,
    pub count: usize,
}

/// The caller's lifecycle events, newest first
///
/// GET /api/v1/analytics/events?limit=
pub async fn list_events(
    State(state): State<AppState>,
    JwtAuth(owner_id): JwtAuth,
    Query(query): Query<EventQuery>,
) -> Result<Json<EventListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT).clamp(1, MAX_EVENT_LIMIT);
    let events = state.events().events_for_owner(owner_id, limit).await?;

    Ok(Json(EventListResponse {
        count: events.len(),
        events,
    }))
}
