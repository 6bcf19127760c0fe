use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{analytics, auth, teams, workers, workflows};
use super::state::AppState;

/// Full HTTP surface
///
/// CORS is left to the caller since allowed origins come from configuration.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(auth::health_check))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route(
            "/api/v1/workers",
            get(workers::list_workers).post(workers::register_worker),
        )
        .route(
            "/api/v1/workers/:id",
            get(workers::get_worker).delete(workers::unregister_worker),
        )
        .route(
            "/api/v1/workflows",
            post(workflows::create_workflow).get(workflows::list_workflows),
        )
        .route("/api/v1/workflows/:id", get(workflows::get_workflow))
        .route("/api/v1/teams/execute", post(teams::execute_team))
        .route("/api/v1/analytics/events", get(analytics::list_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
