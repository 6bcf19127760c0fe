use axum::{extract::State, Json};
use serde::Deserialize;
use std::time::Duration;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::team::{TeamConfiguration, TeamMember, TeamResult, TeamStrategy, DEFAULT_TEAM_TIMEOUT_SECS};
use crate::domain::Payload;
use crate::orchestration::OrchestrationError;

/// Request body for running a team
#[derive(Debug, Deserialize)]
pub struct ExecuteTeamRequest {
    pub team_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub input: Payload,
    #[serde(default)]
    pub shared_context: Payload,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ExecuteTeamRequest {
    fn into_configuration(self) -> Result<(TeamConfiguration, Payload), OrchestrationError> {
        let strategy = match self.strategy.as_deref() {
            Some(name) => name
                .parse::<TeamStrategy>()
                .map_err(OrchestrationError::StrategyMisconfigured)?,
            None => TeamStrategy::default(),
        };

        let timeout = Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TEAM_TIMEOUT_SECS));
        let mut config = TeamConfiguration::new(self.team_id, strategy, self.members)
            .with_timeout(timeout)
            .with_shared_context(self.shared_context);
        if let Some(name) = self.name {
            config.name = name;
        }

        Ok((config, self.input))
    }
}

/// Run a team synchronously
///
/// POST /api/v1/teams/execute
///
/// Member failures are reported in the returned TeamResult, not as an HTTP
/// error.
pub async fn execute_team(
    State(state): State<AppState>,
    JwtAuth(owner_id): JwtAuth,
    Json(req): Json<ExecuteTeamRequest>,
) -> Result<Json<TeamResult>, ApiError> {
    let (config, input) = req.into_configuration()?;
    let result = state.coordinator.executor().execute(&config, &input, owner_id).await;
    Ok(Json(result))
}
