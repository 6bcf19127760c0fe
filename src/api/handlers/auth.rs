use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::domain::repositories::{RepositoryError, User};
use crate::domain::user::Username;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Response from successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user_id: Uuid,
}

/// Register a new user
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = Username::new(req.username)
        .map_err(|e| ApiError::bad_request(format!("Invalid username: {}", e)))?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;

    let user = User {
        id: Uuid::new_v4(),
        username,
        password_hash,
    };
    let username = user.username.clone();

    let user_id = state.users.create(user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => ApiError::conflict("Username already registered"),
        other => other.into(),
    })?;
    info!("User {} registered as {}", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login with username and password
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Malformed usernames cannot exist, so they are just bad credentials
    let username = Username::new(req.username).map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = create_token(user.id, &state.auth.jwt_secret, state.auth.token_ttl)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "bearer",
        expires_in: state.auth.token_ttl.num_seconds(),
        user_id: user.id,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
