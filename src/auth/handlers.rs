use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use super::service::{AuthError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let resp = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(resp))))
}

/// Login user
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    match state.auth.login(req).await {
        Ok(resp) => Ok((StatusCode::OK, Json(ApiResponse::success(resp)))),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Err(e)
        }
    }
}
