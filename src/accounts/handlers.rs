use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::service::{AccountDto, AccountError};
use crate::auth::middleware::AuthUser;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;

/// List user accounts
///
/// GET /api/v1/accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AccountDto>>>), AccountError> {
    let accounts = state.accounts.list_accounts(auth.user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(accounts))))
}

/// Get account by ID
///
/// GET /api/v1/accounts/{account_id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    params(("account_id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(account_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), AccountError> {
    let account = state.accounts.get_account(auth.user_id, account_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(account))))
}
