use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::models::{SortOrder, WalletSortBy, WalletStatus, WalletType};
use super::repository::WalletFilter;
use super::service::{PaginatedWallets, WalletDto, WalletError, WalletListing, WalletUpdate};
use crate::auth::middleware::AuthUser;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWalletRequest {
    #[serde(rename = "type")]
    #[schema(example = "standard")]
    pub wallet_type: WalletType,
    #[validate(length(min = 3, max = 10))]
    #[schema(example = "USD")]
    pub currency: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWalletRequest {
    #[serde(rename = "type")]
    pub wallet_type: Option<WalletType>,
    pub status: Option<WalletStatus>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWalletsQuery {
    /// 1-based page number
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    /// Page size, capped at 100
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub status: Option<WalletStatus>,
    #[serde(rename = "type")]
    pub wallet_type: Option<WalletType>,
    pub currency: Option<String>,
    pub sort_by: Option<WalletSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ListWalletsQuery {
    fn into_listing(self) -> WalletListing {
        let defaults = WalletListing::default();
        WalletListing {
            filter: WalletFilter {
                status: self.status,
                wallet_type: self.wallet_type,
                currency: self.currency,
            },
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            sort_order: self.sort_order.unwrap_or(defaults.sort_order),
        }
    }
}

/// Create a new wallet
///
/// POST /api/v1/wallets
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created successfully", body = ApiResponse<WalletDto>),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Active wallet limit reached"),
        (status = 409, description = "Wallet already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WalletDto>>), WalletError> {
    req.validate()
        .map_err(|e| WalletError::Validation(e.to_string()))?;

    let wallet = state
        .wallets
        .create_wallet(auth.user_id, req.wallet_type, &req.currency)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(wallet))))
}

/// List user wallets
///
/// GET /api/v1/wallets
#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    params(ListWalletsQuery),
    responses(
        (status = 200, description = "Wallets retrieved successfully", body = ApiResponse<PaginatedWallets>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn list_wallets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListWalletsQuery>,
) -> Result<(StatusCode, Json<ApiResponse<PaginatedWallets>>), WalletError> {
    query
        .validate()
        .map_err(|e| WalletError::Validation(e.to_string()))?;

    let page = state
        .wallets
        .list_wallets(auth.user_id, query.into_listing())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(page))))
}

/// Get wallet by ID
///
/// GET /api/v1/wallets/{wallet_id}
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet_id}",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet retrieved successfully", body = ApiResponse<WalletDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(wallet_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<WalletDto>>), WalletError> {
    let wallet = state.wallets.get_wallet(auth.user_id, wallet_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(wallet))))
}

/// Update wallet type/status
///
/// PUT /api/v1/wallets/{wallet_id}
#[utoipa::path(
    put,
    path = "/api/v1/wallets/{wallet_id}",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    request_body = UpdateWalletRequest,
    responses(
        (status = 200, description = "Wallet updated successfully", body = ApiResponse<WalletDto>),
        (status = 400, description = "Empty update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn update_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(wallet_id): Path<Uuid>,
    Json(req): Json<UpdateWalletRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WalletDto>>), WalletError> {
    let wallet = state
        .wallets
        .update_wallet(
            auth.user_id,
            wallet_id,
            WalletUpdate {
                wallet_type: req.wallet_type,
                status: req.status,
            },
        )
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(wallet))))
}

/// Delete wallet
///
/// DELETE /api/v1/wallets/{wallet_id}
#[utoipa::path(
    delete,
    path = "/api/v1/wallets/{wallet_id}",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 204, description = "Wallet deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Wallet has a balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn delete_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(wallet_id): Path<Uuid>,
) -> Result<StatusCode, WalletError> {
    state.wallets.delete_wallet(auth.user_id, wallet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Freeze wallet
///
/// PATCH /api/v1/wallets/{wallet_id}/freeze
#[utoipa::path(
    patch,
    path = "/api/v1/wallets/{wallet_id}/freeze",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet frozen successfully", body = ApiResponse<WalletDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Wallet is already frozen")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn freeze_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(wallet_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<WalletDto>>), WalletError> {
    let wallet = state.wallets.freeze_wallet(auth.user_id, wallet_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(wallet))))
}

/// Unfreeze wallet
///
/// PATCH /api/v1/wallets/{wallet_id}/unfreeze
#[utoipa::path(
    patch,
    path = "/api/v1/wallets/{wallet_id}/unfreeze",
    params(("wallet_id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet unfrozen successfully", body = ApiResponse<WalletDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found"),
        (status = 409, description = "Wallet is not frozen")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallets"
)]
pub async fn unfreeze_wallet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(wallet_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<WalletDto>>), WalletError> {
    let wallet = state
        .wallets
        .unfreeze_wallet(auth.user_id, wallet_id)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(wallet))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_parses_type() {
        let req: CreateWalletRequest =
            serde_json::from_str(r#"{"type": "escrow", "currency": "USD"}"#).unwrap();
        assert_eq!(req.wallet_type, WalletType::Escrow);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_currency_length() {
        let req: CreateWalletRequest =
            serde_json::from_str(r#"{"type": "standard", "currency": "US"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_type() {
        let result: Result<CreateWalletRequest, _> =
            serde_json::from_str(r#"{"type": "offshore", "currency": "USD"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListWalletsQuery = serde_json::from_str("{}").unwrap();
        let listing = query.into_listing();
        assert_eq!(listing.page, 1);
        assert_eq!(listing.limit, 10);
    }

    #[test]
    fn test_list_query_bounds() {
        let query: ListWalletsQuery = serde_json::from_str(r#"{"limit": 500}"#).unwrap();
        assert!(query.validate().is_err(), "limit above 100 should fail");

        let query: ListWalletsQuery = serde_json::from_str(r#"{"page": 0}"#).unwrap();
        assert!(query.validate().is_err(), "page 0 should fail");
    }
}
