use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::{
    MAX_ACTIVE_WALLETS, SortOrder, Wallet, WalletSortBy, WalletStatus, WalletType,
};
use super::repository::{WalletFilter, WalletRepository};
use crate::events::{EventPublisher, topics};
use crate::gateway::types::{ApiResponse, Pagination, error_codes};
use crate::users::repository::UserRepository;

/// Wallet view returned by every wallet endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
    pub currency: String,
    /// Serialized as a string to preserve precision
    #[schema(value_type = String, example = "0.00")]
    pub balance: Decimal,
    pub status: WalletStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletDto {
    fn from_wallet(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            wallet_type: wallet.wallet_type,
            currency: wallet.currency,
            balance: wallet.balance,
            status: wallet.status,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

/// One page of wallets plus pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedWallets {
    pub items: Vec<WalletDto>,
    pub pagination: Pagination,
}

/// Listing parameters after validation
#[derive(Debug)]
pub struct WalletListing {
    pub filter: WalletFilter,
    pub page: u32,
    pub limit: u32,
    pub sort_by: WalletSortBy,
    pub sort_order: SortOrder,
}

impl Default for WalletListing {
    fn default() -> Self {
        Self {
            filter: WalletFilter::default(),
            page: 1,
            limit: 10,
            sort_by: WalletSortBy::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug)]
pub struct WalletUpdate {
    pub wallet_type: Option<WalletType>,
    pub status: Option<WalletStatus>,
}

#[derive(Debug, Serialize)]
struct WalletCreatedPayload {
    user_id: Uuid,
    wallet_id: Uuid,
    #[serde(rename = "type")]
    wallet_type: WalletType,
    currency: String,
    status: WalletStatus,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("User not found")]
    UserNotFound,
    #[error("Wallet not found")]
    NotFound,
    #[error("Wallet already exists")]
    AlreadyExists,
    #[error("User has reached the maximum number of active wallets")]
    ActiveWalletLimit,
    #[error("Wallet has a balance, cannot delete")]
    NonZeroBalance,
    #[error("Wallet is already frozen")]
    AlreadyFrozen,
    #[error("Wallet is not frozen")]
    NotFrozen,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            WalletError::UserNotFound | WalletError::NotFound => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND)
            }
            WalletError::AlreadyExists
            | WalletError::NonZeroBalance
            | WalletError::AlreadyFrozen
            | WalletError::NotFrozen => (StatusCode::CONFLICT, error_codes::RESOURCE_CONFLICT),
            WalletError::ActiveWalletLimit => (StatusCode::FORBIDDEN, error_codes::LIMIT_EXCEEDED),
            WalletError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            WalletError::Db(e) => {
                tracing::error!("Wallet service database error: {:?}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error(
                        error_codes::INTERNAL_ERROR,
                        "Internal server error",
                    )),
                )
                    .into_response();
            }
        };
        (
            status,
            Json(ApiResponse::<()>::error(code, self.to_string())),
        )
            .into_response()
    }
}

/// Wallet lifecycle: create, list, update, freeze/unfreeze, delete
pub struct WalletService {
    pool: PgPool,
    events: EventPublisher,
}

impl WalletService {
    pub fn new(pool: PgPool, events: EventPublisher) -> Self {
        Self { pool, events }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<(), WalletError> {
        UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(WalletError::UserNotFound)?;
        Ok(())
    }

    pub async fn create_wallet(
        &self,
        user_id: Uuid,
        wallet_type: WalletType,
        currency: &str,
    ) -> Result<WalletDto, WalletError> {
        let currency = currency.to_ascii_uppercase();
        tracing::info!(%user_id, %currency, "Creating wallet");

        self.ensure_user_exists(user_id).await?;

        if WalletRepository::find_duplicate(&self.pool, user_id, wallet_type, &currency)
            .await?
            .is_some()
        {
            return Err(WalletError::AlreadyExists);
        }

        let active = WalletRepository::count_active(&self.pool, user_id).await?;
        if active >= MAX_ACTIVE_WALLETS {
            return Err(WalletError::ActiveWalletLimit);
        }

        let wallet = WalletRepository::insert(&self.pool, user_id, wallet_type, &currency).await?;

        self.events.publish(
            topics::WALLET_CREATED,
            &WalletCreatedPayload {
                user_id,
                wallet_id: wallet.id,
                wallet_type: wallet.wallet_type,
                currency: wallet.currency.clone(),
                status: wallet.status,
            },
        );

        tracing::info!(%user_id, wallet_id = %wallet.id, "Wallet created");
        Ok(WalletDto::from_wallet(wallet))
    }

    pub async fn list_wallets(
        &self,
        user_id: Uuid,
        listing: WalletListing,
    ) -> Result<PaginatedWallets, WalletError> {
        self.ensure_user_exists(user_id).await?;

        let limit = i64::from(listing.limit);
        let offset = i64::from(listing.page.saturating_sub(1)) * limit;

        let total = WalletRepository::count(&self.pool, user_id, &listing.filter).await?;
        let wallets = WalletRepository::list(
            &self.pool,
            user_id,
            &listing.filter,
            listing.sort_by,
            listing.sort_order,
            limit,
            offset,
        )
        .await?;

        Ok(PaginatedWallets {
            items: wallets.into_iter().map(WalletDto::from_wallet).collect(),
            pagination: Pagination::new(listing.page, listing.limit, total),
        })
    }

    pub async fn get_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
    ) -> Result<WalletDto, WalletError> {
        let wallet = WalletRepository::find_by_id(&self.pool, user_id, wallet_id)
            .await?
            .ok_or(WalletError::NotFound)?;

        Ok(WalletDto::from_wallet(wallet))
    }

    pub async fn update_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
        update: WalletUpdate,
    ) -> Result<WalletDto, WalletError> {
        if update.wallet_type.is_none() && update.status.is_none() {
            return Err(WalletError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }

        tracing::info!(%user_id, %wallet_id, "Updating wallet");

        let wallet = WalletRepository::update(
            &self.pool,
            user_id,
            wallet_id,
            update.wallet_type,
            update.status,
        )
        .await?
        .ok_or(WalletError::NotFound)?;

        Ok(WalletDto::from_wallet(wallet))
    }

    pub async fn delete_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> Result<(), WalletError> {
        tracing::info!(%user_id, %wallet_id, "Deleting wallet");

        let wallet = WalletRepository::find_by_id(&self.pool, user_id, wallet_id)
            .await?
            .ok_or(WalletError::NotFound)?;

        if !wallet.deletable() {
            return Err(WalletError::NonZeroBalance);
        }

        if !WalletRepository::soft_delete(&self.pool, user_id, wallet_id).await? {
            return Err(WalletError::NotFound);
        }

        Ok(())
    }

    pub async fn freeze_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
    ) -> Result<WalletDto, WalletError> {
        tracing::info!(%user_id, %wallet_id, "Freezing wallet");

        let wallet = WalletRepository::find_by_id(&self.pool, user_id, wallet_id)
            .await?
            .ok_or(WalletError::NotFound)?;

        if wallet.status == WalletStatus::Frozen {
            return Err(WalletError::AlreadyFrozen);
        }

        let wallet =
            WalletRepository::set_status(&self.pool, user_id, wallet_id, WalletStatus::Frozen)
                .await?
                .ok_or(WalletError::NotFound)?;

        Ok(WalletDto::from_wallet(wallet))
    }

    pub async fn unfreeze_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
    ) -> Result<WalletDto, WalletError> {
        tracing::info!(%user_id, %wallet_id, "Unfreezing wallet");

        let wallet = WalletRepository::find_by_id(&self.pool, user_id, wallet_id)
            .await?
            .ok_or(WalletError::NotFound)?;

        if wallet.status != WalletStatus::Frozen {
            return Err(WalletError::NotFrozen);
        }

        let wallet =
            WalletRepository::set_status(&self.pool, user_id, wallet_id, WalletStatus::Active)
                .await?
                .ok_or(WalletError::NotFound)?;

        Ok(WalletDto::from_wallet(wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_wallet(balance: &str, status: WalletStatus) -> Wallet {
        Wallet {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            balance: Decimal::from_str(balance).unwrap(),
            currency: "USD".to_string(),
            status,
            wallet_type: WalletType::Standard,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn test_wallet_dto_wire_shape() {
        let dto = WalletDto::from_wallet(sample_wallet("12.50", WalletStatus::Active));
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "standard");
        assert_eq!(json["status"], "active");
        // Decimal serializes as a string to preserve scale
        assert_eq!(json["balance"], "12.50");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_listing_defaults() {
        let listing = WalletListing::default();
        assert_eq!(listing.page, 1);
        assert_eq!(listing.limit, 10);
        assert_eq!(listing.sort_by, WalletSortBy::CreatedAt);
        assert_eq!(listing.sort_order, SortOrder::Desc);
    }
}
