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

use super::models::{Account, AccountStatus, AccountType};
use super::repository::AccountRepository;
use crate::gateway::types::{ApiResponse, error_codes};

/// Account view returned by the read-only endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountDto {
    pub id: Uuid,
    pub account_number: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub status: AccountStatus,
    /// Serialized as a string to preserve precision
    #[schema(value_type = String, example = "1250.00")]
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDto {
    fn from_account(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            account_type: account.account_type,
            status: account.status,
            balance: account.balance,
            currency: account.currency,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        match &self {
            AccountError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error(
                    error_codes::RESOURCE_NOT_FOUND,
                    self.to_string(),
                )),
            )
                .into_response(),
            AccountError::Db(e) => {
                tracing::error!("Account service database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error(
                        error_codes::INTERNAL_ERROR,
                        "Internal server error",
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Read-only account queries
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<AccountDto>, AccountError> {
        let accounts = AccountRepository::list_by_user(&self.pool, user_id).await?;
        Ok(accounts.into_iter().map(AccountDto::from_account).collect())
    }

    pub async fn get_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<AccountDto, AccountError> {
        let account = AccountRepository::find_by_id(&self.pool, user_id, account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        Ok(AccountDto::from_account(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_account_dto_wire_shape() {
        let dto = AccountDto::from_account(Account {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            account_number: "ACC-0001".to_string(),
            account_type: AccountType::Savings,
            status: AccountStatus::Active,
            balance: Decimal::from_str("1250.00").unwrap(),
            currency: "USD".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "savings");
        assert_eq!(json["balance"], "1250.00");
        assert!(json.get("user_id").is_none());
    }
}
