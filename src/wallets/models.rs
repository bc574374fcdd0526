//! Wallet entity and lifecycle rules

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A user may hold at most this many active wallets
pub const MAX_ACTIVE_WALLETS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    Active,
    Inactive,
    Frozen,
}

impl WalletStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WalletStatus::Active => "active",
            WalletStatus::Inactive => "inactive",
            WalletStatus::Frozen => "frozen",
        }
    }
}

impl From<&str> for WalletStatus {
    fn from(v: &str) -> Self {
        match v {
            "inactive" => WalletStatus::Inactive,
            "frozen" => WalletStatus::Frozen,
            _ => WalletStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Standard,
    Escrow,
    Margin,
}

impl WalletType {
    pub fn as_str(self) -> &'static str {
        match self {
            WalletType::Standard => "standard",
            WalletType::Escrow => "escrow",
            WalletType::Margin => "margin",
        }
    }
}

impl From<&str> for WalletType {
    fn from(v: &str) -> Self {
        match v {
            "escrow" => WalletType::Escrow,
            "margin" => WalletType::Margin,
            _ => WalletType::Standard,
        }
    }
}

/// Wallet row. The database enforces `balance >= 0`.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub currency: String,
    pub status: WalletStatus,
    pub wallet_type: WalletType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl Wallet {
    /// A wallet holding funds cannot be deleted
    pub fn deletable(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

/// Sort keys accepted by the wallet listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WalletSortBy {
    CreatedAt,
    Balance,
}

impl WalletSortBy {
    pub fn column(self) -> &'static str {
        match self {
            WalletSortBy::CreatedAt => "created_at",
            WalletSortBy::Balance => "balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
