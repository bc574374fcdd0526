//! Account entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    Loan,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Investment => "investment",
            AccountType::Loan => "loan",
        }
    }
}

impl From<&str> for AccountType {
    fn from(v: &str) -> Self {
        match v {
            "savings" => AccountType::Savings,
            "investment" => AccountType::Investment,
            "loan" => AccountType::Loan,
            _ => AccountType::Checking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Frozen,
    Closed,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Closed => "closed",
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(v: &str) -> Self {
        match v {
            "inactive" => AccountStatus::Inactive,
            "frozen" => AccountStatus::Frozen,
            "closed" => AccountStatus::Closed,
            _ => AccountStatus::Active,
        }
    }
}

/// Bank-account-like row owned by a user
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_roundtrip() {
        for account_type in [
            AccountType::Checking,
            AccountType::Savings,
            AccountType::Investment,
            AccountType::Loan,
        ] {
            assert_eq!(AccountType::from(account_type.as_str()), account_type);
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Frozen,
            AccountStatus::Closed,
        ] {
            assert_eq!(AccountStatus::from(status.as_str()), status);
        }
    }
}
