//! User entity and KYC verification state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// KYC verification status
///
/// Legal transitions: `NOT_STARTED -> IN_PROGRESS` and
/// `IN_PROGRESS -> {VERIFIED, REJECTED}`. A rejected user may restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    NotStarted,
    InProgress,
    Verified,
    Rejected,
}

/// Why a requested KYC transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KycTransitionError {
    AlreadyVerified,
    AlreadyInProgress,
    NotInProgress,
}

impl KycStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            KycStatus::NotStarted => "NOT_STARTED",
            KycStatus::InProgress => "IN_PROGRESS",
            KycStatus::Verified => "VERIFIED",
            KycStatus::Rejected => "REJECTED",
        }
    }

    /// Transition for "start verification"
    pub fn begin_verification(self) -> Result<KycStatus, KycTransitionError> {
        match self {
            KycStatus::Verified => Err(KycTransitionError::AlreadyVerified),
            KycStatus::InProgress => Err(KycTransitionError::AlreadyInProgress),
            KycStatus::NotStarted | KycStatus::Rejected => Ok(KycStatus::InProgress),
        }
    }

    /// Transition for "complete verification"
    pub fn finish_verification(self, approved: bool) -> Result<KycStatus, KycTransitionError> {
        match self {
            KycStatus::Verified => Err(KycTransitionError::AlreadyVerified),
            KycStatus::NotStarted | KycStatus::Rejected => Err(KycTransitionError::NotInProgress),
            KycStatus::InProgress => Ok(if approved {
                KycStatus::Verified
            } else {
                KycStatus::Rejected
            }),
        }
    }
}

impl From<&str> for KycStatus {
    fn from(v: &str) -> Self {
        match v {
            "IN_PROGRESS" => KycStatus::InProgress,
            "VERIFIED" => KycStatus::Verified,
            "REJECTED" => KycStatus::Rejected,
            _ => KycStatus::NotStarted,
        }
    }
}

/// Postal address, stored as a JSONB blob on the user row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// Identity document captured during KYC, stored as a JSONB blob
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KycDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_image: Option<String>,
}

/// User row
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub other_names: Option<String>,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub address: Option<Address>,
    pub kyc_status: KycStatus,
    pub kyc_document: Option<KycDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyc_status_roundtrip() {
        for status in [
            KycStatus::NotStarted,
            KycStatus::InProgress,
            KycStatus::Verified,
            KycStatus::Rejected,
        ] {
            assert_eq!(KycStatus::from(status.as_str()), status);
        }
        // Unknown values default to NOT_STARTED
        assert_eq!(KycStatus::from("GARBAGE"), KycStatus::NotStarted);
    }

    #[test]
    fn test_kyc_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&KycStatus::InProgress).unwrap();
        assert_eq!(json, r#""IN_PROGRESS""#);
    }

    #[test]
    fn test_begin_verification_transitions() {
        assert_eq!(
            KycStatus::NotStarted.begin_verification(),
            Ok(KycStatus::InProgress)
        );
        // Rejected users may retry
        assert_eq!(
            KycStatus::Rejected.begin_verification(),
            Ok(KycStatus::InProgress)
        );
        assert_eq!(
            KycStatus::InProgress.begin_verification(),
            Err(KycTransitionError::AlreadyInProgress)
        );
        assert_eq!(
            KycStatus::Verified.begin_verification(),
            Err(KycTransitionError::AlreadyVerified)
        );
    }

    #[test]
    fn test_finish_verification_transitions() {
        assert_eq!(
            KycStatus::InProgress.finish_verification(true),
            Ok(KycStatus::Verified)
        );
        assert_eq!(
            KycStatus::InProgress.finish_verification(false),
            Ok(KycStatus::Rejected)
        );
        assert_eq!(
            KycStatus::NotStarted.finish_verification(true),
            Err(KycTransitionError::NotInProgress)
        );
        assert_eq!(
            KycStatus::Rejected.finish_verification(true),
            Err(KycTransitionError::NotInProgress)
        );
        assert_eq!(
            KycStatus::Verified.finish_verification(false),
            Err(KycTransitionError::AlreadyVerified)
        );
    }
}
