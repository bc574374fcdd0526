use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::{Address, KycDocument, KycStatus, KycTransitionError, User};
use super::repository::{ProfileChanges, UserRepository};
use crate::events::{EventPublisher, topics};
use crate::gateway::types::{ApiResponse, error_codes};

/// Profile view of a user row. Omits the credential hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_names: Option<String>,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub kyc_status: KycStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kyc_document: Option<KycDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            other_names: user.other_names,
            last_name: user.last_name,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth,
            email_verified: user.email_verified,
            phone_verified: user.phone_verified,
            kyc_status: user.kyc_status,
            address: user.address,
            kyc_document: user.kyc_document,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct KycStartedPayload {
    user_id: Uuid,
    email: String,
    kyc_status: KycStatus,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct KycCompletedPayload {
    user_id: Uuid,
    email: String,
    kyc_status: KycStatus,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,
    #[error("User already verified")]
    AlreadyVerified,
    #[error("User already in KYC process")]
    AlreadyInKycProcess,
    #[error("User not in KYC process")]
    NotInKycProcess,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<KycTransitionError> for UserError {
    fn from(e: KycTransitionError) -> Self {
        match e {
            KycTransitionError::AlreadyVerified => UserError::AlreadyVerified,
            KycTransitionError::AlreadyInProgress => UserError::AlreadyInKycProcess,
            KycTransitionError::NotInProgress => UserError::NotInKycProcess,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            UserError::NotFound => (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND),
            UserError::AlreadyVerified
            | UserError::AlreadyInKycProcess
            | UserError::NotInKycProcess => (StatusCode::CONFLICT, error_codes::RESOURCE_CONFLICT),
            UserError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            UserError::Db(e) => {
                tracing::error!("User service database error: {:?}", e);
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

/// Profile retrieval/update and the KYC verification workflow
pub struct UserService {
    pool: PgPool,
    events: EventPublisher,
}

impl UserService {
    pub fn new(pool: PgPool, events: EventPublisher) -> Self {
        Self { pool, events }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, UserError> {
        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        Ok(UserProfile::from_user(user))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<UserProfile, UserError> {
        tracing::info!(%user_id, "Updating user profile");

        let user = UserRepository::update_profile(&self.pool, user_id, changes)
            .await?
            .ok_or(UserError::NotFound)?;

        Ok(UserProfile::from_user(user))
    }

    /// Move the user into `IN_PROGRESS` and announce the start of verification
    pub async fn start_kyc_verification(&self, user_id: Uuid) -> Result<UserProfile, UserError> {
        tracing::info!(%user_id, "Starting KYC verification");

        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        let next = user.kyc_status.begin_verification()?;

        let user = UserRepository::set_kyc_status(&self.pool, user_id, next)
            .await?
            .ok_or(UserError::NotFound)?;

        self.events.publish(
            topics::KYC_VERIFICATION_STARTED,
            &KycStartedPayload {
                user_id: user.id,
                email: user.email.clone(),
                kyc_status: user.kyc_status,
                started_at: Utc::now(),
            },
        );

        tracing::info!(%user_id, "KYC verification started");
        Ok(UserProfile::from_user(user))
    }

    /// Resolve an in-progress verification to `VERIFIED` or `REJECTED`
    pub async fn complete_kyc_verification(
        &self,
        user_id: Uuid,
        is_approved: bool,
    ) -> Result<UserProfile, UserError> {
        tracing::info!(%user_id, is_approved, "Completing KYC verification");

        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        let next = user.kyc_status.finish_verification(is_approved)?;

        let user = UserRepository::set_kyc_status(&self.pool, user_id, next)
            .await?
            .ok_or(UserError::NotFound)?;

        self.events.publish(
            topics::KYC_VERIFICATION_COMPLETED,
            &KycCompletedPayload {
                user_id: user.id,
                email: user.email.clone(),
                kyc_status: user.kyc_status,
                completed_at: Utc::now(),
            },
        );

        tracing::info!(%user_id, "KYC verification completed");
        Ok(UserProfile::from_user(user))
    }
}
