use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::repository::ProfileChanges;
use super::service::{UserError, UserProfile};
use crate::auth::middleware::AuthUser;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::users::models::Address;

/// Partial profile update; at least one field must be present
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub other_names: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(min = 8, max = 20))]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<Address>,
}

impl UpdateProfileRequest {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.other_names.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.date_of_birth.is_none()
            && self.address.is_none()
    }

    fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            first_name: self.first_name,
            other_names: self.other_names,
            last_name: self.last_name,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            address: self.address,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KycCompletionQuery {
    /// Literal "true" or "false"
    pub is_approved: String,
}

/// Get current user's profile
///
/// GET /api/v1/profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), UserError> {
    let profile = state.users.profile(auth.user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

/// Update current user's profile
///
/// PUT /api/v1/profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "User profile updated successfully", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid or empty update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), UserError> {
    if req.is_empty() {
        return Err(UserError::Validation(
            "At least one field must be provided for update".to_string(),
        ));
    }
    req.validate()
        .map_err(|e| UserError::Validation(e.to_string()))?;

    let profile = state
        .users
        .update_profile(auth.user_id, req.into_changes())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

/// Start KYC verification
///
/// PATCH /api/v1/profile/start-kyc-verification
#[utoipa::path(
    patch,
    path = "/api/v1/profile/start-kyc-verification",
    responses(
        (status = 200, description = "KYC verification started successfully", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already verified or already in KYC process")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn start_kyc_verification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), UserError> {
    let profile = state.users.start_kyc_verification(auth.user_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

/// Complete KYC verification
///
/// PATCH /api/v1/profile/complete-kyc-verification?is_approved=true|false
#[utoipa::path(
    patch,
    path = "/api/v1/profile/complete-kyc-verification",
    params(KycCompletionQuery),
    responses(
        (status = 200, description = "KYC verification completed successfully", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid is_approved value"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already verified or not in KYC process")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn complete_kyc_verification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<KycCompletionQuery>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), UserError> {
    let is_approved = match query.is_approved.as_str() {
        "true" => true,
        "false" => false,
        _ => {
            return Err(UserError::Validation(
                "Invalid is_approved value".to_string(),
            ));
        }
    };

    let profile = state
        .users
        .complete_kyc_verification(auth.user_id, is_approved)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_is_empty() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());

        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"first_name": "Ada"}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn test_update_request_length_bounds() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"first_name": "A"}"#).unwrap();
        assert!(req.validate().is_err(), "single-char name should fail");

        let req: UpdateProfileRequest = serde_json::from_str(r#"{"first_name": "Ada"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_parses_address() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"address": {"street": "1 Main St", "city": "Lagos", "state": "LA",
                "country": "NG", "postal_code": "100001"}}"#,
        )
        .unwrap();
        assert_eq!(req.address.unwrap().city, "Lagos");
    }
}
