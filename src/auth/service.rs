use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::gateway::types::{ApiResponse, error_codes};
use crate::users::repository::{NewUser, UserRepository};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    #[schema(example = "correct-horse-battery")]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub other_names: Option<String>,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// User Login Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct-horse-battery")]
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("{0}")]
    Validation(String),
    #[error("Credential processing failed: {0}")]
    Credential(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::EmailTaken => (StatusCode::CONFLICT, error_codes::RESOURCE_CONFLICT),
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED)
            }
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            AuthError::Credential(e) => {
                tracing::error!("Credential processing error: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error(
                        error_codes::INTERNAL_ERROR,
                        "Internal server error",
                    )),
                )
                    .into_response();
            }
            AuthError::Db(e) => {
                tracing::error!("Auth service database error: {:?}", e);
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

pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Credential(format!("Hashing failed: {}", e)))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub(crate) fn issue_token(
    secret: &str,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(ttl_hours);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Credential(format!("Failed to generate token: {}", e)))
}

pub(crate) fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Registration, login and token verification
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AuthError> {
        tracing::info!(email = %req.email, "Registering user");

        if UserRepository::find_by_email(&self.pool, &req.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&req.password)?;

        let new_user = NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            other_names: req.other_names,
            last_name: req.last_name,
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
        };

        let user = match UserRepository::insert(&self.pool, new_user).await {
            Ok(user) => user,
            // Lost the race against a concurrent registration for the same email
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered successfully");

        Ok(RegisterResponse {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = UserRepository::find_by_email(&self.pool, &req.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&req.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = issue_token(&self.jwt_secret, user.id, self.token_ttl_hours)?;

        Ok(LoginResponse {
            access_token,
            expires_in: self.token_ttl_hours * 3600,
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
        })
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_token(&self.jwt_secret, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse-battery", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_password_bad_hash_format() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = issue_token("test-secret", user_id, 24).unwrap();

        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = issue_token("secret-a", Uuid::new_v4(), 24).unwrap();
        assert!(matches!(
            decode_token("secret-b", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token("test-secret", Uuid::new_v4(), -1).unwrap();
        assert!(matches!(
            decode_token("test-secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            first_name: "Ada".to_string(),
            other_names: None,
            last_name: "Lovelace".to_string(),
            phone_number: None,
            date_of_birth: None,
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            first_name: "Ada".to_string(),
            other_names: None,
            last_name: "Lovelace".to_string(),
            phone_number: None,
            date_of_birth: None,
        };
        assert!(req.validate().is_err(), "password under 8 chars should fail");
    }
}
