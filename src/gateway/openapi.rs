//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:5782/docs`
//! - OpenAPI JSON: `http://localhost:5782/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::accounts::models::{AccountStatus, AccountType};
use crate::accounts::service::AccountDto;
use crate::auth::service::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::gateway::HealthResponse;
use crate::gateway::types::Pagination;
use crate::users::handlers::UpdateProfileRequest;
use crate::users::models::{Address, KycDocument, KycStatus};
use crate::users::service::UserProfile;
use crate::wallets::handlers::{CreateWalletRequest, UpdateWalletRequest};
use crate::wallets::models::{WalletStatus, WalletType};
use crate::wallets::service::{PaginatedWallets, WalletDto};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VaultEdge API",
        version = "1.0.0",
        description = "Monolithic backend for users, KYC verification, accounts and multi-currency wallets.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5782", description = "Development"),
    ),
    paths(
        crate::gateway::health_check,
        // Auth (public)
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        // Profile
        crate::users::handlers::get_profile,
        crate::users::handlers::update_profile,
        crate::users::handlers::start_kyc_verification,
        crate::users::handlers::complete_kyc_verification,
        // Wallets
        crate::wallets::handlers::create_wallet,
        crate::wallets::handlers::list_wallets,
        crate::wallets::handlers::get_wallet,
        crate::wallets::handlers::update_wallet,
        crate::wallets::handlers::delete_wallet,
        crate::wallets::handlers::freeze_wallet,
        crate::wallets::handlers::unfreeze_wallet,
        // Accounts
        crate::accounts::handlers::list_accounts,
        crate::accounts::handlers::get_account,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserProfile,
            UpdateProfileRequest,
            Address,
            KycDocument,
            KycStatus,
            CreateWalletRequest,
            UpdateWalletRequest,
            WalletDto,
            PaginatedWallets,
            Pagination,
            WalletStatus,
            WalletType,
            AccountDto,
            AccountStatus,
            AccountType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login (no auth required)"),
        (name = "Profile", description = "Profile management and KYC verification (auth required)"),
        (name = "Wallets", description = "Multi-currency wallet management (auth required)"),
        (name = "Accounts", description = "Read-only account queries (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_doc_generates() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi doc should serialize");
        assert!(json.contains("/api/v1/auth/register"));
        assert!(json.contains("/api/v1/wallets"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_covers_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/api/v1/auth/login",
            "/api/v1/profile",
            "/api/v1/profile/start-kyc-verification",
            "/api/v1/profile/complete-kyc-verification",
            "/api/v1/wallets/{wallet_id}",
            "/api/v1/wallets/{wallet_id}/freeze",
            "/api/v1/wallets/{wallet_id}/unfreeze",
            "/api/v1/accounts",
            "/api/v1/accounts/{account_id}",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI doc"
            );
        }
    }
}
