//! HTTP gateway: router assembly, shared state and server lifecycle

pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::middleware::jwt_auth_middleware;
use crate::config::AppConfig;
use crate::db::Database;
use crate::events::EventPublisher;
use state::AppState;
use types::{ApiResponse, error_codes};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Health check
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Database unreachable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<HealthResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state.db.health_check().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                status: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            })),
        )),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Database unreachable",
                )),
            ))
        }
    }
}

/// Assemble the application router
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(crate::auth::handlers::register))
        .route("/login", post(crate::auth::handlers::login));

    let profile_routes = Router::new()
        .route(
            "/",
            get(crate::users::handlers::get_profile).put(crate::users::handlers::update_profile),
        )
        .route(
            "/start-kyc-verification",
            patch(crate::users::handlers::start_kyc_verification),
        )
        .route(
            "/complete-kyc-verification",
            patch(crate::users::handlers::complete_kyc_verification),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let wallet_routes = Router::new()
        .route(
            "/",
            post(crate::wallets::handlers::create_wallet)
                .get(crate::wallets::handlers::list_wallets),
        )
        .route(
            "/{wallet_id}",
            get(crate::wallets::handlers::get_wallet)
                .put(crate::wallets::handlers::update_wallet)
                .delete(crate::wallets::handlers::delete_wallet),
        )
        .route(
            "/{wallet_id}/freeze",
            patch(crate::wallets::handlers::freeze_wallet),
        )
        .route(
            "/{wallet_id}/unfreeze",
            patch(crate::wallets::handlers::unfreeze_wallet),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let account_routes = Router::new()
        .route("/", get(crate::accounts::handlers::list_accounts))
        .route("/{account_id}", get(crate::accounts::handlers::get_account))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/profile", profile_routes)
        .nest("/api/v1/wallets", wallet_routes)
        .nest("/api/v1/accounts", account_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

/// Bind and serve the gateway until a shutdown signal arrives
pub async fn run_server(
    config: &AppConfig,
    db: Database,
    events: EventPublisher,
) -> anyhow::Result<()> {
    let state = AppState::new(config, db, events);
    let app = router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
