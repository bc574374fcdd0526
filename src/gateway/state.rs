use std::sync::Arc;

use crate::accounts::AccountService;
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::Database;
use crate::events::EventPublisher;
use crate::users::UserService;
use crate::wallets::WalletService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub wallets: Arc<WalletService>,
    pub accounts: Arc<AccountService>,
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Database, events: EventPublisher) -> Self {
        let pool = db.pool().clone();

        Self {
            auth: Arc::new(AuthService::new(
                pool.clone(),
                config.auth.jwt_secret.clone(),
                config.auth.token_ttl_hours,
            )),
            users: Arc::new(UserService::new(pool.clone(), events.clone())),
            wallets: Arc::new(WalletService::new(pool.clone(), events.clone())),
            accounts: Arc::new(AccountService::new(pool)),
            db: Arc::new(db),
        }
    }
}
