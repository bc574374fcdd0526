//! VaultEdge - Monolithic fintech backend
//!
//! REST endpoints for user registration/login, profile management, KYC status
//! transitions, read-only accounts and multi-currency wallet CRUD, backed by
//! PostgreSQL with fire-and-forget domain-event publication.
//!
//! # Modules
//!
//! - [`auth`] - Registration, login and JWT verification
//! - [`users`] - User profiles and the KYC verification workflow
//! - [`wallets`] - Multi-currency wallet CRUD and lifecycle rules
//! - [`accounts`] - Read-only account queries
//! - [`events`] - Fire-and-forget domain event publication
//! - [`gateway`] - Axum router, shared state and wire types
//! - [`db`] - PostgreSQL connection pool
//! - [`config`] - YAML configuration loading
//! - [`logging`] - tracing subscriber setup

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod events;
pub mod gateway;
pub mod logging;
pub mod users;
pub mod wallets;

// Convenient re-exports at crate root
pub use accounts::{Account, AccountService};
pub use auth::{AuthService, Claims};
pub use db::Database;
pub use events::{EventPublisher, EventRelay};
pub use users::{KycStatus, User, UserService};
pub use wallets::{Wallet, WalletService, WalletStatus, WalletType};
