//! Multi-currency wallet CRUD and lifecycle rules

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{MAX_ACTIVE_WALLETS, Wallet, WalletStatus, WalletType};
pub use service::{WalletDto, WalletError, WalletService};
