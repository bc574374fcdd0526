//! Read-only account queries

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{Account, AccountStatus, AccountType};
pub use service::{AccountDto, AccountError, AccountService};
