//! User profiles and the KYC verification workflow

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{Address, KycDocument, KycStatus, User};
pub use service::{UserError, UserProfile, UserService};
