//! Domain event publication.
//!
//! State transitions (KYC started/completed, wallet created) are announced on
//! broker topics. Delivery is fire-and-forget: `publish` never fails the
//! calling request, and the relay logs and drops undeliverable events.

pub mod publisher;
pub mod relay;

pub use publisher::{EventPublisher, OutboundEvent};
pub use relay::EventRelay;

/// Broker topics
pub mod topics {
    pub const KYC_VERIFICATION_STARTED: &str = "user.kyc.verification_started";
    pub const KYC_VERIFICATION_COMPLETED: &str = "user.kyc.verification_completed";
    pub const WALLET_CREATED: &str = "wallet.created";
}
