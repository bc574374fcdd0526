//! Rule-table tests for the KYC state machine and wallet lifecycle gates.

use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use vault_edge::users::models::{KycStatus, KycTransitionError};
use vault_edge::wallets::models::{MAX_ACTIVE_WALLETS, Wallet, WalletStatus, WalletType};

fn wallet_with(balance: &str, status: WalletStatus) -> Wallet {
    Wallet {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        balance: Decimal::from_str(balance).unwrap(),
        currency: "USD".to_string(),
        status,
        wallet_type: WalletType::Standard,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
        version: 1,
    }
}

#[test]
fn kyc_start_transition_table() {
    // (current, expected)
    let cases = [
        (KycStatus::NotStarted, Ok(KycStatus::InProgress)),
        (KycStatus::Rejected, Ok(KycStatus::InProgress)),
        (
            KycStatus::InProgress,
            Err(KycTransitionError::AlreadyInProgress),
        ),
        (
            KycStatus::Verified,
            Err(KycTransitionError::AlreadyVerified),
        ),
    ];

    for (current, expected) in cases {
        assert_eq!(
            current.begin_verification(),
            expected,
            "begin_verification from {current:?}"
        );
    }
}

#[test]
fn kyc_complete_transition_table() {
    // (current, approved, expected)
    let cases = [
        (KycStatus::InProgress, true, Ok(KycStatus::Verified)),
        (KycStatus::InProgress, false, Ok(KycStatus::Rejected)),
        (
            KycStatus::NotStarted,
            true,
            Err(KycTransitionError::NotInProgress),
        ),
        (
            KycStatus::NotStarted,
            false,
            Err(KycTransitionError::NotInProgress),
        ),
        (
            KycStatus::Rejected,
            true,
            Err(KycTransitionError::NotInProgress),
        ),
        (
            KycStatus::Verified,
            true,
            Err(KycTransitionError::AlreadyVerified),
        ),
        (
            KycStatus::Verified,
            false,
            Err(KycTransitionError::AlreadyVerified),
        ),
    ];

    for (current, approved, expected) in cases {
        assert_eq!(
            current.finish_verification(approved),
            expected,
            "finish_verification({approved}) from {current:?}"
        );
    }
}

#[test]
fn kyc_rejected_user_can_retry_and_pass() {
    // Full walk: NOT_STARTED -> IN_PROGRESS -> REJECTED -> IN_PROGRESS -> VERIFIED
    let s = KycStatus::NotStarted.begin_verification().unwrap();
    let s = s.finish_verification(false).unwrap();
    assert_eq!(s, KycStatus::Rejected);

    let s = s.begin_verification().unwrap();
    let s = s.finish_verification(true).unwrap();
    assert_eq!(s, KycStatus::Verified);

    // Terminal: no further transitions allowed
    assert!(s.begin_verification().is_err());
    assert!(s.finish_verification(false).is_err());
}

#[test]
fn wallet_delete_gate_is_balance_based() {
    assert!(wallet_with("0", WalletStatus::Active).deletable());
    assert!(wallet_with("0.00", WalletStatus::Frozen).deletable());
    assert!(!wallet_with("0.01", WalletStatus::Active).deletable());
    assert!(!wallet_with("999999.99", WalletStatus::Inactive).deletable());
}

#[test]
fn active_wallet_limit_is_five() {
    assert_eq!(MAX_ACTIVE_WALLETS, 5);
}

#[test]
fn wallet_enums_cover_all_wire_values() {
    assert_eq!(WalletStatus::from("active"), WalletStatus::Active);
    assert_eq!(WalletStatus::from("inactive"), WalletStatus::Inactive);
    assert_eq!(WalletStatus::from("frozen"), WalletStatus::Frozen);

    assert_eq!(WalletType::from("standard"), WalletType::Standard);
    assert_eq!(WalletType::from("escrow"), WalletType::Escrow);
    assert_eq!(WalletType::from("margin"), WalletType::Margin);
}
