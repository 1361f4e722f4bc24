//! # Mysterybox
#![allow(non_snake_case)]
//!
//! Terminal client for a confidential "mystery subscription box" dApp.
//!
//! This crate provides:
//! - Encrypted preference submission through an FHE client SDK
//! - Public decryption and on-chain verification of stored preferences
//! - Terminal UI for browsing, creating and verifying boxes
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (SubscriptionBox, Category, handles, addresses)
//! - `ports`: Trait definitions for the contract, FHE SDK, gateway and wallet
//! - `adapters`: Concrete implementations (in-process devnet, tfhe-rs, local wallet)
//! - `application`: Use cases and the session state machine
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Category, SubscriptionBox};

use ports::{ContractError, FheError};

/// Result type for Mysterybox operations
pub type Result<T> = std::result::Result<T, MysteryboxError>;

/// Main error type for Mysterybox
#[derive(Debug, thiserror::Error)]
pub enum MysteryboxError {
    #[error("Please connect wallet first")]
    WalletNotConnected,

    #[error("{0}")]
    Contract(#[from] ContractError),

    #[error("{0}")]
    Fhe(#[from] FheError),

    #[error("Invalid subscription: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("No cleartext returned for handle {0}")]
    MissingCleartext(domain::CiphertextHandle),

    #[error("Cleartext {0} does not fit a preference score")]
    CleartextOutOfRange(u64),
}

impl MysteryboxError {
    /// Whether the user declined to sign, wherever in the chain it happened.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::Contract(e) | Self::Fhe(FheError::Submission(e)) => e.is_user_rejection(),
            _ => false,
        }
    }

    /// Whether the contract reported the record as already verified.
    #[must_use]
    pub fn is_already_verified(&self) -> bool {
        match self {
            Self::Contract(e) | Self::Fhe(FheError::Submission(e)) => e.is_already_verified(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_classification() {
        let nested = MysteryboxError::Fhe(FheError::Submission(ContractError::Reverted(
            ports::ALREADY_VERIFIED_REASON.into(),
        )));
        assert!(nested.is_already_verified());
        assert!(!nested.is_user_rejection());

        let rejected = MysteryboxError::Contract(ContractError::UserRejected);
        assert!(rejected.is_user_rejection());
        assert_eq!(
            MysteryboxError::WalletNotConnected.to_string(),
            "Please connect wallet first"
        );
    }
}
