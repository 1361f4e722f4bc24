//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. The contract and the FHE network are the
//! systems of record; everything here is a projection or a validated input.

mod catalog;
mod category;
mod chain;
mod crypto;
mod subscription;

pub use catalog::{BoxQuery, SubscriptionStats};
pub use category::{Category, CategoryFilter};
pub use chain::{Address, HexError, PendingTx, TxHash, TxReceipt};
pub use crypto::{
    abi_decode_words, abi_encode_words, decryption_proof_digest, input_proof_digest, ClientKey,
    CiphertextHandle, CryptoError, DecryptionResult, EncryptedInput,
};
pub use subscription::{
    new_subscription_id, BusinessData, NewSubscription, Preference, SubscriptionBox,
    SubscriptionDraft, ValidationError, ENCRYPTED_PLACEHOLDER, MAX_PREFERENCE, MIN_PREFERENCE,
};
