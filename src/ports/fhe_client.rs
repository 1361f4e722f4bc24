//! FHE client port: Encryption of inputs and verified public decryption.
//!
//! This trait abstracts the FHE SDK (tfhe-rs locally) from the application logic.
//! Every call is a single attempt; callers never retry.

use crate::domain::{Address, CiphertextHandle, CryptoError, DecryptionResult, EncryptedInput};

use super::contract::ContractError;

/// Errors surfaced by the FHE client.
#[derive(Debug, thiserror::Error)]
pub enum FheError {
    #[error("FHE client not initialized")]
    NotInitialized,

    #[error("Cryptographic operation failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Unknown ciphertext handle: {0}")]
    UnknownHandle(CiphertextHandle),

    #[error("Decryption submission failed: {0}")]
    Submission(#[from] ContractError),
}

/// Callback that submits `(abi_clear_values, proof)` on-chain.
pub type SubmitDecryption<'a> = dyn FnMut(&[u8], &[u8]) -> Result<(), ContractError> + 'a;

/// Trait for the FHE SDK.
pub trait FheClient: Send + Sync {
    /// Prepare keys and connections. Idempotent once it has succeeded.
    ///
    /// # Errors
    /// Returns error if key material cannot be produced.
    fn initialize(&self) -> Result<(), FheError>;

    fn is_initialized(&self) -> bool;

    /// Encrypt `value` as an input to `contract` on behalf of `user`.
    ///
    /// # Errors
    /// Returns `FheError::NotInitialized` before `initialize()` succeeds.
    fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError>;

    /// Publicly decrypt `handles` and hand the cleartexts plus proof to
    /// `submit`, which is expected to send them to `contract`.
    ///
    /// # Errors
    /// Returns `FheError::Submission` if `submit` fails.
    fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        contract: &Address,
        submit: &mut SubmitDecryption<'_>,
    ) -> Result<DecryptionResult, FheError>;
}
