//! Contract port: Read-only and signer-bound bindings to the subscription contract.
//!
//! The contract is the system of record for every box. The client never
//! patches its local copy; it re-reads after each confirmed write.

use crate::domain::{Address, BusinessData, CiphertextHandle, EncryptedInput, PendingTx, TxReceipt};

/// Revert reason emitted when a decryption was already verified on-chain.
pub const ALREADY_VERIFIED_REASON: &str = "Data already verified";

/// Errors surfaced by a contract binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("Contract not available: {0}")]
    Unavailable(String),

    #[error("user rejected transaction")]
    UserRejected,

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("Transaction not found: {0}")]
    UnknownTransaction(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ContractError {
    /// Whether the signer declined the transaction.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }

    /// Whether this is the contract's "already verified" revert.
    #[must_use]
    pub fn is_already_verified(&self) -> bool {
        matches!(self, Self::Reverted(reason) if reason.contains(ALREADY_VERIFIED_REASON))
    }
}

/// Arguments of `createBusinessData`.
#[derive(Debug, Clone)]
pub struct CreateBusinessData {
    pub id: String,
    pub name: String,
    pub encrypted: EncryptedInput,
    /// Public category code
    pub public_value1: u64,
    /// Reserved, always 0 from this client
    pub public_value2: u64,
    pub description: String,
}

/// Read-only view of the contract.
pub trait ContractReader: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> Address;

    /// All record ids, in creation order.
    ///
    /// # Errors
    /// Returns error if the call fails.
    fn get_all_business_ids(&self) -> Result<Vec<String>, ContractError>;

    /// Public fields of one record.
    ///
    /// # Errors
    /// Returns `ContractError::Reverted` for an unknown id.
    fn get_business_data(&self, id: &str) -> Result<BusinessData, ContractError>;

    /// Handle of the record's encrypted preference.
    ///
    /// # Errors
    /// Returns `ContractError::Reverted` for an unknown id.
    fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ContractError>;
}

/// Contract instance bound to a signing account.
///
/// Write methods return once the transaction is submitted; `wait` blocks
/// until it is mined.
pub trait ContractSigner: ContractReader {
    /// # Errors
    /// Returns error if the transaction cannot be submitted.
    fn is_available(&self) -> Result<PendingTx, ContractError>;

    /// # Errors
    /// Returns error if the transaction is rejected or reverts.
    fn create_business_data(&self, call: &CreateBusinessData) -> Result<PendingTx, ContractError>;

    /// Submit decrypted cleartexts with the gateway's proof.
    ///
    /// # Errors
    /// Returns error if the transaction is rejected or reverts.
    fn verify_decryption(
        &self,
        id: &str,
        abi_clear_values: &[u8],
        proof: &[u8],
    ) -> Result<PendingTx, ContractError>;

    /// Wait for a submitted transaction to be mined.
    ///
    /// # Errors
    /// Returns error if the transaction failed or is unknown.
    fn wait(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError>;
}

/// Factory for contract bindings.
pub trait ContractProvider: Send + Sync {
    type Reader: ContractReader;
    type Signer: ContractSigner;

    /// Binding for view calls only.
    ///
    /// # Errors
    /// Returns `ContractError::Unavailable` if no contract is reachable.
    fn read_only(&self) -> Result<Self::Reader, ContractError>;

    /// Binding that signs as `account`.
    ///
    /// # Errors
    /// Returns `ContractError::Unavailable` if no signer can be obtained.
    fn with_signer(&self, account: &Address) -> Result<Self::Signer, ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ContractError::UserRejected.is_user_rejection());
        assert!(ContractError::UserRejected
            .to_string()
            .contains("user rejected transaction"));
        assert!(ContractError::Reverted(ALREADY_VERIFIED_REASON.into()).is_already_verified());
        assert!(!ContractError::Reverted("Invalid decryption proof".into()).is_already_verified());
        assert!(!ContractError::Transport(ALREADY_VERIFIED_REASON.into()).is_already_verified());
    }
}
