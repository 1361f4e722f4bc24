//! Ciphertext gateway port: storage of ciphertexts by handle.
//!
//! Contracts only ever see handles; the ciphertext bytes live with the gateway.

use crate::domain::CiphertextHandle;

use super::fhe_client::FheError;

pub trait CiphertextGateway: Send + Sync {
    /// Store a ciphertext under its handle.
    ///
    /// # Errors
    /// Returns `FheError::Gateway` if the gateway rejects the upload.
    fn upload(&self, handle: CiphertextHandle, ciphertext: Vec<u8>) -> Result<(), FheError>;

    /// Fetch the ciphertext behind `handle`.
    ///
    /// # Errors
    /// Returns `FheError::UnknownHandle` if nothing is stored for it.
    fn fetch(&self, handle: &CiphertextHandle) -> Result<Vec<u8>, FheError>;
}
