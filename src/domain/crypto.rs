//! Cryptographic types exchanged with the FHE client and the contract.
//!
//! # Memory Security
//!
//! `ClientKey` implements `Zeroize` and `ZeroizeOnDrop` so serialized key
//! material is erased when dropped.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::chain::{parse_hex, to_hex, Address, HexError};

/// Domain separators for gateway signatures.
const INPUT_PROOF_DOMAIN: &[u8] = b"mysterybox/input-proof/v1";
const DECRYPTION_PROOF_DOMAIN: &[u8] = b"mysterybox/decryption-proof/v1";

/// Size of one ABI word.
pub const ABI_WORD_BYTES: usize = 32;

/// Error type for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Invalid ABI encoding: {0}")]
    AbiEncoding(String),
}

/// Client-side secret key for encryption/decryption.
///
/// `Debug` prints only the fingerprint and size.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ClientKey {
    /// Serialized key bytes
    pub(crate) inner: Vec<u8>,

    /// Key fingerprint for identification (NOT secret)
    #[zeroize(skip)]
    pub fingerprint: String,
}

impl ClientKey {
    /// Wrap serialized key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let fingerprint = compute_fingerprint(&bytes);
        Self {
            inner: bytes,
            fingerprint,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKey")
            .field("fingerprint", &self.fingerprint)
            .field("size_bytes", &self.inner.len())
            .finish()
    }
}

/// Reference to a ciphertext stored by the gateway.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Handle for a freshly encrypted input, bound to its destination.
    #[must_use]
    pub fn for_input(ciphertext: &[u8], contract: &Address, user: &Address) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(ciphertext);
        hasher.update(contract.as_bytes());
        hasher.update(user.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", to_hex(&self.0))
    }
}

impl std::fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CiphertextHandle({self})")
    }
}

impl std::str::FromStr for CiphertextHandle {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex::<32>(s.trim()).map(Self)
    }
}

/// Result of encrypting a value for a contract call.
#[derive(Clone, Serialize, Deserialize)]
pub struct EncryptedInput {
    /// Handle passed to the contract as the encrypted argument
    pub encrypted_data: CiphertextHandle,

    /// Gateway attestation that the handle was produced for (contract, user)
    pub proof: Vec<u8>,
}

impl std::fmt::Debug for EncryptedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedInput")
            .field("encrypted_data", &self.encrypted_data)
            .field("proof_bytes", &self.proof.len())
            .finish()
    }
}

/// Cleartexts released by a public decryption, keyed by handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecryptionResult {
    pub clear_values: std::collections::BTreeMap<CiphertextHandle, u64>,
}

impl DecryptionResult {
    #[must_use]
    pub fn value_of(&self, handle: &CiphertextHandle) -> Option<u64> {
        self.clear_values.get(handle).copied()
    }
}

/// Digest signed by the gateway to attest an encrypted input.
#[must_use]
pub fn input_proof_digest(handle: &CiphertextHandle, contract: &Address, user: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(INPUT_PROOF_DOMAIN);
    hasher.update(handle.as_bytes());
    hasher.update(contract.as_bytes());
    hasher.update(user.as_bytes());
    hasher.finalize().into()
}

/// Digest signed by the gateway to attest a decryption.
///
/// Binds the ordered handle list to the ABI-encoded cleartexts.
#[must_use]
pub fn decryption_proof_digest(handles: &[CiphertextHandle], abi_clear_values: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(DECRYPTION_PROOF_DOMAIN);
    hasher.update((handles.len() as u64).to_be_bytes());
    for handle in handles {
        hasher.update(handle.as_bytes());
    }
    hasher.update(abi_clear_values);
    hasher.finalize().into()
}

/// ABI-encode unsigned values as consecutive 32-byte big-endian words.
#[must_use]
pub fn abi_encode_words(values: &[u64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * ABI_WORD_BYTES);
    for value in values {
        out.extend_from_slice(&[0u8; ABI_WORD_BYTES - 8]);
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}

/// Decode consecutive 32-byte words into `u64`s.
///
/// # Errors
/// Returns `CryptoError::AbiEncoding` if the length is not a multiple of 32
/// or a word does not fit in 64 bits.
pub fn abi_decode_words(bytes: &[u8]) -> Result<Vec<u64>, CryptoError> {
    if bytes.len() % ABI_WORD_BYTES != 0 {
        return Err(CryptoError::AbiEncoding(format!(
            "length {} is not a multiple of {ABI_WORD_BYTES}",
            bytes.len()
        )));
    }

    bytes
        .chunks(ABI_WORD_BYTES)
        .map(|word| {
            let (high, low) = word.split_at(ABI_WORD_BYTES - 8);
            if high.iter().any(|&b| b != 0) {
                return Err(CryptoError::AbiEncoding("word overflows u64".into()));
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(low);
            Ok(u64::from_be_bytes(buf))
        })
        .collect()
}

/// Compute a fingerprint for key identification using SHA-256.
pub(crate) fn compute_fingerprint(bytes: &[u8]) -> String {
    let result = Sha256::digest(bytes);
    to_hex(&result[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_key_debug_no_leak() {
        let key = ClientKey::from_bytes(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let debug_output = format!("{key:?}");

        assert!(!debug_output.contains("1, 2, 3"));
        assert!(debug_output.contains("fingerprint"));
    }

    #[test]
    fn test_fingerprint_uses_hash() {
        let fp = compute_fingerprint(&[0xde, 0xad, 0xbe, 0xef]);
        assert_ne!(fp, "deadbeef");
        assert_eq!(fp.len(), 16);
        assert_eq!(fp, compute_fingerprint(&[0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_abi_words() {
        let encoded = abi_encode_words(&[42, 7]);
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 42);
        assert_eq!(encoded[63], 7);
        assert_eq!(abi_decode_words(&encoded).expect("decodes"), vec![42, 7]);
    }

    #[test]
    fn test_abi_decode_rejects_bad_input() {
        assert!(abi_decode_words(&[0u8; 31]).is_err());

        let mut overflow = abi_encode_words(&[1]);
        overflow[0] = 1;
        assert!(abi_decode_words(&overflow).is_err());
    }

    #[test]
    fn test_handle_binds_destination() {
        let contract = Address::derive("contract");
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");

        let a = CiphertextHandle::for_input(b"ct", &contract, &alice);
        let b = CiphertextHandle::for_input(b"ct", &contract, &bob);
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<CiphertextHandle>(), Ok(a));
    }

    #[test]
    fn test_decryption_digest_depends_on_values() {
        let handle = CiphertextHandle::from_bytes([9u8; 32]);
        let d1 = decryption_proof_digest(&[handle], &abi_encode_words(&[1]));
        let d2 = decryption_proof_digest(&[handle], &abi_encode_words(&[2]));
        assert_ne!(d1, d2);
    }
}
