//! TFHE adapter: Implementation of FheClient using tfhe-rs.
//!
//! This module provides the FHE SDK role for the client using Zama's
//! tfhe-rs library, together with the gateway signer that attests inputs
//! and decryptions.
//!
//! # Security
//!
//! - Preferences are encrypted as `FheUint32` under a locally generated
//!   client key; only handles ever reach the contract
//! - Input proofs bind a handle to (contract, user) with an Ed25519 signature
//! - Decryption proofs bind the ordered handles to the ABI-encoded cleartexts
//! - The gateway seed is read from a file and zeroized after use
//!
//! # Key Lifecycle
//!
//! Keys are generated by `initialize()` and live in memory only. A new
//! process generates a new client key, so ciphertexts do not outlive it.
//!
//! To use a stable gateway key across runs:
//! 1. Generate a seed: `cargo run --bin generate_gateway_key -- --out-seed <path>`
//! 2. Point `MYSTERYBOX_GATEWAY_SEED_FILE` at it

use std::path::Path;
use std::sync::{Arc, RwLock};

use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zeroize::Zeroizing;

// tfhe-rs imports
use tfhe::prelude::*;
use tfhe::{ClientKey as TfheClientKey, ConfigBuilder, FheUint32};

use crate::domain::{
    abi_encode_words, decryption_proof_digest, input_proof_digest, Address, CiphertextHandle,
    ClientKey, CryptoError, DecryptionResult, EncryptedInput,
};
use crate::ports::{CiphertextGateway, FheClient, FheError, SubmitDecryption};

/// Load the gateway signing key from a base64 seed file.
///
/// # Errors
/// Returns error if the file cannot be read or does not hold a 32-byte seed.
pub fn load_gateway_key(path: &Path) -> Result<SigningKey, CryptoError> {
    let b64 = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        CryptoError::InvalidKeyFormat(format!("Failed reading gateway seed file: {e}"))
    })?);
    let bytes = Zeroizing::new(
        base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|_| CryptoError::InvalidKeyFormat("Invalid gateway seed base64".into()))?,
    );
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidKeyFormat(
            "Invalid gateway seed length (expected 32 bytes)".into(),
        ));
    }

    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&bytes);
    Ok(SigningKey::from_bytes(&seed))
}

/// Generate a throwaway gateway signing key from OS entropy.
#[must_use]
pub fn ephemeral_gateway_key() -> SigningKey {
    let mut rng = ChaCha20Rng::from_entropy();
    SigningKey::generate(&mut rng)
}

/// Client key material held after initialization.
struct Keys {
    /// Serialized key, zeroized on drop; carries the fingerprint
    serialized: ClientKey,
    tfhe: TfheClientKey,
}

/// tfhe-rs backed FHE client.
///
/// Ciphertexts are uploaded to `gateway` on encryption and fetched back
/// for public decryption.
pub struct TfheClient<G: CiphertextGateway> {
    gateway: Arc<G>,
    gateway_signer: SigningKey,
    keys: RwLock<Option<Keys>>,
}

impl<G: CiphertextGateway> TfheClient<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, gateway_signer: SigningKey) -> Self {
        tracing::info!("Initializing TfheClient (tfhe-rs)");
        Self {
            gateway,
            gateway_signer,
            keys: RwLock::new(None),
        }
    }

    /// Key the contract must trust for input and decryption proofs.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.gateway_signer.verifying_key()
    }

    /// Fingerprint of the active client key.
    #[must_use]
    pub fn key_fingerprint(&self) -> Option<String> {
        self.keys
            .read()
            .ok()
            .and_then(|keys| keys.as_ref().map(|k| k.serialized.fingerprint.clone()))
    }

    fn with_key<T>(
        &self,
        f: impl FnOnce(&TfheClientKey) -> Result<T, FheError>,
    ) -> Result<T, FheError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| CryptoError::InvalidKeyFormat("client key lock poisoned".into()))?;
        let keys = keys.as_ref().ok_or(FheError::NotInitialized)?;
        f(&keys.tfhe)
    }

    fn decrypt_handle(&self, key: &TfheClientKey, handle: &CiphertextHandle) -> Result<u64, FheError> {
        let bytes = self.gateway.fetch(handle)?;
        let encrypted: FheUint32 = bincode::deserialize(&bytes).map_err(|e| {
            CryptoError::Decryption(format!("Failed to deserialize ciphertext {handle}: {e}"))
        })?;
        let clear: u32 = encrypted.decrypt(key);
        Ok(u64::from(clear))
    }
}

impl<G: CiphertextGateway> FheClient for TfheClient<G> {
    fn initialize(&self) -> Result<(), FheError> {
        if self.is_initialized() {
            return Ok(());
        }

        tracing::info!("Generating FHE client key...");
        let config = ConfigBuilder::default().build();
        let tfhe = TfheClientKey::generate(config);

        let bytes = bincode::serialize(&tfhe).map_err(|e| {
            CryptoError::KeyGeneration(format!("Failed to serialize client key: {e}"))
        })?;
        let serialized = ClientKey::from_bytes(bytes);
        tracing::info!("Generated client key - fingerprint: {}", serialized.fingerprint);

        let mut keys = self
            .keys
            .write()
            .map_err(|_| CryptoError::KeyGeneration("client key lock poisoned".into()))?;
        *keys = Some(Keys { serialized, tfhe });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.keys.read().map(|k| k.is_some()).unwrap_or(false)
    }

    fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError> {
        let ciphertext = self.with_key(|key| {
            let encrypted = FheUint32::encrypt(value, key);
            bincode::serialize(&encrypted)
                .map_err(|e| CryptoError::Encryption(format!("Failed to serialize ciphertext: {e}")).into())
        })?;

        let handle = CiphertextHandle::for_input(&ciphertext, contract, user);
        tracing::debug!("Encrypted input {} ({} bytes)", handle, ciphertext.len());
        self.gateway.upload(handle, ciphertext)?;

        let digest = input_proof_digest(&handle, contract, user);
        let proof = self.gateway_signer.sign(&digest).to_bytes().to_vec();

        Ok(EncryptedInput {
            encrypted_data: handle,
            proof,
        })
    }

    fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        contract: &Address,
        submit: &mut SubmitDecryption<'_>,
    ) -> Result<DecryptionResult, FheError> {
        let values = self.with_key(|key| {
            handles
                .iter()
                .map(|handle| self.decrypt_handle(key, handle))
                .collect::<Result<Vec<u64>, FheError>>()
        })?;

        let abi_clear_values = abi_encode_words(&values);
        let digest = decryption_proof_digest(handles, &abi_clear_values);
        let proof = self.gateway_signer.sign(&digest).to_bytes();

        tracing::info!("Submitting {} decrypted value(s) to {}", handles.len(), contract);
        submit(&abi_clear_values, &proof)?;

        Ok(DecryptionResult {
            clear_values: handles.iter().copied().zip(values).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::devnet::Devnet;
    use crate::application::{Decrypted, SubscriptionService};
    use crate::domain::{Category, NewSubscription, Preference};
    use crate::ports::{ContractError, ContractProvider, ContractReader, ContractSigner};
    use base64::engine::general_purpose;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn local_stack() -> (Arc<Devnet>, Arc<TfheClient<Devnet>>) {
        let signer = ephemeral_gateway_key();
        let devnet = Arc::new(Devnet::new(Address::derive("contract"), signer.verifying_key()));
        let client = Arc::new(TfheClient::new(devnet.clone(), signer));
        (devnet, client)
    }

    #[test]
    fn test_requires_initialization() {
        let (devnet, client) = local_stack();
        assert!(!client.is_initialized());
        let err = client
            .encrypt(&devnet.address(), &Address::derive("alice"), 5)
            .expect_err("not initialized");
        assert!(matches!(err, FheError::NotInitialized));
    }

    #[test]
    fn test_encrypt_uploads_and_decrypts() {
        let (devnet, client) = local_stack();
        client.initialize().expect("Key generation should succeed");
        assert!(client.key_fingerprint().is_some());

        let alice = Address::derive("alice");
        let input = client
            .encrypt(&devnet.address(), &alice, 73)
            .expect("Encryption should succeed");
        assert_eq!(input.proof.len(), 64);
        assert!(
            devnet.fetch(&input.encrypted_data).expect("stored").len() > 100,
            "FHE ciphertext should be substantial"
        );

        let mut submitted = Vec::new();
        let result = client
            .verify_decryption(&[input.encrypted_data], &devnet.address(), &mut |abi: &[u8], proof: &[u8]| {
                submitted.push((abi.to_vec(), proof.len()));
                Ok(())
            })
            .expect("Decryption should succeed");

        assert_eq!(result.value_of(&input.encrypted_data), Some(73));
        assert_eq!(submitted, vec![(abi_encode_words(&[73]), 64)]);
    }

    #[test]
    fn test_submit_failure_is_reported() {
        let (devnet, client) = local_stack();
        client.initialize().expect("init");
        let input = client
            .encrypt(&devnet.address(), &Address::derive("alice"), 1)
            .expect("encrypt");

        let err = client
            .verify_decryption(&[input.encrypted_data], &devnet.address(), &mut |_: &[u8], _: &[u8]| {
                Err(ContractError::UserRejected)
            })
            .expect_err("submission rejected");
        assert!(matches!(err, FheError::Submission(ContractError::UserRejected)));
    }

    #[test]
    fn test_proofs_accepted_by_devnet() {
        let (devnet, client) = local_stack();
        client.initialize().expect("init");
        let alice = Address::derive("alice");
        let signer = devnet.with_signer(&alice).expect("signer");

        let input = client.encrypt(&devnet.address(), &alice, 9).expect("encrypt");
        let handle = input.encrypted_data;
        let tx = signer
            .create_business_data(&crate::ports::CreateBusinessData {
                id: "subscription-1".into(),
                name: "Sock Box".into(),
                encrypted: input,
                public_value1: 1,
                public_value2: 0,
                description: String::new(),
            })
            .expect("input proof accepted");
        signer.wait(&tx).expect("mined");

        client
            .verify_decryption(&[handle], &devnet.address(), &mut |abi: &[u8], proof: &[u8]| {
                let tx = signer.verify_decryption("subscription-1", abi, proof)?;
                signer.wait(&tx)?;
                Ok(())
            })
            .expect("decryption proof accepted");

        let data = signer.get_business_data("subscription-1").expect("record");
        assert!(data.is_verified);
        assert_eq!(data.decrypted_value, 9);
    }

    #[test]
    fn test_create_then_decrypt_round_trip() {
        let (devnet, client) = local_stack();
        let service = SubscriptionService::new(devnet.clone(), client);
        service.initialize_fhe().expect("init");
        let alice = Address::derive("alice");

        for preference in [1u64, 50, 100] {
            let new = NewSubscription {
                name: format!("Box {preference}"),
                category: Category::Beauty,
                preference: Preference::new(preference).expect("in range"),
                description: String::new(),
            };
            let created = service
                .create_subscription(&alice, &new, &mut |_| {})
                .expect("create");

            let out = service
                .decrypt_preference(&alice, &created.id, &mut |_| {})
                .expect("decrypt");
            assert!(matches!(out, Decrypted::Verified { .. }));
            assert_eq!(out.value(), Some(preference as u32));

            let again = service
                .decrypt_preference(&alice, &created.id, &mut |_| {})
                .expect("stored");
            assert!(matches!(again, Decrypted::Stored(v) if u64::from(v) == preference));

            // Ids are millisecond timestamps.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let reader = devnet.read_only().expect("reader");
        assert_eq!(reader.get_all_business_ids().expect("ids").len(), 3);
    }

    #[test]
    fn test_load_gateway_key_from_file() {
        let key = ephemeral_gateway_key();
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{}", general_purpose::STANDARD.encode(key.to_bytes())).expect("write");

        let loaded = load_gateway_key(file.path()).expect("valid seed");
        assert_eq!(loaded.verifying_key(), key.verifying_key());
    }

    #[test]
    fn test_load_gateway_key_rejects_bad_seed() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{}", general_purpose::STANDARD.encode([1u8; 16])).expect("write");
        assert!(matches!(
            load_gateway_key(file.path()),
            Err(CryptoError::InvalidKeyFormat(_))
        ));
    }
}
