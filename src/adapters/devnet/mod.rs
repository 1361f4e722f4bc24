//! Devnet adapter: In-process chain running the subscription contract.
//!
//! Provides a local stand-in for the deployed contract and the ciphertext
//! gateway so the client runs end-to-end without a network.
//!
//! # Contract semantics
//!
//! - `createBusinessData` reverts on a duplicate id and on an input proof
//!   that the gateway key did not sign for (handle, contract, sender)
//! - `verifyDecryption` reverts on an unknown id, on an already verified
//!   record, and on a decryption proof not signed for (handle, cleartexts)
//! - Every accepted write is mined into its own block immediately; `wait`
//!   returns the stored receipt
//!
//! # Mutex Behavior
//!
//! All state sits behind one `Mutex`. A poisoned lock is reported as a
//! transport error instead of panicking the UI thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::domain::{
    abi_decode_words, decryption_proof_digest, input_proof_digest, Address, BusinessData,
    CiphertextHandle, PendingTx, TxHash, TxReceipt,
};
use crate::ports::{
    CiphertextGateway, ContractError, ContractProvider, ContractReader, ContractSigner,
    CreateBusinessData, FheError, ALREADY_VERIFIED_REASON,
};

const DUPLICATE_REASON: &str = "Business data already exists";
const MISSING_REASON: &str = "Business data does not exist";
const INPUT_PROOF_REASON: &str = "Invalid input proof";
const DECRYPTION_PROOF_REASON: &str = "Invalid decryption proof";

/// One stored subscription record.
#[derive(Debug, Clone)]
struct Record {
    data: BusinessData,
    encrypted_value: CiphertextHandle,
}

#[derive(Debug, Default)]
struct ChainState {
    /// Record ids in creation order
    ids: Vec<String>,
    records: HashMap<String, Record>,
    ciphertexts: HashMap<CiphertextHandle, Vec<u8>>,
    receipts: HashMap<TxHash, TxReceipt>,
    nonces: HashMap<Address, u64>,
    block_number: u64,
}

impl ChainState {
    /// Mine a single-transaction block and record its receipt.
    fn mine(&mut self, from: Address, method: &str) -> PendingTx {
        let nonce = self.nonces.entry(from).or_insert(0);
        let tx_nonce = *nonce;
        *nonce += 1;

        let mut hasher = Sha256::new();
        hasher.update(from.as_bytes());
        hasher.update(tx_nonce.to_be_bytes());
        hasher.update(method.as_bytes());
        let hash = TxHash::from_bytes(hasher.finalize().into());

        self.block_number += 1;
        self.receipts.insert(
            hash,
            TxReceipt {
                hash,
                block_number: self.block_number,
                success: true,
            },
        );
        tracing::debug!("Mined {} from {} in block {}", method, from.short(), self.block_number);

        PendingTx {
            hash,
            from,
            nonce: tx_nonce,
        }
    }

    fn record(&self, id: &str) -> Result<&Record, ContractError> {
        self.records
            .get(id)
            .ok_or_else(|| ContractError::Reverted(MISSING_REASON.into()))
    }
}

/// Local chain with the subscription contract deployed at `address`.
#[derive(Clone)]
pub struct Devnet {
    state: Arc<Mutex<ChainState>>,
    address: Address,
    gateway_key: VerifyingKey,
}

impl Devnet {
    /// Deploy a fresh contract that trusts proofs signed by `gateway_key`.
    #[must_use]
    pub fn new(address: Address, gateway_key: VerifyingKey) -> Self {
        tracing::info!("Devnet contract deployed at {}", address);
        Self {
            state: Arc::new(Mutex::new(ChainState::default())),
            address,
            gateway_key,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current block height.
    ///
    /// # Errors
    /// Returns error if the state lock is poisoned.
    pub fn block_number(&self) -> Result<u64, ContractError> {
        Ok(self.lock()?.block_number)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChainState>, ContractError> {
        self.state
            .lock()
            .map_err(|_| ContractError::Transport("devnet state lock poisoned".into()))
    }

    fn verify_signature(&self, digest: &[u8; 32], proof: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(proof) else {
            return false;
        };
        self.gateway_key.verify(digest, &signature).is_ok()
    }

    fn reader(&self) -> DevnetReader {
        DevnetReader { chain: self.clone() }
    }
}

impl ContractProvider for Devnet {
    type Reader = DevnetReader;
    type Signer = DevnetSigner;

    fn read_only(&self) -> Result<DevnetReader, ContractError> {
        Ok(self.reader())
    }

    fn with_signer(&self, account: &Address) -> Result<DevnetSigner, ContractError> {
        if *account == Address::ZERO {
            return Err(ContractError::Unavailable("no signer account".into()));
        }
        Ok(DevnetSigner {
            reader: self.reader(),
            account: *account,
        })
    }
}

impl CiphertextGateway for Devnet {
    fn upload(&self, handle: CiphertextHandle, ciphertext: Vec<u8>) -> Result<(), FheError> {
        let mut state = self
            .lock()
            .map_err(|e| FheError::Gateway(e.to_string()))?;
        tracing::debug!("Gateway stored {} ({} bytes)", handle, ciphertext.len());
        state.ciphertexts.insert(handle, ciphertext);
        Ok(())
    }

    fn fetch(&self, handle: &CiphertextHandle) -> Result<Vec<u8>, FheError> {
        let state = self
            .lock()
            .map_err(|e| FheError::Gateway(e.to_string()))?;
        state
            .ciphertexts
            .get(handle)
            .cloned()
            .ok_or(FheError::UnknownHandle(*handle))
    }
}

/// Read-only binding.
#[derive(Clone)]
pub struct DevnetReader {
    chain: Devnet,
}

impl ContractReader for DevnetReader {
    fn address(&self) -> Address {
        self.chain.address
    }

    fn get_all_business_ids(&self) -> Result<Vec<String>, ContractError> {
        Ok(self.chain.lock()?.ids.clone())
    }

    fn get_business_data(&self, id: &str) -> Result<BusinessData, ContractError> {
        let state = self.chain.lock()?;
        Ok(state.record(id)?.data.clone())
    }

    fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ContractError> {
        let state = self.chain.lock()?;
        Ok(state.record(id)?.encrypted_value)
    }
}

/// Binding that sends transactions from `account`.
#[derive(Clone)]
pub struct DevnetSigner {
    reader: DevnetReader,
    account: Address,
}

impl ContractReader for DevnetSigner {
    fn address(&self) -> Address {
        self.reader.address()
    }

    fn get_all_business_ids(&self) -> Result<Vec<String>, ContractError> {
        self.reader.get_all_business_ids()
    }

    fn get_business_data(&self, id: &str) -> Result<BusinessData, ContractError> {
        self.reader.get_business_data(id)
    }

    fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ContractError> {
        self.reader.get_encrypted_value(id)
    }
}

impl ContractSigner for DevnetSigner {
    fn is_available(&self) -> Result<PendingTx, ContractError> {
        let mut state = self.reader.chain.lock()?;
        Ok(state.mine(self.account, "isAvailable"))
    }

    fn create_business_data(&self, call: &CreateBusinessData) -> Result<PendingTx, ContractError> {
        let chain = &self.reader.chain;
        let handle = call.encrypted.encrypted_data;
        let digest = input_proof_digest(&handle, &chain.address, &self.account);
        if !chain.verify_signature(&digest, &call.encrypted.proof) {
            return Err(ContractError::Reverted(INPUT_PROOF_REASON.into()));
        }

        let mut state = chain.lock()?;
        if state.records.contains_key(&call.id) {
            return Err(ContractError::Reverted(DUPLICATE_REASON.into()));
        }

        let timestamp = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        state.records.insert(
            call.id.clone(),
            Record {
                data: BusinessData {
                    name: call.name.clone(),
                    public_value1: call.public_value1,
                    public_value2: call.public_value2,
                    description: call.description.clone(),
                    creator: self.account,
                    timestamp,
                    is_verified: false,
                    decrypted_value: 0,
                },
                encrypted_value: handle,
            },
        );
        state.ids.push(call.id.clone());
        tracing::info!("Business data {} created by {}", call.id, self.account.short());

        Ok(state.mine(self.account, "createBusinessData"))
    }

    fn verify_decryption(
        &self,
        id: &str,
        abi_clear_values: &[u8],
        proof: &[u8],
    ) -> Result<PendingTx, ContractError> {
        let chain = &self.reader.chain;
        let mut state = chain.lock()?;

        let record = state.record(id)?;
        if record.data.is_verified {
            return Err(ContractError::Reverted(ALREADY_VERIFIED_REASON.into()));
        }

        let digest = decryption_proof_digest(&[record.encrypted_value], abi_clear_values);
        if !chain.verify_signature(&digest, proof) {
            return Err(ContractError::Reverted(DECRYPTION_PROOF_REASON.into()));
        }

        let clear = abi_decode_words(abi_clear_values)
            .ok()
            .and_then(|words| words.first().copied())
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ContractError::Reverted(DECRYPTION_PROOF_REASON.into()))?;

        if let Some(record) = state.records.get_mut(id) {
            record.data.is_verified = true;
            record.data.decrypted_value = clear;
        }
        tracing::info!("Business data {} verified", id);

        Ok(state.mine(self.account, "verifyDecryption"))
    }

    fn wait(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError> {
        let state = self.reader.chain.lock()?;
        state
            .receipts
            .get(&tx.hash)
            .cloned()
            .ok_or_else(|| ContractError::UnknownTransaction(tx.hash.to_string()))
    }
}
