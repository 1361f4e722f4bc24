//! In-memory port fakes for application tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{
    abi_decode_words, abi_encode_words, Address, BusinessData, CiphertextHandle, DecryptionResult,
    EncryptedInput, PendingTx, TxHash, TxReceipt,
};
use crate::ports::{
    ContractError, ContractProvider, ContractReader, ContractSigner, CreateBusinessData,
    FheClient, FheError, SubmitDecryption,
};

fn handle_for(value: u64) -> CiphertextHandle {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&value.to_be_bytes());
    CiphertextHandle::from_bytes(bytes)
}

fn value_of(handle: &CiphertextHandle) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&handle.as_bytes()[24..]);
    u64::from_be_bytes(buf)
}

#[derive(Default)]
struct FakeState {
    records: Vec<(String, BusinessData, CiphertextHandle)>,
    failing_reads: HashSet<String>,
    fail_ids: bool,
    reject: bool,
    verify_revert: Option<String>,
    create_revert: Option<String>,
    fail_availability: bool,
    calls: Vec<&'static str>,
    nonce: u64,
}

/// Contract fake whose handles encode the cleartext they stand for.
#[derive(Clone, Default)]
pub struct FakeChain {
    state: Arc<Mutex<FakeState>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().expect("fake chain lock");
        f(&mut state)
    }

    pub fn insert_record(&self, id: &str, verified: bool, value: u32) {
        self.with(|s| {
            s.records.push((
                id.to_string(),
                BusinessData {
                    name: format!("Box {id}"),
                    public_value1: 0,
                    public_value2: 0,
                    description: format!("Description of {id}"),
                    creator: Address::derive(id),
                    timestamp: 1_700_000_000,
                    is_verified: verified,
                    decrypted_value: value,
                },
                handle_for(u64::from(value)),
            ));
        });
    }

    pub fn set_secret(&self, id: &str, value: u64) {
        self.with(|s| {
            if let Some(record) = s.records.iter_mut().find(|(rid, _, _)| rid == id) {
                record.2 = handle_for(value);
            }
        });
    }

    pub fn fail_reads_of(&self, id: &str) {
        self.with(|s| {
            s.failing_reads.insert(id.to_string());
        });
    }

    pub fn fail_id_listing(&self) {
        self.with(|s| s.fail_ids = true);
    }

    pub fn reject_signatures(&self) {
        self.with(|s| s.reject = true);
    }

    pub fn revert_verification_with(&self, reason: &str) {
        self.with(|s| s.verify_revert = Some(reason.to_string()));
    }

    pub fn fail_creation_with(&self, reason: &str) {
        self.with(|s| s.create_revert = Some(reason.to_string()));
    }

    pub fn fail_availability(&self) {
        self.with(|s| s.fail_availability = true);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.with(|s| s.calls.clone())
    }

    fn next_tx(&self, s: &mut FakeState, from: Address) -> PendingTx {
        s.nonce += 1;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&s.nonce.to_be_bytes());
        PendingTx {
            hash: TxHash::from_bytes(bytes),
            from,
            nonce: s.nonce,
        }
    }
}

/// Binding handed out by `FakeChain`, reader and signer alike.
#[derive(Clone)]
pub struct FakeBinding {
    chain: FakeChain,
    account: Address,
}

impl ContractProvider for FakeChain {
    type Reader = FakeBinding;
    type Signer = FakeBinding;

    fn read_only(&self) -> Result<FakeBinding, ContractError> {
        Ok(FakeBinding {
            chain: self.clone(),
            account: Address::ZERO,
        })
    }

    fn with_signer(&self, account: &Address) -> Result<FakeBinding, ContractError> {
        Ok(FakeBinding {
            chain: self.clone(),
            account: *account,
        })
    }
}

impl ContractReader for FakeBinding {
    fn address(&self) -> Address {
        Address::derive("fake-contract")
    }

    fn get_all_business_ids(&self) -> Result<Vec<String>, ContractError> {
        self.chain.with(|s| {
            s.calls.push("get_all_business_ids");
            if s.fail_ids {
                return Err(ContractError::Transport("connection refused".into()));
            }
            Ok(s.records.iter().map(|(id, _, _)| id.clone()).collect())
        })
    }

    fn get_business_data(&self, id: &str) -> Result<BusinessData, ContractError> {
        self.chain.with(|s| {
            s.calls.push("get_business_data");
            if s.failing_reads.contains(id) {
                return Err(ContractError::Transport("decode error".into()));
            }
            s.records
                .iter()
                .find(|(rid, _, _)| rid == id)
                .map(|(_, data, _)| data.clone())
                .ok_or_else(|| ContractError::Reverted("Business data does not exist".into()))
        })
    }

    fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ContractError> {
        self.chain.with(|s| {
            s.calls.push("get_encrypted_value");
            s.records
                .iter()
                .find(|(rid, _, _)| rid == id)
                .map(|(_, _, handle)| *handle)
                .ok_or_else(|| ContractError::Reverted("Business data does not exist".into()))
        })
    }
}

impl ContractSigner for FakeBinding {
    fn is_available(&self) -> Result<PendingTx, ContractError> {
        let account = self.account;
        self.chain.with(|s| {
            s.calls.push("is_available");
            if s.reject {
                return Err(ContractError::UserRejected);
            }
            if s.fail_availability {
                return Err(ContractError::Reverted("System unavailable".into()));
            }
            Ok(self.chain.next_tx(s, account))
        })
    }

    fn create_business_data(&self, call: &CreateBusinessData) -> Result<PendingTx, ContractError> {
        let account = self.account;
        self.chain.with(|s| {
            s.calls.push("create_business_data");
            if s.reject {
                return Err(ContractError::UserRejected);
            }
            if let Some(reason) = &s.create_revert {
                return Err(ContractError::Reverted(reason.clone()));
            }
            s.records.push((
                call.id.clone(),
                BusinessData {
                    name: call.name.clone(),
                    public_value1: call.public_value1,
                    public_value2: call.public_value2,
                    description: call.description.clone(),
                    creator: account,
                    timestamp: 1_700_000_000,
                    is_verified: false,
                    decrypted_value: 0,
                },
                call.encrypted.encrypted_data,
            ));
            Ok(self.chain.next_tx(s, account))
        })
    }

    fn verify_decryption(
        &self,
        id: &str,
        abi_clear_values: &[u8],
        _proof: &[u8],
    ) -> Result<PendingTx, ContractError> {
        let account = self.account;
        self.chain.with(|s| {
            s.calls.push("verify_decryption");
            if s.reject {
                return Err(ContractError::UserRejected);
            }
            if let Some(reason) = &s.verify_revert {
                return Err(ContractError::Reverted(reason.clone()));
            }
            let values = abi_decode_words(abi_clear_values)
                .map_err(|e| ContractError::Reverted(e.to_string()))?;
            let record = s
                .records
                .iter_mut()
                .find(|(rid, _, _)| rid == id)
                .ok_or_else(|| ContractError::Reverted("Business data does not exist".into()))?;
            record.1.is_verified = true;
            record.1.decrypted_value = values[0] as u32;
            Ok(self.chain.next_tx(s, account))
        })
    }

    fn wait(&self, tx: &PendingTx) -> Result<TxReceipt, ContractError> {
        self.chain.with(|s| {
            s.calls.push("wait");
            Ok(TxReceipt {
                hash: tx.hash,
                block_number: tx.nonce,
                success: true,
            })
        })
    }
}

/// FHE fake that "encrypts" by embedding the value in the handle.
pub struct FakeFhe {
    initialized: AtomicBool,
    fail_init: bool,
    encrypt_calls: AtomicUsize,
    verify_calls: AtomicUsize,
}

impl FakeFhe {
    pub fn ready() -> Self {
        Self {
            initialized: AtomicBool::new(true),
            fail_init: false,
            encrypt_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
        }
    }

    pub fn uninitialized() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            ..Self::ready()
        }
    }

    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::uninitialized()
        }
    }

    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl FheClient for FakeFhe {
    fn initialize(&self) -> Result<(), FheError> {
        if self.fail_init {
            return Err(FheError::Gateway("relayer unreachable".into()));
        }
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn encrypt(
        &self,
        _contract: &Address,
        _user: &Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError> {
        if !self.is_initialized() {
            return Err(FheError::NotInitialized);
        }
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(EncryptedInput {
            encrypted_data: handle_for(u64::from(value)),
            proof: b"fake-input-proof".to_vec(),
        })
    }

    fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        _contract: &Address,
        submit: &mut SubmitDecryption<'_>,
    ) -> Result<DecryptionResult, FheError> {
        if !self.is_initialized() {
            return Err(FheError::NotInitialized);
        }
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        let values: Vec<u64> = handles.iter().map(value_of).collect();
        submit(&abi_encode_words(&values), b"fake-decryption-proof")?;

        Ok(DecryptionResult {
            clear_values: handles.iter().copied().zip(values).collect(),
        })
    }
}
