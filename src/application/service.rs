//! Subscription service: Orchestrates the contract binding and the FHE client.
//!
//! Every user action maps to exactly one sequential chain of port calls:
//! - Load: list ids, read each record, skip records that fail
//! - Create: encrypt, submit, wait, reload
//! - Decrypt: read, (verified? return) fetch handle, decrypt-verify, reload
//!
//! Nothing is retried and nothing is patched locally; the list is always
//! rebuilt from the contract after a write.

use std::sync::Arc;

use crate::domain::{
    new_subscription_id, Address, NewSubscription, SubscriptionBox, TxReceipt,
};
use crate::ports::{
    ContractProvider, ContractReader, ContractSigner, CreateBusinessData, FheClient,
};
use crate::{MysteryboxError, Result};

/// Progress points reported while an action chain runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Encrypting,
    Confirming,
    Decrypting,
    Reloading,
}

/// Records read by one full load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub boxes: Vec<SubscriptionBox>,
    /// Ids whose records could not be read
    pub skipped: Vec<String>,
}

/// Result of a confirmed creation.
#[derive(Debug)]
pub struct Created {
    pub id: String,
    pub receipt: TxReceipt,
    pub reload: Result<LoadReport>,
}

/// Result of a decrypt request.
#[derive(Debug)]
pub enum Decrypted {
    /// Record was already verified; its stored cleartext is returned as is.
    Stored(u32),
    /// Cleartext was decrypted and verified on-chain by this call.
    Verified { value: u32, reload: Result<LoadReport> },
    /// Someone verified the record first; no value is returned.
    AlreadyVerified { reload: Result<LoadReport> },
}

impl Decrypted {
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Stored(v) | Self::Verified { value: v, .. } => Some(*v),
            Self::AlreadyVerified { .. } => None,
        }
    }
}

/// Service for the subscription use cases.
pub struct SubscriptionService<P, F>
where
    P: ContractProvider,
    F: FheClient,
{
    contracts: Arc<P>,
    fhe: Arc<F>,
}

impl<P, F> SubscriptionService<P, F>
where
    P: ContractProvider,
    F: FheClient,
{
    pub fn new(contracts: Arc<P>, fhe: Arc<F>) -> Self {
        Self { contracts, fhe }
    }

    #[must_use]
    pub fn fhe_ready(&self) -> bool {
        self.fhe.is_initialized()
    }

    /// Initialize the FHE client if it is not ready yet.
    ///
    /// Returns `true` when this call performed the initialization and
    /// `false` when the client was already ready.
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn initialize_fhe(&self) -> Result<bool> {
        if self.fhe.is_initialized() {
            return Ok(false);
        }

        tracing::info!("Initializing FHE client for confidential subscriptions...");
        self.fhe.initialize()?;
        tracing::info!("FHE client initialized");
        Ok(true)
    }

    /// Read every record from the contract.
    ///
    /// A record that fails to load is logged and left out.
    ///
    /// # Errors
    /// Returns error if the contract or the id list cannot be read.
    pub fn load_subscriptions(&self) -> Result<LoadReport> {
        let contract = self.contracts.read_only()?;
        let ids = contract.get_all_business_ids()?;

        let mut report = LoadReport::default();
        for id in ids {
            match contract.get_business_data(&id) {
                Ok(data) => report.boxes.push(SubscriptionBox::from_contract(id, data)),
                Err(e) => {
                    tracing::warn!("Error loading subscription {}: {}", id, e);
                    report.skipped.push(id);
                }
            }
        }

        tracing::debug!(
            "Loaded {} subscriptions ({} skipped)",
            report.boxes.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Send the contract's availability transaction and wait for it.
    ///
    /// # Errors
    /// Returns error if the transaction fails.
    pub fn check_availability(&self, account: &Address) -> Result<TxReceipt> {
        let contract = self.contracts.with_signer(account)?;
        let tx = contract.is_available()?;
        let receipt = contract.wait(&tx)?;
        tracing::info!("Availability confirmed in block {}", receipt.block_number);
        Ok(receipt)
    }

    /// Encrypt the preference, create the record and reload.
    ///
    /// # Errors
    /// Returns error if encryption, submission or confirmation fails. A
    /// failed reload after confirmation is reported inside `Created`.
    pub fn create_subscription(
        &self,
        account: &Address,
        new: &NewSubscription,
        progress: &mut dyn FnMut(Stage),
    ) -> Result<Created> {
        let contract = self.contracts.with_signer(account)?;
        let id = new_subscription_id();

        progress(Stage::Encrypting);
        let encrypted = self
            .fhe
            .encrypt(&contract.address(), account, new.preference.value())?;
        tracing::debug!("Encrypted preference for {} as {}", id, encrypted.encrypted_data);

        let call = CreateBusinessData {
            id: id.clone(),
            name: new.name.clone(),
            encrypted,
            public_value1: new.category.code(),
            public_value2: 0,
            description: new.description.clone(),
        };
        let tx = contract.create_business_data(&call)?;

        progress(Stage::Confirming);
        let receipt = contract.wait(&tx)?;
        tracing::info!("Created subscription {} in block {}", id, receipt.block_number);

        progress(Stage::Reloading);
        let reload = self.load_subscriptions();

        Ok(Created { id, receipt, reload })
    }

    /// Reveal the preference of record `id`.
    ///
    /// Verified records return their stored cleartext without touching the
    /// FHE client. The contract's "already verified" revert converges to
    /// `Decrypted::AlreadyVerified`.
    ///
    /// # Errors
    /// Returns any other failure of the chain.
    pub fn decrypt_preference(
        &self,
        account: &Address,
        id: &str,
        progress: &mut dyn FnMut(Stage),
    ) -> Result<Decrypted> {
        match self.decrypt_inner(account, id, progress) {
            Err(e) if e.is_already_verified() => {
                tracing::info!("Subscription {} was already verified", id);
                progress(Stage::Reloading);
                Ok(Decrypted::AlreadyVerified {
                    reload: self.load_subscriptions(),
                })
            }
            other => other,
        }
    }

    fn decrypt_inner(
        &self,
        account: &Address,
        id: &str,
        progress: &mut dyn FnMut(Stage),
    ) -> Result<Decrypted> {
        let reader = self.contracts.read_only()?;

        let data = reader.get_business_data(id)?;
        if data.is_verified {
            return Ok(Decrypted::Stored(data.decrypted_value));
        }

        let signer = self.contracts.with_signer(account)?;
        let handle = reader.get_encrypted_value(id)?;

        progress(Stage::Decrypting);
        let result = self.fhe.verify_decryption(
            &[handle],
            &signer.address(),
            &mut |clear_values: &[u8], proof: &[u8]| {
                let tx = signer.verify_decryption(id, clear_values, proof)?;
                signer.wait(&tx)?;
                Ok(())
            },
        )?;

        let clear = result
            .value_of(&handle)
            .ok_or(MysteryboxError::MissingCleartext(handle))?;
        let value = u32::try_from(clear).map_err(|_| MysteryboxError::CleartextOutOfRange(clear))?;
        tracing::info!("Decrypted and verified preference for {}", id);

        progress(Stage::Reloading);
        let reload = self.load_subscriptions();

        Ok(Decrypted::Verified { value, reload })
    }
}
