//! Wallet adapter: Local development account with a connect toggle.

use std::sync::RwLock;

use crate::domain::Address;
use crate::ports::WalletSession;

/// Wallet session backed by a single configured account.
pub struct LocalWallet {
    account: Address,
    connected: RwLock<bool>,
}

impl LocalWallet {
    #[must_use]
    pub fn new(account: Address) -> Self {
        Self {
            account,
            connected: RwLock::new(false),
        }
    }

    /// Configured account, whether or not it is unlocked.
    #[must_use]
    pub fn address(&self) -> Address {
        self.account
    }
}

impl WalletSession for LocalWallet {
    fn account(&self) -> Option<Address> {
        let connected = self.connected.read().map(|c| *c).unwrap_or(false);
        connected.then_some(self.account)
    }

    fn connect(&self) {
        if let Ok(mut connected) = self.connected.write() {
            *connected = true;
            tracing::info!("Local wallet unlocked for {}", self.account.short());
        }
    }

    fn disconnect(&self) {
        if let Ok(mut connected) = self.connected.write() {
            *connected = false;
        }
    }
}
