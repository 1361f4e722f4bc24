//! Wallet port: connection state of the user's account.

use crate::domain::Address;

pub trait WalletSession: Send + Sync {
    /// Connected account, if any.
    fn account(&self) -> Option<Address>;

    fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    fn connect(&self);

    fn disconnect(&self);
}
