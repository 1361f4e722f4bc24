//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `devnet`: in-process chain running the subscription contract and gateway
//! - `tfhe`: tfhe-rs for FHE operations
//! - `wallet`: local development wallet
//! - `sanitize`: secret filtering for logs

pub mod devnet;
pub mod sanitize;
pub mod tfhe;
pub mod wallet;

pub use devnet::Devnet;
pub use self::tfhe::TfheClient;
pub use wallet::LocalWallet;
