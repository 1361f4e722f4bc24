//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (contract, FHE SDK, wallet).

mod contract;
mod fhe_client;
mod gateway;
mod wallet;

pub use contract::{
    ContractError, ContractProvider, ContractReader, ContractSigner, CreateBusinessData,
    ALREADY_VERIFIED_REASON,
};
pub use fhe_client::{FheClient, FheError, SubmitDecryption};
pub use gateway::CiphertextGateway;
pub use wallet::WalletSession;
