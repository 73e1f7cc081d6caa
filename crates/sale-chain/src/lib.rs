//! `sale-chain`: wallet connection and sale deployment through an alloy
//! provider.
//!
//! # Architecture
//!
//! ```text
//! SaleParams (sale-core)
//!     │
//!     ▼
//! flow::prepare   ← eth_requestAccounts, eth_chainId, eth_blockNumber
//!     │              builds SaleConfig + RedeemableConfig for the account
//!     ▼
//! SaleFactory     ← ISaleFactory.createChildTyped (abi.rs), waits for the
//!     │              receipt, decodes NewChild from the factory's logs
//!     ▼
//! DeployedSale    ← ISale.calculatePrice(units) via eth_call
//! ```
//!
//! Signing never happens here: the wallet behind the provider's endpoint owns
//! the keys and signs what it is sent.

pub mod abi;
pub mod error;
pub mod factory;
pub mod flow;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use error::ChainError;
pub use factory::{DeployedSale, Deployment, SaleFactory};
pub use flow::{deploy_flow, prepare, DeployOutcome, DeployRequest, Prepared};
pub use wallet::{connect, request_accounts};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ChainError>;
