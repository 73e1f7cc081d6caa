use alloy::primitives::B256;
use alloy::providers::PendingTransactionError;
use alloy::transports::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no wallet provider configured: set wallet.url or pass --wallet-url")]
    NoWallet,

    #[error("invalid wallet url '{url}': {reason}")]
    InvalidWalletUrl { url: String, reason: String },

    #[error("wallet returned no accounts; unlock the wallet and approve the connection")]
    NoAccounts,

    #[error("no sale factory configured: set 'factory' in .rainsale/config.yaml")]
    MissingFactory,

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    #[error("transaction {tx_hash} was not confirmed: {source}")]
    Unconfirmed {
        tx_hash: B256,
        #[source]
        source: PendingTransactionError,
    },

    #[error("transaction {tx_hash} emitted no NewChild event from the factory")]
    MissingChild { tx_hash: B256 },

    #[error("wallet request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error(transparent)]
    Sale(#[from] sale_core::SaleError),
}
