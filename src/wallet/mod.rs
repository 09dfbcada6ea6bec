// Wallet collaborator - the one external, asynchronous dependency
// Principle: The tick loop never blocks on the wallet; completions come
// back as events

pub mod mock;

pub use mock::{MockWallet, MockWalletConfig};

use crate::types::{Address, Balance, TransactionId, WalletInfo, WalletTransaction};
use async_trait::async_trait;

/// Failures surfaced by a wallet collaborator
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: Balance, have: Balance },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// The capability surface the core consumes
///
/// Implementations own keys and settlement; the core only ever sees
/// balances, signatures and history entries.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Establish a session and return the connected identity
    async fn connect(&self) -> Result<WalletInfo, WalletError>;

    /// Tear the session down
    async fn disconnect(&self);

    /// Submit a transfer and return its signature
    async fn submit_transfer(
        &self,
        recipient: &Address,
        amount: Balance,
    ) -> Result<TransactionId, WalletError>;

    /// Current spendable balance
    async fn query_balance(&self) -> Result<Balance, WalletError>;

    /// Past transactions, newest first
    async fn query_history(&self) -> Result<Vec<WalletTransaction>, WalletError>;
}
