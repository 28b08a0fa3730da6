//! The network boundary.
//!
//! A [`Client`] fetches transaction inputs, submits signed transactions and
//! reports their on-chain status. Concrete RPC clients live outside this
//! crate; the trait is the only contract the pipeline depends on.
//!
//! Retries and timeouts belong to the implementation. Dropping a returned
//! future cancels the request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crossgate_core::error::ClientError;
use crossgate_core::{Address, Amount, FeeEntry, TxHash};

use crate::input::TxInput;
use crate::tx::Tx;

/// Confirmation status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Not yet included in a block.
    Pending,
    /// Included and executed successfully.
    Success,
    /// Included but reverted or rejected on execution.
    Failure,
}

/// On-chain state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Height of the including block, zero while pending.
    pub block_height: u64,
    /// Blocks on top of the including block.
    pub confirmations: u64,
    /// Execution status.
    pub status: TxStatus,
    /// Fees actually charged, sorted by denomination.
    pub fee: Vec<FeeEntry>,
    /// Sending address.
    pub from: Address,
    /// Receiving address.
    pub to: Address,
    /// Transferred amount in smallest units.
    pub amount: Amount,
}

impl TxInfo {
    /// Returns `true` once the transaction is included, successfully or not.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        !matches!(self.status, TxStatus::Pending)
    }
}

/// Network client for one asset.
#[async_trait]
pub trait Client: Send + Sync {
    /// Fetches the input for a transfer from `from` to `to`.
    ///
    /// The returned input is tagged for the client's chain driver.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on network failures.
    async fn fetch_tx_input(&self, from: &Address, to: &Address) -> Result<TxInput, ClientError>;

    /// Submits a fully signed transaction.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotSigned`] for an unsigned or partially signed transaction
    /// - [`ClientError::Rejected`] if the node refuses it
    /// - [`ClientError::Transport`] on network failures
    async fn submit_tx(&self, tx: &Tx) -> Result<(), ClientError>;

    /// Fetches the status of a submitted transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on network failures.
    async fn fetch_tx_info(&self, tx_hash: &TxHash) -> Result<TxInfo, ClientError>;

    /// Fetches the base coin balance of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on network failures.
    async fn fetch_native_balance(&self, address: &Address) -> Result<Amount, ClientError>;

    /// Fetches the balance of the client's asset held by `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on network failures.
    async fn fetch_balance(&self, address: &Address) -> Result<Amount, ClientError>;
}
