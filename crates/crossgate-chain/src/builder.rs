//! The transaction builder contract and transfer dispatch.
//!
//! Every chain driver implements [`TxBuilder`]. Callers only use
//! [`TxBuilder::new_transfer`], which resolves the asset descriptor into one
//! of three construction paths:
//!
//! | Descriptor | Path |
//! |------------|------|
//! | `Task` | [`TxBuilder::new_task_transfer`] |
//! | `Native` | [`TxBuilder::new_native_transfer`] |
//! | `Token` | [`TxBuilder::new_token_transfer`] |
//! | unrecognized, with contract | [`TxBuilder::new_token_transfer`] (warned) |
//! | unrecognized, no contract | [`TxBuilder::new_native_transfer`] (warned) |
//!
//! Builders hold no per-call state and may be shared across tasks.

use crossgate_core::asset::{AssetDescriptor, TaskAsset};
use crossgate_core::error::BuildError;
use crossgate_core::{Address, Amount, Driver};

use crate::input::TxInput;
use crate::tx::Tx;

/// Construction path selected for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRoute<'a> {
    /// Transfer of the chain's base coin.
    Native,
    /// Transfer of a contract or mint token.
    Token,
    /// Contract call.
    Task(&'a TaskAsset),
}

/// Resolves the construction path for an asset.
///
/// Unrecognized descriptors fall back on contract presence and log a warning.
#[must_use]
pub fn route(asset: &AssetDescriptor) -> TransferRoute<'_> {
    match asset {
        AssetDescriptor::Task(task) => TransferRoute::Task(task),
        AssetDescriptor::Native(_) => TransferRoute::Native,
        AssetDescriptor::Token(_) => TransferRoute::Token,
        AssetDescriptor::Unrecognized(unknown) => {
            let fallback = if unknown.contract.is_empty() {
                TransferRoute::Native
            } else {
                TransferRoute::Token
            };
            tracing::warn!(
                chain = %unknown.chain.chain,
                asset_type = %unknown.kind,
                contract = %unknown.contract,
                route = ?fallback,
                "unrecognized asset type, routing by contract presence"
            );
            fallback
        }
    }
}

/// Returns the asset's contract.
///
/// # Errors
///
/// Returns [`BuildError::MissingContract`] when the asset has none.
pub fn token_contract(asset: &AssetDescriptor) -> Result<&str, BuildError> {
    asset
        .contract()
        .ok_or_else(|| BuildError::missing_contract(asset.id()))
}

/// Builds unsigned transactions for one asset.
pub trait TxBuilder: Send + Sync {
    /// Returns the driver of the builder's chain.
    fn driver(&self) -> Driver;

    /// Returns the asset the builder transfers.
    fn asset(&self) -> &AssetDescriptor;

    /// Builds a transfer of the chain's base coin to `to`.
    ///
    /// # Errors
    ///
    /// Fails on malformed addresses, a mismatched input or arithmetic overflow.
    fn new_native_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError>;

    /// Builds a token transfer to `to`.
    ///
    /// # Errors
    ///
    /// Fails on malformed addresses, a missing contract, insufficient source
    /// accounts or a mismatched input.
    fn new_token_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError>;

    /// Builds a contract call described by `task`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] on chains without contract calls.
    fn new_task_transfer(
        &self,
        task: &TaskAsset,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let _ = (from, to, amount, input);
        Err(BuildError::unsupported(format!(
            "task '{}' on {} chains",
            task.id,
            self.driver()
        )))
    }

    /// Builds a transfer along the path selected by [`route`].
    ///
    /// # Errors
    ///
    /// Propagates the error of the selected path unchanged.
    fn new_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        match route(self.asset()) {
            TransferRoute::Task(task) => self.new_task_transfer(task, from, to, amount, input),
            TransferRoute::Native => self.new_native_transfer(from, to, amount, input),
            TransferRoute::Token => self.new_token_transfer(from, to, amount, input),
        }
    }
}
