//! The end-to-end transfer pipeline.
//!
//! [`execute`] walks one transfer through every stage, each inside its own
//! `tracing` span nested under a `transfer` span:
//!
//! | Stage | Component | Failure |
//! |-------|-----------|---------|
//! | `fetch_tx_input` | [`Client`] | [`CrossgateError::Client`] |
//! | `new_transfer` | [`TxBuilder`] | [`CrossgateError::Build`] |
//! | `sighashes` | [`Tx`] | [`CrossgateError::Tx`] |
//! | `sign` | [`Signer`] | [`CrossgateError::Sign`] |
//! | `add_signatures` | [`Tx`] | [`CrossgateError::Tx`] |
//! | `submit_tx` | [`Client`] | [`CrossgateError::Client`] |
//!
//! Errors are returned unchanged from the failing stage; nothing is retried
//! here. [`CrossgateError::is_retryable`] tells the caller whether running
//! the transfer again may help.

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crossgate_chain::{ChainTx, Client, Tx, TxBuilder, TxInfo};
use crossgate_core::error::CrossgateError;
use crossgate_core::{Address, Amount, TxHash, TxSignature};
use crossgate_crypto::{SecretKey, Signer};

/// A transfer of `amount` smallest units from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Sending address, controlled by the signing key.
    pub from: Address,
    /// Receiving address.
    pub to: Address,
    /// Amount in the asset's smallest units.
    pub amount: Amount,
}

impl TransferRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(from: Address, to: Address, amount: Amount) -> Self {
        Self { from, to, amount }
    }
}

/// Signs every digest of `tx` with `key` and attaches the signatures.
///
/// # Errors
///
/// Fails if the digests cannot be computed, signing fails or the transaction
/// rejects the signatures.
pub fn sign_tx(tx: &mut Tx, signer: &dyn Signer, key: &SecretKey) -> Result<(), CrossgateError> {
    let digests = tracing::debug_span!("sighashes").in_scope(|| tx.sighashes())?;
    let signatures = tracing::debug_span!("sign", count = digests.len()).in_scope(|| {
        digests
            .iter()
            .map(|digest| signer.sign(key, digest))
            .collect::<Result<Vec<TxSignature>, _>>()
    })?;
    tracing::debug_span!("add_signatures").in_scope(|| tx.add_signatures(&signatures))?;
    Ok(())
}

/// Builds, signs and submits a transfer, returning its hash.
///
/// `builder` and `client` must serve the same asset, and `signer` must match
/// the chain's curve.
///
/// # Errors
///
/// Returns the error of the first failing stage.
pub async fn execute(
    client: &dyn Client,
    builder: &dyn TxBuilder,
    signer: &dyn Signer,
    key: &SecretKey,
    request: &TransferRequest,
) -> Result<TxHash, CrossgateError> {
    let span = tracing::info_span!(
        "transfer",
        asset = %builder.asset().id(),
        from = %request.from,
        to = %request.to,
        amount = %request.amount,
    );

    async move {
        let input = client
            .fetch_tx_input(&request.from, &request.to)
            .instrument(tracing::debug_span!("fetch_tx_input"))
            .await?;

        let mut tx = tracing::debug_span!("new_transfer").in_scope(|| {
            builder.new_transfer(&request.from, &request.to, &request.amount, &input)
        })?;

        sign_tx(&mut tx, signer, key)?;
        let hash = tx.hash()?;

        client
            .submit_tx(&tx)
            .instrument(tracing::debug_span!("submit_tx", tx_hash = %hash))
            .await?;

        tracing::info!(tx_hash = %hash, fees = ?tx.fees(), "transfer submitted");
        Ok(hash)
    }
    .instrument(span)
    .await
}

/// Fetches the on-chain state of a submitted transfer.
///
/// # Errors
///
/// Returns [`CrossgateError::Client`] if the lookup fails.
pub async fn confirm(client: &dyn Client, tx_hash: &TxHash) -> Result<TxInfo, CrossgateError> {
    let info = client
        .fetch_tx_info(tx_hash)
        .instrument(tracing::debug_span!("fetch_tx_info", %tx_hash))
        .await?;
    tracing::debug!(%tx_hash, status = ?info.status, confirmations = info.confirmations, "fetched tx info");
    Ok(info)
}
