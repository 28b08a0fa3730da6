//! Legacy gas price transactions for chains without a fee market.
//!
//! The gas price comes from the input envelope and is used as fetched; no
//! ceiling applies.

use alloy_consensus::TxLegacy;
use alloy_primitives::TxKind;

use crossgate_core::error::BuildError;
use crossgate_core::Amount;

use super::builder::{wei_per_gas, EvmCall};
use super::input::EvmTxInput;

/// Assembles an EIP-155 legacy transaction.
pub(crate) fn build_legacy(
    call: EvmCall,
    input: &EvmTxInput,
    chain_id: u64,
    gas_price: &Amount,
) -> Result<TxLegacy, BuildError> {
    Ok(TxLegacy {
        chain_id: Some(chain_id),
        nonce: input.nonce,
        gas_price: wei_per_gas("gas_price", gas_price)?,
        gas_limit: input.gas_limit,
        to: TxKind::Call(call.to),
        value: call.value,
        input: call.input,
    })
}
