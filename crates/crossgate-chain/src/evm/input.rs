//! EVM transaction input.

use serde::{Deserialize, Serialize};

use crossgate_core::Amount;

/// Account and fee market data for an EVM transfer.
///
/// Shared by the fee-market and legacy drivers; legacy transactions take
/// their gas price from the input envelope instead of the cap fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvmTxInput {
    /// Next account nonce.
    pub nonce: u64,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Requested priority fee per gas, in wei.
    pub gas_tip_cap: Amount,
    /// Maximum total fee per gas, in wei.
    pub gas_fee_cap: Amount,
    /// Chain id reported by the node; zero defers to the asset's chain id.
    pub chain_id: u64,
}
