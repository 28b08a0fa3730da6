use serde::{Deserialize, Serialize};

use crossgate_core::{DecimalRatio, PublicKey};

/// Cosmos SDK account and fee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosTxInput {
    /// Account number of the sender.
    pub account_number: u64,
    /// Account sequence of the sender.
    pub sequence: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Price per gas unit in the gas denomination.
    pub gas_price: DecimalRatio,
    /// Chain id; empty uses the descriptor's.
    pub chain_id: String,
    /// Compressed public key of the sender.
    pub from_public_key: PublicKey,
    /// Memo attached to the body.
    pub memo: String,
    /// Timeout height; zero disables it.
    pub timeout_height: u64,
}
