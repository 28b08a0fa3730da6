use serde::{Deserialize, Serialize};

use crossgate_core::{Amount, PublicKey};

/// An unspent output of the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Transaction id in display (reversed) hex.
    pub txid: String,
    /// Output index.
    pub vout: u32,
    /// Output value in satoshis.
    pub value: Amount,
}

/// Spendable outputs and the key that controls them.
///
/// The fee rate in sat/vbyte travels in the input envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitcoinTxInput {
    /// Candidate outputs in spending order.
    pub utxos: Vec<Utxo>,
    /// Compressed public key of the sender.
    pub from_public_key: PublicKey,
}
