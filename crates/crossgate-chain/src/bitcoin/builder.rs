//! Bitcoin transaction builder.
//!
//! Outputs are spent in the order supplied, each one in full. The fee is
//! `fee_rate * estimate_vsize(inputs, 2)`; change below [`DUST_LIMIT`] is left
//! to the fee instead of creating an output.

use std::str::FromStr;
use std::sync::Arc;

use ::bitcoin::absolute::LockTime;
use ::bitcoin::transaction::Version;
use ::bitcoin::{Amount as Sats, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::{BuildError, SelectError};
use crossgate_core::selector::select;
use crossgate_core::{Address, Amount, Driver, SourceAccount};

use super::input::Utxo;
use super::tx::BitcoinTx;
use super::{network, p2wpkh_address, parse_address, parse_public_key};
use crate::builder::TxBuilder;
use crate::input::TxInput;
use crate::tx::Tx;

/// Smallest output value relayed by default policy, in satoshis.
pub const DUST_LIMIT: u64 = 546;

const OVERHEAD_VBYTES: u64 = 11;
const INPUT_VBYTES: u64 = 68;
const OUTPUT_VBYTES: u64 = 31;

/// Estimates the virtual size of a P2WPKH transaction.
#[must_use]
pub const fn estimate_vsize(inputs: u64, outputs: u64) -> u64 {
    OVERHEAD_VBYTES + INPUT_VBYTES * inputs + OUTPUT_VBYTES * outputs
}

/// Builder for Bitcoin.
#[derive(Debug, Clone)]
pub struct BitcoinBuilder {
    asset: Arc<AssetDescriptor>,
}

impl BitcoinBuilder {
    /// Creates a builder.
    #[must_use]
    pub const fn new(asset: Arc<AssetDescriptor>) -> Self {
        Self { asset }
    }

    fn fee_denom(&self) -> String {
        let denom = self.asset.gas_denom();
        if denom.is_empty() {
            self.asset.chain().chain.clone()
        } else {
            denom.to_string()
        }
    }
}

fn sats(field: &str, amount: &Amount) -> Result<u64, BuildError> {
    amount
        .to_u64()
        .ok_or_else(|| BuildError::invalid_input(field, format!("{amount} exceeds 64 bits")))
}

/// Picks outputs covering `amount` plus the fee their own count implies.
///
/// Returns the chosen outputs and the fee.
fn select_utxos<'a>(
    utxos: &'a [Utxo],
    amount: u64,
    fee_rate: u64,
) -> Result<(Vec<&'a Utxo>, u64), BuildError> {
    let sources: Vec<SourceAccount<usize>> = utxos
        .iter()
        .enumerate()
        .map(|(index, utxo)| SourceAccount::new(index, utxo.value))
        .collect();

    let mut inputs = 1u64;
    loop {
        let fee = fee_rate
            .checked_mul(estimate_vsize(inputs, 2))
            .ok_or_else(|| BuildError::invalid_input("fee_rate", "fee exceeds 64 bits"))?;
        let target = amount
            .checked_add(fee)
            .ok_or_else(|| BuildError::invalid_input("amount", "amount plus fee exceeds 64 bits"))?;
        let selected = select(&sources, &Amount::from_u64(target))?;
        let count = u64::try_from(selected.len()).unwrap_or(u64::MAX);
        if count <= inputs {
            let chosen = selected.iter().filter_map(|part| utxos.get(part.account)).collect();
            return Ok((chosen, fee));
        }
        inputs = count;
    }
}

impl TxBuilder for BitcoinBuilder {
    fn driver(&self) -> Driver {
        Driver::Bitcoin
    }

    fn asset(&self) -> &AssetDescriptor {
        &self.asset
    }

    fn new_native_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let fee_rate = sats("fee_rate", input.gas_price())?;
        let payload = input.as_bitcoin()?;
        let network = network(self.asset.chain())?;

        let sender = parse_address(from.as_str(), network)?;
        let recipient = parse_address(to.as_str(), network)?;
        let public_key = parse_public_key(payload.from_public_key.as_bytes())?;
        if p2wpkh_address(&public_key, network) != sender {
            return Err(BuildError::invalid_input(
                "from_public_key",
                format!("key does not control {from}"),
            ));
        }

        let value = sats("amount", amount)?;
        if value < DUST_LIMIT {
            return Err(BuildError::invalid_input(
                "amount",
                format!("{value} sat is below the dust limit of {DUST_LIMIT}"),
            ));
        }

        let (chosen, estimated_fee) = match select_utxos(&payload.utxos, value, fee_rate) {
            Ok(selection) => selection,
            Err(BuildError::Select(SelectError::Insufficient { .. })) if payload.utxos.is_empty() => {
                return Err(BuildError::invalid_input("utxos", "no spendable outputs"));
            }
            Err(err) => return Err(err),
        };

        let mut prevouts = Vec::with_capacity(chosen.len());
        let mut input_total = 0u64;
        let mut tx_inputs = Vec::with_capacity(chosen.len());
        for utxo in &chosen {
            let txid = Txid::from_str(&utxo.txid)
                .map_err(|e| BuildError::invalid_input("utxos.txid", e.to_string()))?;
            let utxo_value = sats("utxos.value", &utxo.value)?;
            input_total = input_total
                .checked_add(utxo_value)
                .ok_or_else(|| BuildError::invalid_input("utxos", "total exceeds 64 bits"))?;
            prevouts.push(Sats::from_sat(utxo_value));
            tx_inputs.push(TxIn {
                previous_output: OutPoint::new(txid, utxo.vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::new(),
            });
        }

        let mut outputs = vec![TxOut {
            value: Sats::from_sat(value),
            script_pubkey: recipient.script_pubkey(),
        }];
        let change = input_total.saturating_sub(value).saturating_sub(estimated_fee);
        if change >= DUST_LIMIT {
            outputs.push(TxOut {
                value: Sats::from_sat(change),
                script_pubkey: sender.script_pubkey(),
            });
        }
        let output_total = value + if change >= DUST_LIMIT { change } else { 0 };
        let fee = input_total.saturating_sub(output_total);

        tracing::debug!(
            inputs = tx_inputs.len(),
            outputs = outputs.len(),
            fee,
            fee_rate,
            change,
            "built bitcoin transaction"
        );

        let tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: tx_inputs,
            output: outputs,
        };
        Ok(Tx::Bitcoin(BitcoinTx::new(
            tx,
            prevouts,
            public_key,
            self.fee_denom(),
            Amount::from_u64(fee),
        )))
    }

    fn new_token_transfer(
        &self,
        _from: &Address,
        _to: &Address,
        _amount: &Amount,
        _input: &TxInput,
    ) -> Result<Tx, BuildError> {
        Err(BuildError::unsupported("token transfers on bitcoin chains"))
    }
}
