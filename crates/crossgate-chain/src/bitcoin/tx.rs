//! Bitcoin transactions.

use ::bitcoin::consensus::encode::serialize;
use ::bitcoin::hashes::Hash;
use ::bitcoin::secp256k1::ecdsa::Signature;
use ::bitcoin::sighash::{EcdsaSighashType, SighashCache};
use ::bitcoin::{Amount as Sats, CompressedPublicKey, ScriptBuf, Transaction, Witness};

use crossgate_core::error::TxError;
use crossgate_core::{Amount, FeeEntry, TxDataToSign, TxHash, TxSignature};

use crate::tx::{check_signature_count, ChainTx, TxState};

/// A segwit v0 transaction spending outputs of one key.
#[derive(Debug, Clone)]
pub struct BitcoinTx {
    tx: Transaction,
    prevouts: Vec<Sats>,
    public_key: CompressedPublicKey,
    fee_denom: String,
    fee: Amount,
    signatures: Vec<Option<Signature>>,
}

impl BitcoinTx {
    /// Wraps an unsigned transaction.
    ///
    /// `prevouts` holds the value of each spent output in input order.
    #[must_use]
    pub fn new(
        tx: Transaction,
        prevouts: Vec<Sats>,
        public_key: CompressedPublicKey,
        fee_denom: impl Into<String>,
        fee: Amount,
    ) -> Self {
        let slots = tx.input.len();
        Self {
            tx,
            prevouts,
            public_key,
            fee_denom: fee_denom.into(),
            fee,
            signatures: vec![None; slots],
        }
    }

    /// Returns the unsigned transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.tx
    }

    fn script_pubkey(&self) -> ScriptBuf {
        ScriptBuf::new_p2wpkh(&self.public_key.wpubkey_hash())
    }

    fn signed(&self) -> Result<Transaction, TxError> {
        if self.state() != TxState::Signed {
            return Err(TxError::NotSigned);
        }
        let mut tx = self.tx.clone();
        for (input, signature) in tx.input.iter_mut().zip(&self.signatures) {
            let signature = signature.as_ref().ok_or(TxError::NotSigned)?;
            let signature = ::bitcoin::ecdsa::Signature {
                signature: *signature,
                sighash_type: EcdsaSighashType::All,
            };
            let mut witness = Witness::new();
            witness.push(signature.to_vec());
            witness.push(self.public_key.to_bytes());
            input.witness = witness;
        }
        Ok(tx)
    }
}

impl ChainTx for BitcoinTx {
    fn state(&self) -> TxState {
        let filled = self.signatures.iter().filter(|s| s.is_some()).count();
        TxState::from_slots(filled, self.signatures.len())
    }

    /// One digest per input, in input order.
    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError> {
        let script_pubkey = self.script_pubkey();
        let mut cache = SighashCache::new(&self.tx);
        self.prevouts
            .iter()
            .enumerate()
            .map(|(index, value)| {
                cache
                    .p2wpkh_signature_hash(index, &script_pubkey, *value, EcdsaSighashType::All)
                    .map(|hash| TxDataToSign::new(hash.to_byte_array().to_vec()))
                    .map_err(|e| TxError::encoding(format!("sighash of input {index}: {e}")))
            })
            .collect()
    }

    /// Accepts compact or recoverable signatures; the recovery byte is ignored.
    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError> {
        check_signature_count(self.signatures.len(), signatures.len())?;
        let parsed = signatures
            .iter()
            .map(|signature| {
                let bytes = signature.as_bytes();
                if bytes.len() != 64 && bytes.len() != 65 {
                    return Err(TxError::invalid_signature(format!(
                        "expected 64-byte signature, got {}",
                        bytes.len()
                    )));
                }
                let mut compact = Signature::from_compact(&bytes[..64])
                    .map_err(|e| TxError::invalid_signature(e.to_string()))?;
                compact.normalize_s();
                Ok(Some(compact))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.signatures = parsed;
        Ok(())
    }

    /// Returns the txid.
    fn hash(&self) -> Result<TxHash, TxError> {
        Ok(TxHash::new(self.signed()?.compute_txid().to_string()))
    }

    fn serialize(&self) -> Result<Vec<u8>, TxError> {
        Ok(serialize(&self.signed()?))
    }

    fn fees(&self) -> Vec<FeeEntry> {
        vec![FeeEntry::new(self.fee_denom.clone(), self.fee)]
    }
}
