//! Solana transactions.
//!
//! A transaction has one signature slot per required signer, in account key
//! order. Every slot signs the same serialized message. Fee-payer schemes
//! fill slots from different parties through
//! [`ChainTx::add_signer_signatures`].

use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crossgate_core::error::TxError;
use crossgate_core::{Address, TxDataToSign, TxHash, TxSignature};

use crate::tx::{check_signature_count, ChainTx, TxState};

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// A Solana transaction and its filled signature slots.
#[derive(Debug, Clone)]
pub struct SolanaTx {
    transaction: Transaction,
    filled: Vec<bool>,
}

impl SolanaTx {
    /// Wraps an unsigned message.
    #[must_use]
    pub fn new(message: Message) -> Self {
        let transaction = Transaction::new_unsigned(message);
        let filled = vec![false; transaction.signatures.len()];
        Self { transaction, filled }
    }

    /// Returns the message.
    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.transaction.message
    }

    /// Returns the underlying transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the required signers in slot order.
    #[must_use]
    pub fn signers(&self) -> &[Pubkey] {
        let required = usize::from(self.transaction.message.header.num_required_signatures);
        let keys = &self.transaction.message.account_keys;
        &keys[..required.min(keys.len())]
    }

    fn slot_of(&self, signer: &Address) -> Result<usize, TxError> {
        self.signers()
            .iter()
            .position(|key| key.to_string() == signer.as_str())
            .ok_or_else(|| TxError::UnknownSigner {
                signer: signer.to_string(),
            })
    }
}

fn decode_signature(signature: &TxSignature) -> Result<Signature, TxError> {
    let bytes = <[u8; SIGNATURE_LEN]>::try_from(signature.as_bytes()).map_err(|_| {
        TxError::invalid_signature(format!(
            "expected {SIGNATURE_LEN}-byte signature, got {}",
            signature.len()
        ))
    })?;
    Ok(Signature::from(bytes))
}

impl ChainTx for SolanaTx {
    fn state(&self) -> TxState {
        let filled = self.filled.iter().filter(|slot| **slot).count();
        TxState::from_slots(filled, self.filled.len())
    }

    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError> {
        let message = self.transaction.message_data();
        Ok(self
            .signers()
            .iter()
            .map(|signer| TxDataToSign::for_signer(message.clone(), Address::new(signer.to_string())))
            .collect())
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError> {
        check_signature_count(self.filled.len(), signatures.len())?;
        let decoded = signatures
            .iter()
            .map(decode_signature)
            .collect::<Result<Vec<_>, _>>()?;
        self.transaction.signatures = decoded;
        self.filled.iter_mut().for_each(|slot| *slot = true);
        Ok(())
    }

    fn add_signer_signatures(
        &mut self,
        signatures: &[(Address, TxSignature)],
    ) -> Result<(), TxError> {
        let resolved = signatures
            .iter()
            .map(|(signer, signature)| Ok((self.slot_of(signer)?, decode_signature(signature)?)))
            .collect::<Result<Vec<_>, TxError>>()?;
        for (slot, signature) in resolved {
            self.transaction.signatures[slot] = signature;
            self.filled[slot] = true;
        }
        Ok(())
    }

    fn hash(&self) -> Result<TxHash, TxError> {
        if self.state() != TxState::Signed {
            return Err(TxError::NotSigned);
        }
        self.transaction
            .signatures
            .first()
            .map(|signature| TxHash::new(signature.to_string()))
            .ok_or(TxError::NotSigned)
    }

    fn serialize(&self) -> Result<Vec<u8>, TxError> {
        if self.state() != TxState::Signed {
            return Err(TxError::NotSigned);
        }
        bincode::serialize(&self.transaction).map_err(|e| TxError::encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use solana_sdk::hash::Hash;

    use super::*;
    use crate::solana::instruction::system_transfer;

    fn tx_with_fee_payer() -> (SolanaTx, Pubkey, Pubkey) {
        let payer = Pubkey::new_unique();
        let sender = Pubkey::new_unique();
        let message = Message::new_with_blockhash(
            &[system_transfer(&sender, &Pubkey::new_unique(), 10)],
            Some(&payer),
            &Hash::new_from_array([3u8; 32]),
        );
        (SolanaTx::new(message), payer, sender)
    }

    fn sig(byte: u8) -> TxSignature {
        TxSignature::new(vec![byte; SIGNATURE_LEN])
    }

    #[test]
    fn test_one_slot_per_required_signer() {
        let (tx, payer, sender) = tx_with_fee_payer();
        assert_eq!(tx.signers(), &[payer, sender]);

        let sighashes = tx.sighashes().unwrap();
        assert_eq!(sighashes.len(), 2);
        assert_eq!(sighashes[0].payload(), sighashes[1].payload());
        assert_eq!(sighashes[0].signer().unwrap().as_str(), payer.to_string());
        assert_eq!(sighashes, tx.sighashes().unwrap());
    }

    #[test]
    fn test_signer_signatures_accumulate() {
        let (mut tx, payer, sender) = tx_with_fee_payer();
        tx.add_signer_signatures(&[(Address::new(sender.to_string()), sig(2))])
            .unwrap();
        assert_eq!(tx.state(), TxState::PartiallySigned);
        assert_eq!(tx.serialize().unwrap_err(), TxError::NotSigned);

        tx.add_signer_signatures(&[(Address::new(payer.to_string()), sig(1))])
            .unwrap();
        assert_eq!(tx.state(), TxState::Signed);
        assert_eq!(
            tx.hash().unwrap().as_str(),
            bs58::encode([1u8; SIGNATURE_LEN]).into_string()
        );
        assert_eq!(tx.transaction().signatures[1].as_ref(), &[2u8; SIGNATURE_LEN]);
    }

    #[test]
    fn test_unknown_signer_is_rejected_without_changes() {
        let (mut tx, payer, _) = tx_with_fee_payer();
        let err = tx
            .add_signer_signatures(&[
                (Address::new(payer.to_string()), sig(1)),
                (Address::new(Pubkey::new_unique().to_string()), sig(2)),
            ])
            .unwrap_err();
        assert!(matches!(err, TxError::UnknownSigner { .. }));
        assert_eq!(tx.state(), TxState::Unsigned);
    }

    #[test]
    fn test_positional_signatures_overwrite() {
        let (mut tx, _, _) = tx_with_fee_payer();
        assert_eq!(
            tx.add_signatures(&[sig(1)]).unwrap_err(),
            TxError::SignatureCount { expected: 2, actual: 1 }
        );
        tx.add_signatures(&[sig(1), sig(2)]).unwrap();
        let first = tx.hash().unwrap();
        tx.add_signatures(&[sig(5), sig(6)]).unwrap();
        assert_ne!(first, tx.hash().unwrap());
        assert_eq!(tx.hash().unwrap(), tx.hash().unwrap());

        let raw = tx.serialize().unwrap();
        let decoded: Transaction = bincode::deserialize(&raw).unwrap();
        assert_eq!(&decoded, tx.transaction());
    }

    #[test]
    fn test_sighashes_and_hash_are_stable_across_signing() {
        let (mut tx, _, _) = tx_with_fee_payer();
        let before = tx.sighashes().unwrap();
        assert_eq!(before, tx.sighashes().unwrap());

        tx.add_signatures(&[sig(1), sig(2)]).unwrap();
        assert_eq!(before, tx.sighashes().unwrap());
        assert_eq!(tx.hash().unwrap(), tx.hash().unwrap());
    }

    #[test]
    fn test_rejects_short_signature() {
        let (mut tx, _, _) = tx_with_fee_payer();
        assert!(matches!(
            tx.add_signatures(&[sig(1), TxSignature::new(vec![0u8; 65])]),
            Err(TxError::InvalidSignature { .. })
        ));
    }
}
