//! EVM transactions.

use alloy_consensus::transaction::RlpEcdsaEncodableTx;
use alloy_consensus::{SignableTransaction, TxEip1559, TxLegacy};
use alloy_primitives::{keccak256, Signature, B256, U256};

use crossgate_core::error::TxError;
use crossgate_core::{Amount, Driver, FeeEntry, TxDataToSign, TxHash, TxSignature};

use crate::tx::{check_signature_count, ChainTx, TxState};

/// EIP-2718 type byte of fee-market transactions.
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// The transaction body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmTxKind {
    /// EIP-1559 fee-market transaction.
    Eip1559(TxEip1559),
    /// Legacy transaction with EIP-155 replay protection.
    Legacy(TxLegacy),
}

/// An EVM transaction with a single signature slot.
#[derive(Debug, Clone)]
pub struct EvmTx {
    kind: EvmTxKind,
    fee_denom: String,
    signature: Option<Signature>,
}

impl EvmTx {
    /// Wraps an unsigned fee-market transaction whose fee is paid in `fee_denom`.
    #[must_use]
    pub fn eip1559(tx: TxEip1559, fee_denom: impl Into<String>) -> Self {
        Self {
            kind: EvmTxKind::Eip1559(tx),
            fee_denom: fee_denom.into(),
            signature: None,
        }
    }

    /// Wraps an unsigned legacy transaction whose fee is paid in `fee_denom`.
    #[must_use]
    pub fn legacy(tx: TxLegacy, fee_denom: impl Into<String>) -> Self {
        Self {
            kind: EvmTxKind::Legacy(tx),
            fee_denom: fee_denom.into(),
            signature: None,
        }
    }

    /// Returns the driver matching the transaction type.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        match self.kind {
            EvmTxKind::Eip1559(_) => Driver::Evm,
            EvmTxKind::Legacy(_) => Driver::EvmLegacy,
        }
    }

    /// Returns the transaction body.
    #[must_use]
    pub const fn kind(&self) -> &EvmTxKind {
        &self.kind
    }

    /// Returns the attached signature, if any.
    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Returns the signing hash.
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        match &self.kind {
            EvmTxKind::Eip1559(tx) => tx.signature_hash(),
            EvmTxKind::Legacy(tx) => tx.signature_hash(),
        }
    }

    /// Returns the highest fee the transaction can be charged, in wei.
    #[must_use]
    pub fn max_fee(&self) -> Amount {
        let (gas_limit, price) = match &self.kind {
            EvmTxKind::Eip1559(tx) => (tx.gas_limit, tx.max_fee_per_gas),
            EvmTxKind::Legacy(tx) => (tx.gas_limit, tx.gas_price),
        };
        Amount::from_u256(U256::from(gas_limit).saturating_mul(U256::from(price)))
    }

    fn encode_signed(&self, signature: &Signature) -> Vec<u8> {
        match &self.kind {
            EvmTxKind::Eip1559(tx) => {
                let mut buf = vec![EIP1559_TX_TYPE];
                tx.rlp_encode_signed(signature, &mut buf);
                buf
            }
            EvmTxKind::Legacy(tx) => {
                let mut buf = Vec::new();
                tx.rlp_encode_signed(signature, &mut buf);
                buf
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn placeholder() -> Self {
        Self::eip1559(TxEip1559::default(), "ETH")
    }
}

/// Decodes a 65-byte `r || s || v` signature.
///
/// `v` may be a parity bit (0, 1) or an Ethereum recovery value (27, 28).
///
/// # Errors
///
/// Returns [`TxError::InvalidSignature`] for other lengths or `v` values.
pub fn decode_signature(signature: &TxSignature) -> Result<Signature, TxError> {
    let bytes: &[u8; SIGNATURE_LEN] = signature.as_bytes().try_into().map_err(|_| {
        TxError::invalid_signature(format!(
            "expected {SIGNATURE_LEN}-byte signature, got {}",
            signature.len()
        ))
    })?;

    let r = U256::from_be_slice(&bytes[..32]);
    let s = U256::from_be_slice(&bytes[32..64]);
    let y_parity = match bytes[64] {
        0 | 27 => false,
        1 | 28 => true,
        v => {
            return Err(TxError::invalid_signature(format!(
                "invalid recovery value {v}"
            )))
        }
    };
    Ok(Signature::new(r, s, y_parity))
}

impl ChainTx for EvmTx {
    fn state(&self) -> TxState {
        TxState::from_slots(usize::from(self.signature.is_some()), 1)
    }

    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError> {
        Ok(vec![TxDataToSign::new(self.signing_hash().to_vec())])
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError> {
        check_signature_count(1, signatures.len())?;
        let signature = decode_signature(&signatures[0])?;
        self.signature = Some(signature);
        Ok(())
    }

    fn hash(&self) -> Result<TxHash, TxError> {
        let raw = self.serialize()?;
        Ok(TxHash::new(format!("0x{}", hex::encode(keccak256(&raw)))))
    }

    fn serialize(&self) -> Result<Vec<u8>, TxError> {
        let signature = self.signature.as_ref().ok_or(TxError::NotSigned)?;
        Ok(self.encode_signed(signature))
    }

    fn fees(&self) -> Vec<FeeEntry> {
        vec![FeeEntry::new(self.fee_denom.clone(), self.max_fee())]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use alloy_primitives::{Address, Bytes, TxKind};

    use super::*;

    fn fee_market_tx() -> EvmTx {
        EvmTx::eip1559(
            TxEip1559 {
                chain_id: 1,
                nonce: 9,
                gas_limit: 21_000,
                max_fee_per_gas: 30_000_000_000,
                max_priority_fee_per_gas: 2_000_000_000,
                to: TxKind::Call(Address::repeat_byte(0x35)),
                value: U256::from(1_000_000_000_000_000_000u128),
                access_list: Default::default(),
                input: Bytes::new(),
            },
            "ETH",
        )
    }

    fn legacy_tx() -> EvmTx {
        EvmTx::legacy(
            TxLegacy {
                chain_id: Some(56),
                nonce: 0,
                gas_price: 5_000_000_000,
                gas_limit: 21_000,
                to: TxKind::Call(Address::repeat_byte(0x35)),
                value: U256::from(1u64),
                input: Bytes::new(),
            },
            "BNB",
        )
    }

    fn signature(v: u8) -> TxSignature {
        let mut bytes = vec![0x11u8; 32];
        bytes.extend_from_slice(&[0x22u8; 32]);
        bytes.push(v);
        TxSignature::new(bytes)
    }

    #[test]
    fn test_sighashes_are_idempotent() {
        let tx = fee_market_tx();
        let first = tx.sighashes().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].payload().len(), 32);
        assert_eq!(first, tx.sighashes().unwrap());
    }

    #[test]
    fn test_unsigned_tx_cannot_be_serialized() {
        let tx = fee_market_tx();
        assert_eq!(tx.state(), TxState::Unsigned);
        assert_eq!(tx.serialize().unwrap_err(), TxError::NotSigned);
        assert_eq!(tx.hash().unwrap_err(), TxError::NotSigned);
    }

    #[test]
    fn test_signature_count_mismatch() {
        let mut tx = fee_market_tx();
        let err = tx.add_signatures(&[signature(0), signature(1)]).unwrap_err();
        assert_eq!(err, TxError::SignatureCount { expected: 1, actual: 2 });
        assert!(tx.add_signatures(&[]).is_err());
        assert_eq!(tx.state(), TxState::Unsigned);
    }

    #[test]
    fn test_signed_fee_market_encoding() {
        let mut tx = fee_market_tx();
        tx.add_signatures(&[signature(27)]).unwrap();
        assert_eq!(tx.state(), TxState::Signed);

        let raw = tx.serialize().unwrap();
        assert_eq!(raw[0], EIP1559_TX_TYPE);

        let hash = tx.hash().unwrap();
        assert_eq!(hash, tx.hash().unwrap());
        assert_eq!(hash.as_str().len(), 66);
        assert_eq!(
            hash.as_str(),
            format!("0x{}", hex::encode(keccak256(&raw)))
        );
    }

    #[test]
    fn test_add_signatures_overwrites() {
        let mut tx = fee_market_tx();
        tx.add_signatures(&[signature(0)]).unwrap();
        let first = tx.serialize().unwrap();
        tx.add_signatures(&[signature(1)]).unwrap();
        assert_ne!(first, tx.serialize().unwrap());
        assert!(tx.signature().unwrap().v());
    }

    #[test]
    fn test_legacy_encoding_is_untyped_list() {
        let mut tx = legacy_tx();
        assert_eq!(tx.driver(), Driver::EvmLegacy);
        tx.add_signatures(&[signature(1)]).unwrap();
        let raw = tx.serialize().unwrap();
        assert!(raw[0] >= 0xc0);
    }

    #[test]
    fn test_rejects_malformed_signatures() {
        let mut tx = fee_market_tx();
        assert!(matches!(
            tx.add_signatures(&[TxSignature::new(vec![0u8; 64])]),
            Err(TxError::InvalidSignature { .. })
        ));
        assert!(matches!(
            tx.add_signatures(&[signature(2)]),
            Err(TxError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_fees_report_max_fee() {
        assert_eq!(
            fee_market_tx().fees(),
            vec![FeeEntry::new("ETH", Amount::from_u64(21_000 * 30_000_000_000))]
        );
        assert_eq!(
            legacy_tx().fees(),
            vec![FeeEntry::new("BNB", Amount::from_u64(21_000 * 5_000_000_000))]
        );
    }
}
