//! Cosmos SDK transactions.

use prost::Message;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crossgate_core::error::TxError;
use crossgate_core::{FeeEntry, TxDataToSign, TxHash, TxSignature};

use super::proto::{SignDoc, TxRaw};
use crate::tx::{check_signature_count, ChainTx, TxState};

/// Length of a compact `r || s` signature.
pub const SIGNATURE_LEN: usize = 64;

/// Digest applied to the sign doc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignDigest {
    /// Standard Cosmos keys.
    Sha256,
    /// Ethereum-style keys.
    Keccak256,
}

/// A `SIGN_MODE_DIRECT` transaction with a single signer.
#[derive(Debug, Clone)]
pub struct CosmosTx {
    sign_doc: SignDoc,
    digest: SignDigest,
    fees: Vec<FeeEntry>,
    signature: Option<Vec<u8>>,
}

impl CosmosTx {
    /// Wraps an encoded body and auth info.
    #[must_use]
    pub const fn new(sign_doc: SignDoc, digest: SignDigest, fees: Vec<FeeEntry>) -> Self {
        Self {
            sign_doc,
            digest,
            fees,
            signature: None,
        }
    }

    /// Returns the sign doc.
    #[must_use]
    pub const fn sign_doc(&self) -> &SignDoc {
        &self.sign_doc
    }

    /// Returns the digest of the encoded sign doc.
    #[must_use]
    pub fn signing_digest(&self) -> [u8; 32] {
        let bytes = self.sign_doc.encode_to_vec();
        match self.digest {
            SignDigest::Sha256 => Sha256::digest(&bytes).into(),
            SignDigest::Keccak256 => Keccak256::digest(&bytes).into(),
        }
    }
}

impl ChainTx for CosmosTx {
    fn state(&self) -> TxState {
        TxState::from_slots(usize::from(self.signature.is_some()), 1)
    }

    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError> {
        Ok(vec![TxDataToSign::new(self.signing_digest().to_vec())])
    }

    /// Accepts 64-byte compact signatures; a trailing recovery byte is dropped.
    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError> {
        check_signature_count(1, signatures.len())?;
        let bytes = signatures[0].as_bytes();
        let compact = match bytes.len() {
            SIGNATURE_LEN => bytes,
            65 => &bytes[..SIGNATURE_LEN],
            other => {
                return Err(TxError::invalid_signature(format!(
                    "expected {SIGNATURE_LEN}-byte signature, got {other}"
                )))
            }
        };
        self.signature = Some(compact.to_vec());
        Ok(())
    }

    fn hash(&self) -> Result<TxHash, TxError> {
        let raw = self.serialize()?;
        Ok(TxHash::new(hex::encode_upper(Sha256::digest(&raw))))
    }

    fn serialize(&self) -> Result<Vec<u8>, TxError> {
        let signature = self.signature.as_ref().ok_or(TxError::NotSigned)?;
        let raw = TxRaw {
            body_bytes: self.sign_doc.body_bytes.clone(),
            auth_info_bytes: self.sign_doc.auth_info_bytes.clone(),
            signatures: vec![signature.clone()],
        };
        Ok(raw.encode_to_vec())
    }

    fn fees(&self) -> Vec<FeeEntry> {
        self.fees.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use crossgate_core::Amount;

    use super::*;

    fn tx(digest: SignDigest) -> CosmosTx {
        CosmosTx::new(
            SignDoc {
                body_bytes: vec![1, 2, 3],
                auth_info_bytes: vec![4, 5],
                chain_id: "dimension_37-1".to_string(),
                account_number: 12,
            },
            digest,
            vec![FeeEntry::new("axpla", Amount::from_u64(10))],
        )
    }

    #[test]
    fn test_digest_follows_key_style() {
        let doc = tx(SignDigest::Sha256).sign_doc().encode_to_vec();
        let sha = tx(SignDigest::Sha256).sighashes().unwrap();
        let keccak = tx(SignDigest::Keccak256).sighashes().unwrap();
        assert_eq!(sha[0].payload(), Sha256::digest(&doc).as_slice());
        assert_eq!(keccak[0].payload(), Keccak256::digest(&doc).as_slice());
    }

    #[test]
    fn test_recoverable_signature_is_truncated() {
        let mut tx = tx(SignDigest::Sha256);
        let mut signature = vec![0x42u8; 64];
        signature.push(1);
        tx.add_signatures(&[TxSignature::new(signature)]).unwrap();
        assert_eq!(tx.state(), TxState::Signed);

        let raw = TxRaw::decode(tx.serialize().unwrap().as_slice()).unwrap();
        assert_eq!(raw.signatures, vec![vec![0x42u8; 64]]);
        assert_eq!(raw.body_bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_hash_is_uppercase_sha256() {
        let mut tx = tx(SignDigest::Sha256);
        assert_eq!(tx.hash().unwrap_err(), TxError::NotSigned);
        tx.add_signatures(&[TxSignature::new(vec![7u8; 64])]).unwrap();
        let hash = tx.hash().unwrap();
        assert_eq!(hash.as_str().len(), 64);
        assert_eq!(hash.as_str(), hash.as_str().to_uppercase());
        assert_eq!(hash, tx.hash().unwrap());
    }

    #[test]
    fn test_sighashes_and_hash_are_stable_across_signing() {
        let mut tx = tx(SignDigest::Keccak256);
        let before = tx.sighashes().unwrap();
        assert_eq!(before, tx.sighashes().unwrap());

        tx.add_signatures(&[TxSignature::new(vec![7u8; 64])]).unwrap();
        assert_eq!(before, tx.sighashes().unwrap());
        assert_eq!(tx.hash().unwrap(), tx.hash().unwrap());
    }

    #[test]
    fn test_rejects_bad_signatures() {
        let mut tx = tx(SignDigest::Sha256);
        assert!(matches!(
            tx.add_signatures(&[TxSignature::new(vec![0u8; 70])]),
            Err(TxError::InvalidSignature { .. })
        ));
        assert_eq!(
            tx.add_signatures(&[]).unwrap_err(),
            TxError::SignatureCount { expected: 1, actual: 0 }
        );
    }

    #[test]
    fn test_fees_are_reported() {
        assert_eq!(
            tx(SignDigest::Sha256).fees(),
            vec![FeeEntry::new("axpla", Amount::from_u64(10))]
        );
    }
}
