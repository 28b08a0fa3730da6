//! The chain-independent transaction contract.
//!
//! A built transaction moves through three states:
//!
//! ```text
//! Unsigned ──add_signer_signatures──▶ PartiallySigned ──▶ Signed
//!     └──────────────add_signatures──────────────────────────┘
//! ```
//!
//! [`ChainTx::sighashes`] may be called any number of times in any state and
//! always returns the same digests. [`ChainTx::hash`] and
//! [`ChainTx::serialize`] require the [`TxState::Signed`] state.

use crossgate_core::error::TxError;
use crossgate_core::{Address, Driver, FeeEntry, TxDataToSign, TxHash, TxSignature};

use crate::bitcoin::BitcoinTx;
use crate::cosmos::CosmosTx;
use crate::evm::EvmTx;
use crate::solana::SolanaTx;

/// Signing progress of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxState {
    /// No signature slot is filled.
    Unsigned,
    /// Some, but not all, signature slots are filled.
    PartiallySigned,
    /// Every signature slot is filled; the transaction can be serialized.
    Signed,
}

impl TxState {
    /// Derives the state from filled and total slot counts.
    #[must_use]
    pub const fn from_slots(filled: usize, total: usize) -> Self {
        if filled == 0 {
            Self::Unsigned
        } else if filled < total {
            Self::PartiallySigned
        } else {
            Self::Signed
        }
    }
}

impl std::fmt::Display for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsigned => f.write_str("unsigned"),
            Self::PartiallySigned => f.write_str("partially signed"),
            Self::Signed => f.write_str("signed"),
        }
    }
}

/// Operations every chain transaction supports.
pub trait ChainTx {
    /// Returns the current signing state.
    fn state(&self) -> TxState;

    /// Returns the data to sign, one entry per signature slot.
    ///
    /// # Errors
    ///
    /// Returns [`TxError::Encoding`] if the signing payload cannot be computed.
    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError>;

    /// Attaches signatures positionally matched to [`ChainTx::sighashes`].
    ///
    /// Every slot is overwritten; calling this twice replaces the first set.
    ///
    /// # Errors
    ///
    /// - [`TxError::SignatureCount`] if the count differs from the slot count
    /// - [`TxError::InvalidSignature`] if a signature has the wrong shape
    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError>;

    /// Fills the slots of the named signers, keeping slots filled earlier.
    ///
    /// # Errors
    ///
    /// Returns [`TxError::Unsupported`] on chains with a single signer, and
    /// [`TxError::UnknownSigner`] for an address that is not a required signer.
    fn add_signer_signatures(
        &mut self,
        signatures: &[(Address, TxSignature)],
    ) -> Result<(), TxError> {
        let _ = signatures;
        Err(TxError::unsupported(
            "per-signer signatures on a single-signer transaction",
        ))
    }

    /// Returns the transaction hash of the signed transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TxError::NotSigned`] before every slot is filled.
    fn hash(&self) -> Result<TxHash, TxError>;

    /// Returns the wire encoding of the signed transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TxError::NotSigned`] before every slot is filled.
    fn serialize(&self) -> Result<Vec<u8>, TxError>;

    /// Returns the fee line items the transaction commits to.
    ///
    /// Chains whose fee is settled by the network report nothing.
    fn fees(&self) -> Vec<FeeEntry> {
        Vec::new()
    }
}

// ============================================================================
// Tx
// ============================================================================

/// A transaction for one of the supported chains.
#[derive(Debug, Clone)]
pub enum Tx {
    /// EVM fee-market or legacy transaction.
    Evm(EvmTx),
    /// Solana transaction.
    Solana(SolanaTx),
    /// Cosmos SDK transaction.
    Cosmos(CosmosTx),
    /// Bitcoin segwit transaction.
    Bitcoin(BitcoinTx),
}

impl Tx {
    /// Returns the chain driver the transaction belongs to.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        match self {
            Self::Evm(tx) => tx.driver(),
            Self::Solana(_) => Driver::Solana,
            Self::Cosmos(_) => Driver::Cosmos,
            Self::Bitcoin(_) => Driver::Bitcoin,
        }
    }

    /// Returns `true` once every signature slot is filled.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.state() == TxState::Signed
    }

    fn inner(&self) -> &dyn ChainTx {
        match self {
            Self::Evm(tx) => tx,
            Self::Solana(tx) => tx,
            Self::Cosmos(tx) => tx,
            Self::Bitcoin(tx) => tx,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ChainTx {
        match self {
            Self::Evm(tx) => tx,
            Self::Solana(tx) => tx,
            Self::Cosmos(tx) => tx,
            Self::Bitcoin(tx) => tx,
        }
    }
}

impl ChainTx for Tx {
    fn state(&self) -> TxState {
        self.inner().state()
    }

    fn sighashes(&self) -> Result<Vec<TxDataToSign>, TxError> {
        self.inner().sighashes()
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), TxError> {
        self.inner_mut().add_signatures(signatures)
    }

    fn add_signer_signatures(
        &mut self,
        signatures: &[(Address, TxSignature)],
    ) -> Result<(), TxError> {
        self.inner_mut().add_signer_signatures(signatures)
    }

    fn hash(&self) -> Result<TxHash, TxError> {
        self.inner().hash()
    }

    fn serialize(&self) -> Result<Vec<u8>, TxError> {
        self.inner().serialize()
    }

    fn fees(&self) -> Vec<FeeEntry> {
        self.inner().fees()
    }
}

impl From<EvmTx> for Tx {
    fn from(tx: EvmTx) -> Self {
        Self::Evm(tx)
    }
}

impl From<SolanaTx> for Tx {
    fn from(tx: SolanaTx) -> Self {
        Self::Solana(tx)
    }
}

impl From<CosmosTx> for Tx {
    fn from(tx: CosmosTx) -> Self {
        Self::Cosmos(tx)
    }
}

impl From<BitcoinTx> for Tx {
    fn from(tx: BitcoinTx) -> Self {
        Self::Bitcoin(tx)
    }
}

/// Checks a signature count against the slot count.
///
/// # Errors
///
/// Returns [`TxError::SignatureCount`] when they differ.
pub(crate) fn check_signature_count(expected: usize, actual: usize) -> Result<(), TxError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TxError::SignatureCount { expected, actual })
    }
}
