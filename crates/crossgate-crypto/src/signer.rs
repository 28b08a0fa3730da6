//! Per-curve signers.
//!
//! A [`Signer`] is stateless: it maps a private key and signing data to a
//! signature, and a private key to the public key its chain expects. The
//! same signer value can serve any number of concurrent transfers.
//!
//! ```
//! use crossgate_core::TxDataToSign;
//! use crossgate_crypto::{Secp256k1Signer, Signer};
//!
//! let signer = Secp256k1Signer::new();
//! let key = signer.import_private_key(&"01".repeat(32)).unwrap();
//! let signature = signer.sign(&key, &TxDataToSign::new([0u8; 32])).unwrap();
//! assert_eq!(signature.len(), 65);
//! ```

use zeroize::Zeroizing;

use crossgate_core::error::SignError;
use crossgate_core::{Driver, PublicKey, TxDataToSign, TxSignature};

use crate::keypair::{Ed25519KeyPair, KeyPair, Secp256k1KeyPair};
use crate::keys::{SecretKey, SECRET_KEY_LEN};

/// Elliptic curve of a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveType {
    /// secp256k1 ECDSA.
    Secp256k1,
    /// Ed25519 `EdDSA`.
    Ed25519,
}

impl CurveType {
    /// Returns the curve used by a chain driver.
    #[must_use]
    pub const fn for_driver(driver: Driver) -> Self {
        match driver {
            Driver::Solana => Self::Ed25519,
            Driver::Evm | Driver::EvmLegacy | Driver::Cosmos | Driver::Bitcoin => Self::Secp256k1,
        }
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secp256k1 => f.write_str("secp256k1"),
            Self::Ed25519 => f.write_str("ed25519"),
        }
    }
}

/// Signs transaction digests for one curve.
pub trait Signer: Send + Sync {
    /// Returns the signer's curve.
    fn curve(&self) -> CurveType;

    /// Decodes a private key in the chain's customary text encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for malformed input or invalid scalars.
    fn import_private_key(&self, encoded: &str) -> Result<SecretKey, SignError>;

    /// Signs one digest or message.
    ///
    /// # Errors
    ///
    /// Fails if the key is invalid or the data has the wrong shape.
    fn sign(&self, key: &SecretKey, data: &TxDataToSign) -> Result<TxSignature, SignError>;

    /// Derives the public key in the chain's expected encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for invalid scalars.
    fn public_key(&self, key: &SecretKey) -> Result<PublicKey, SignError>;
}

// ============================================================================
// Secp256k1Signer
// ============================================================================

/// Public key encoding returned by [`Secp256k1Signer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublicKeyFormat {
    /// 33-byte SEC1 compressed point.
    #[default]
    Compressed,
    /// 65-byte SEC1 uncompressed point.
    Uncompressed,
}

/// ECDSA signer over secp256k1.
///
/// Signatures are 65 bytes `r || s || v` with low-S normalisation and
/// `v` in `{0, 1}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Signer {
    format: PublicKeyFormat,
}

impl Secp256k1Signer {
    /// Creates a signer returning compressed public keys.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: PublicKeyFormat::Compressed,
        }
    }

    /// Creates a signer returning uncompressed public keys.
    #[must_use]
    pub const fn uncompressed() -> Self {
        Self {
            format: PublicKeyFormat::Uncompressed,
        }
    }

    /// Creates the signer a driver expects: uncompressed keys for EVM,
    /// compressed elsewhere.
    #[must_use]
    pub const fn for_driver(driver: Driver) -> Self {
        if driver.is_evm() {
            Self::uncompressed()
        } else {
            Self::new()
        }
    }
}

impl Signer for Secp256k1Signer {
    fn curve(&self) -> CurveType {
        CurveType::Secp256k1
    }

    fn import_private_key(&self, encoded: &str) -> Result<SecretKey, SignError> {
        let key = SecretKey::from_hex(encoded)?;
        Secp256k1KeyPair::from_secret_key(&key)?;
        Ok(key)
    }

    fn sign(&self, key: &SecretKey, data: &TxDataToSign) -> Result<TxSignature, SignError> {
        let keypair = Secp256k1KeyPair::from_secret_key(key)?;
        let signature = keypair.sign(data.payload())?;
        Ok(TxSignature::new(signature.to_recoverable_bytes().to_vec()))
    }

    fn public_key(&self, key: &SecretKey) -> Result<PublicKey, SignError> {
        let keypair = Secp256k1KeyPair::from_secret_key(key)?;
        let public_key = keypair.public_key();
        Ok(match self.format {
            PublicKeyFormat::Compressed => PublicKey::new(public_key.compressed().to_vec()),
            PublicKeyFormat::Uncompressed => PublicKey::new(public_key.uncompressed().to_vec()),
        })
    }
}

// ============================================================================
// Ed25519Signer
// ============================================================================

/// `EdDSA` signer over Ed25519.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Ed25519Signer {
    /// Creates the signer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Signer for Ed25519Signer {
    fn curve(&self) -> CurveType {
        CurveType::Ed25519
    }

    /// Accepts a hex seed (32 bytes), a hex keypair (64 bytes) or a base58
    /// keypair as exported by Solana wallets. Only the first 32 bytes of a
    /// keypair are secret.
    fn import_private_key(&self, encoded: &str) -> Result<SecretKey, SignError> {
        let trimmed = encoded.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let decoded = Zeroizing::new(
            hex::decode(trimmed)
                .or_else(|_| bs58::decode(trimmed).into_vec())
                .map_err(|_| SignError::InvalidKey)?,
        );

        match decoded.len() {
            SECRET_KEY_LEN => SecretKey::from_slice(&decoded),
            64 => {
                let (secret, public) = decoded.split_at(SECRET_KEY_LEN);
                let key = SecretKey::from_slice(secret)?;
                let keypair = Ed25519KeyPair::from_secret_key(&key)?;
                if keypair.public_key().as_bytes().as_slice() != public {
                    return Err(SignError::InvalidKey);
                }
                Ok(key)
            }
            _ => Err(SignError::InvalidKey),
        }
    }

    fn sign(&self, key: &SecretKey, data: &TxDataToSign) -> Result<TxSignature, SignError> {
        let keypair = Ed25519KeyPair::from_secret_key(key)?;
        let signature = keypair.sign(data.payload())?;
        Ok(TxSignature::new(signature.as_ref().to_vec()))
    }

    fn public_key(&self, key: &SecretKey) -> Result<PublicKey, SignError> {
        let keypair = Ed25519KeyPair::from_secret_key(key)?;
        Ok(PublicKey::new(keypair.public_key().as_bytes().to_vec()))
    }
}

/// Returns the signer for a driver.
#[must_use]
pub fn signer_for(driver: Driver) -> Box<dyn Signer> {
    match CurveType::for_driver(driver) {
        CurveType::Secp256k1 => Box::new(Secp256k1Signer::for_driver(driver)),
        CurveType::Ed25519 => Box::new(Ed25519Signer::new()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    // ------------------------------------------------------------------------
    // Secp256k1Signer
    // ------------------------------------------------------------------------

    #[test]
    fn test_secp_import_rejects_invalid_scalar() {
        let signer = Secp256k1Signer::new();
        assert_eq!(
            signer.import_private_key(&"00".repeat(32)).unwrap_err(),
            SignError::InvalidKey
        );
        assert!(signer.import_private_key("not hex").is_err());
    }

    #[test]
    fn test_secp_public_key_formats() {
        let key = Secp256k1Signer::new().import_private_key(KEY_ONE).unwrap();

        let compressed = Secp256k1Signer::new().public_key(&key).unwrap();
        assert_eq!(compressed.as_bytes().len(), 33);

        let uncompressed = Secp256k1Signer::uncompressed().public_key(&key).unwrap();
        assert_eq!(uncompressed.as_bytes().len(), 65);
        assert_eq!(uncompressed.as_bytes()[0], 0x04);

        let evm = Secp256k1Signer::for_driver(Driver::Evm).public_key(&key).unwrap();
        assert_eq!(evm, uncompressed);
    }

    #[test]
    fn test_secp_sign_is_deterministic() {
        let signer = Secp256k1Signer::new();
        let key = signer.import_private_key(KEY_ONE).unwrap();
        let data = TxDataToSign::new([0x11u8; 32]);
        let first = signer.sign(&key, &data).unwrap();
        let second = signer.sign(&key, &data).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 65);
        assert!(first.as_bytes()[64] <= 1);
    }

    #[test]
    fn test_secp_sign_rejects_message_payload() {
        let signer = Secp256k1Signer::new();
        let key = signer.import_private_key(KEY_ONE).unwrap();
        let err = signer.sign(&key, &TxDataToSign::new(vec![0u8; 100])).unwrap_err();
        assert!(matches!(err, SignError::InvalidDigest { actual: 100, .. }));
    }

    // ------------------------------------------------------------------------
    // Ed25519Signer
    // ------------------------------------------------------------------------

    #[test]
    fn test_ed25519_import_hex_seed_and_base58_keypair() {
        let signer = Ed25519Signer::new();
        let seed = [5u8; 32];
        let from_hex = signer.import_private_key(&hex::encode(seed)).unwrap();

        let public = signer.public_key(&from_hex).unwrap();
        let mut keypair = seed.to_vec();
        keypair.extend_from_slice(public.as_bytes());
        let encoded = bs58::encode(&keypair).into_string();

        let from_base58 = signer.import_private_key(&encoded).unwrap();
        assert_eq!(from_hex, from_base58);
    }

    #[test]
    fn test_ed25519_import_rejects_mismatched_keypair() {
        let signer = Ed25519Signer::new();
        let mut keypair = vec![5u8; 32];
        keypair.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            signer
                .import_private_key(&bs58::encode(&keypair).into_string())
                .unwrap_err(),
            SignError::InvalidKey
        );
        assert!(signer.import_private_key("abc").is_err());
    }

    #[test]
    fn test_ed25519_signs_full_message() {
        let signer = Ed25519Signer::new();
        let key = SecretKey::new([3u8; 32]);
        let signature = signer
            .sign(&key, &TxDataToSign::new(vec![0x01; 200]))
            .unwrap();
        assert_eq!(signature.len(), 64);
    }

    // ------------------------------------------------------------------------
    // signer_for
    // ------------------------------------------------------------------------

    #[test]
    fn test_signer_for_driver_curves() {
        assert_eq!(signer_for(Driver::Solana).curve(), CurveType::Ed25519);
        for driver in [Driver::Evm, Driver::EvmLegacy, Driver::Cosmos, Driver::Bitcoin] {
            assert_eq!(signer_for(driver).curve(), CurveType::Secp256k1);
        }
    }
}
