//! Key pairs for the two curves crossgate signs with.
//!
//! - [`Secp256k1KeyPair`] - ECDSA over secp256k1 (EVM, Cosmos, Bitcoin).
//!   Signs 32-byte prehashed digests and returns recoverable, low-S signatures.
//! - [`Ed25519KeyPair`] - `EdDSA` over Ed25519 (Solana). Signs full messages.
//!
//! ```
//! use crossgate_crypto::{KeyPair, Secp256k1KeyPair, SecretKey};
//!
//! let keypair = Secp256k1KeyPair::from_secret_key(&SecretKey::new([7u8; 32])).unwrap();
//! let signature = keypair.sign(&[0u8; 32]).unwrap();
//! assert_eq!(signature.to_recoverable_bytes().len(), 65);
//! ```

use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::keys::SecretKey;
use crossgate_core::error::SignError;

/// Size of a secp256k1 prehashed digest.
pub const DIGEST_LEN: usize = 32;

/// Common interface of the curve key pairs.
pub trait KeyPair: Send + Sync {
    /// Signature produced by this key pair.
    type Signature: AsRef<[u8]>;

    /// Public key type.
    type PublicKey: AsRef<[u8]>;

    /// Builds a key pair from 32 secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a valid scalar.
    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError>
    where
        Self: Sized;

    /// Returns the public key.
    fn public_key(&self) -> &Self::PublicKey;

    /// Signs `message`.
    ///
    /// # Errors
    ///
    /// Fails when the message shape is wrong for the curve or signing fails.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError>;
}

// ============================================================================
// secp256k1
// ============================================================================

/// A secp256k1 public key in both SEC1 encodings.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    compressed: [u8; 33],
    uncompressed: [u8; 65],
}

impl Secp256k1PublicKey {
    fn from_verifying_key(verifying: &VerifyingKey) -> Self {
        let mut uncompressed = [0u8; 65];
        uncompressed.copy_from_slice(verifying.to_encoded_point(false).as_bytes());

        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(verifying.to_encoded_point(true).as_bytes());

        Self {
            compressed,
            uncompressed,
        }
    }

    /// Parses a compressed or uncompressed SEC1 key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a curve point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, SignError> {
        let verifying = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| SignError::InvalidKey)?;
        Ok(Self::from_verifying_key(&verifying))
    }

    /// Returns the 33-byte compressed encoding.
    #[must_use]
    pub const fn compressed(&self) -> &[u8; 33] {
        &self.compressed
    }

    /// Returns the 65-byte uncompressed encoding.
    #[must_use]
    pub const fn uncompressed(&self) -> &[u8; 65] {
        &self.uncompressed
    }

    /// Returns the 20-byte Ethereum address: the tail of keccak256 over the
    /// uncompressed point without its `0x04` tag.
    #[must_use]
    pub fn ethereum_address(&self) -> [u8; 20] {
        let hash = Keccak256::digest(&self.uncompressed[1..]);
        let mut address = [0u8; 20];
        if let Some(tail) = hash.get(12..32) {
            address.copy_from_slice(tail);
        }
        address
    }
}

impl AsRef<[u8]> for Secp256k1PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.compressed
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(self.compressed))
    }
}

/// A recoverable secp256k1 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1Signature {
    bytes: [u8; 64],
    recovery_id: u8,
}

impl Secp256k1Signature {
    /// Returns the recovery id (0 or 1).
    #[must_use]
    pub const fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Returns `r || s`.
    #[must_use]
    pub const fn compact(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// Returns `r || s || v`.
    #[must_use]
    pub fn to_recoverable_bytes(&self) -> [u8; 65] {
        let mut result = [0u8; 65];
        result[..64].copy_from_slice(&self.bytes);
        result[64] = self.recovery_id;
        result
    }
}

impl AsRef<[u8]> for Secp256k1Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Secp256k1Signature({}, v={})",
            hex::encode(self.bytes),
            self.recovery_id
        )
    }
}

/// A secp256k1 key pair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
    public_key: Secp256k1PublicKey,
}

impl Secp256k1KeyPair {
    /// Builds a key pair from a secret key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for zero or out-of-range scalars.
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    /// Verifies a signature over a digest.
    #[must_use]
    pub fn verify(&self, digest: &[u8; 32], signature: &Secp256k1Signature) -> bool {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;

        let Ok(sig) = K256Signature::from_slice(signature.as_ref()) else {
            return false;
        };
        self.signing_key
            .verifying_key()
            .verify_prehash(digest, &sig)
            .is_ok()
    }
}

impl KeyPair for Secp256k1KeyPair {
    type Signature = Secp256k1Signature;
    type PublicKey = Secp256k1PublicKey;

    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| SignError::InvalidKey)?;
        let public_key = Secp256k1PublicKey::from_verifying_key(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError> {
        if message.len() != DIGEST_LEN {
            return Err(SignError::InvalidDigest {
                expected: DIGEST_LEN,
                actual: message.len(),
            });
        }

        let (signature, recovery_id): (K256Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(message)
            .map_err(|_| SignError::signature_failed("secp256k1 signing failed"))?;

        // High-S signatures are rejected by Bitcoin and Ethereum; negating s flips the parity.
        let normalized = signature.normalize_s();
        let recovery_id = if normalized.is_some() {
            recovery_id.to_byte() ^ 1
        } else {
            recovery_id.to_byte()
        };

        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&normalized.unwrap_or(signature).to_bytes());

        Ok(Secp256k1Signature { bytes, recovery_id })
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Ed25519
// ============================================================================

/// An Ed25519 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    bytes: [u8; 32],
}

impl Ed25519PublicKey {
    /// Returns the key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Returns the base58 Solana address.
    #[must_use]
    pub fn solana_address(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.solana_address())
    }
}

/// An Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Signature {
    bytes: [u8; 64],
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({})", hex::encode(self.bytes))
    }
}

/// An Ed25519 key pair.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
    public_key: Ed25519PublicKey,
}

impl Ed25519KeyPair {
    /// Builds a key pair from a 32-byte seed.
    ///
    /// # Errors
    ///
    /// Infallible for Ed25519; the `Result` matches [`KeyPair::from_bytes`].
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    /// Verifies a signature over a message.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        use ed25519_dalek::Verifier;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.bytes);
        self.signing_key
            .verifying_key()
            .verify(message, &sig)
            .is_ok()
    }
}

impl KeyPair for Ed25519KeyPair {
    type Signature = Ed25519Signature;
    type PublicKey = Ed25519PublicKey;

    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&bytes);
        let public_key = Ed25519PublicKey {
            bytes: signing_key.verifying_key().to_bytes(),
        };
        Ok(Self {
            signing_key,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError> {
        use ed25519_dalek::Signer;

        Ok(Ed25519Signature {
            bytes: self.signing_key.sign(message).to_bytes(),
        })
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
