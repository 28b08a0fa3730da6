//! Private key material.
//!
//! [`SecretKey`] holds 32 bytes of key material for either curve. It is
//! zeroized on drop, never printed, compared in constant time and cannot be
//! cloned.

use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crossgate_core::error::SignError;

/// Length of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// A 32-byte private key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LEN],
}

impl SecretKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn new(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generates a random key from the operating system RNG.
    ///
    /// The bytes are not checked against any curve order; use the key pair
    /// constructors to validate.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Copies a key from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] unless the slice is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignError> {
        let bytes: [u8; SECRET_KEY_LEN] = bytes.try_into().map_err(|_| SignError::InvalidKey)?;
        Ok(Self { bytes })
    }

    /// Decodes a hex key, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] for invalid hex or a wrong length.
    pub fn from_hex(encoded: &str) -> Result<Self, SignError> {
        let trimmed = encoded.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let decoded = Zeroizing::new(hex::decode(trimmed).map_err(|_| SignError::InvalidKey)?);
        Self::from_slice(&decoded)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for SecretKey {}

impl From<[u8; SECRET_KEY_LEN]> for SecretKey {
    fn from(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self::new(bytes)
    }
}
