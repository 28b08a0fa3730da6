//! Shared value types.
//!
//! Addresses, hashes, digests and signatures cross chain boundaries as opaque
//! values; only the matching chain driver interprets their contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chain driver identifier.
///
/// Each driver owns one wire format, fee model and signature scheme. Several
/// chains may share a driver (every EVM network uses [`Driver::Evm`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// EVM chains with EIP-1559 fee markets.
    Evm,
    /// EVM chains without a fee market (gas price only).
    EvmLegacy,
    /// Cosmos SDK chains.
    Cosmos,
    /// Solana.
    Solana,
    /// Bitcoin and forks using segwit v0.
    Bitcoin,
}

impl Driver {
    /// All drivers.
    pub const ALL: [Self; 5] = [
        Self::Evm,
        Self::EvmLegacy,
        Self::Cosmos,
        Self::Solana,
        Self::Bitcoin,
    ];

    /// Returns the driver name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::EvmLegacy => "evm_legacy",
            Self::Cosmos => "cosmos",
            Self::Solana => "solana",
            Self::Bitcoin => "bitcoin",
        }
    }

    /// Returns `true` for account-model EVM drivers.
    #[must_use]
    pub const fn is_evm(self) -> bool {
        matches!(self, Self::Evm | Self::EvmLegacy)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|driver| driver.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown driver '{s}'"))
    }
}

/// A chain address in its canonical text encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps an address string.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// A transaction hash in the chain's conventional text encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wraps a hash string.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bytes that must be signed to authorize a transaction.
///
/// For secp256k1 chains this is a 32-byte digest; for ed25519 chains it is
/// the full serialized message. `signer` names the account expected to sign
/// when a transaction has several signer slots.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TxDataToSign {
    payload: Vec<u8>,
    signer: Option<Address>,
}

impl TxDataToSign {
    /// Creates signing data without a designated signer.
    #[must_use]
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            signer: None,
        }
    }

    /// Creates signing data for a specific signer slot.
    #[must_use]
    pub fn for_signer(payload: impl Into<Vec<u8>>, signer: Address) -> Self {
        Self {
            payload: payload.into(),
            signer: Some(signer),
        }
    }

    /// Returns the bytes to sign.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the designated signer, if any.
    #[must_use]
    pub const fn signer(&self) -> Option<&Address> {
        self.signer.as_ref()
    }
}

impl fmt::Debug for TxDataToSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxDataToSign")
            .field("payload", &hex::encode(&self.payload))
            .field("signer", &self.signer)
            .finish()
    }
}

/// A raw signature over one [`TxDataToSign`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TxSignature(Vec<u8>);

impl TxSignature {
    /// Wraps signature bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the signature has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxSignature({})", hex::encode(&self.0))
    }
}

/// A public key in the encoding its chain expects.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(#[serde(with = "hex_bytes")] Vec<u8>);

impl PublicKey {
    /// Wraps public key bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0))
    }
}

/// Serde helper storing byte vectors as hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes bytes as lowercase hex.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    /// Deserializes bytes from hex, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Fails on invalid hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let text = text.strip_prefix("0x").unwrap_or(&text);
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}
