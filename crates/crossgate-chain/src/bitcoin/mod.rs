//! Bitcoin segwit v0.
//!
//! - [`BitcoinBuilder`] spends pay-to-witness-public-key-hash outputs
//! - [`BitcoinTx`] holds one signature slot per spent output
//!
//! Only native transfers exist; there is no token or contract layer.

mod builder;
mod input;
mod tx;

pub use builder::{estimate_vsize, BitcoinBuilder, DUST_LIMIT};
pub use input::{BitcoinTxInput, Utxo};
pub use tx::BitcoinTx;

use ::bitcoin::address::NetworkUnchecked;
use ::bitcoin::{CompressedPublicKey, Network};

use crossgate_core::error::BuildError;
use crossgate_core::ChainDescriptor;

/// Resolves the network named by a descriptor.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] for an unknown network name.
pub fn network(chain: &ChainDescriptor) -> Result<Network, BuildError> {
    match chain.network.as_str() {
        "" | "mainnet" | "bitcoin" => Ok(Network::Bitcoin),
        "testnet" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => Err(BuildError::invalid_input(
            "network",
            format!("unknown bitcoin network '{other}'"),
        )),
    }
}

/// Parses an address and checks it belongs to `network`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidAddress`] for malformed or foreign addresses.
pub fn parse_address(address: &str, network: Network) -> Result<::bitcoin::Address, BuildError> {
    address
        .parse::<::bitcoin::Address<NetworkUnchecked>>()
        .map_err(|e| BuildError::invalid_address(address, e.to_string()))?
        .require_network(network)
        .map_err(|e| BuildError::invalid_address(address, e.to_string()))
}

/// Parses a 33-byte compressed public key.
///
/// # Errors
///
/// - [`BuildError::InvalidLength`] for other lengths
/// - [`BuildError::InvalidInput`] if the bytes are not a curve point
pub fn parse_public_key(bytes: &[u8]) -> Result<CompressedPublicKey, BuildError> {
    if bytes.len() != 33 {
        return Err(BuildError::invalid_length("from_public_key", 33, bytes.len()));
    }
    CompressedPublicKey::from_slice(bytes)
        .map_err(|e| BuildError::invalid_input("from_public_key", e.to_string()))
}

/// Returns the P2WPKH address of a compressed public key.
#[must_use]
pub fn p2wpkh_address(public_key: &CompressedPublicKey, network: Network) -> ::bitcoin::Address {
    ::bitcoin::Address::p2wpkh(public_key, network)
}
