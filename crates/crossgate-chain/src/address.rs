//! Address derivation from public keys.
//!
//! | Driver | Key | Address |
//! |--------|-----|---------|
//! | EVM | secp256k1, either SEC1 form | EIP-55 checksummed `keccak256(point)[12..]` |
//! | Solana | Ed25519 | base58 key |
//! | Cosmos | secp256k1, compressed | bech32 of `hash160(key)`, or of the EVM address bytes on Ethereum-key chains |
//! | Bitcoin | secp256k1, compressed | P2WPKH on the descriptor network |

use ::bitcoin::hashes::{hash160, Hash};
use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::BuildError;
use crossgate_core::{Address, Driver, PublicKey};

use crate::{bitcoin, cosmos, solana};

/// Derives the address controlled by `public_key` on the asset's chain.
///
/// # Errors
///
/// Returns [`BuildError::InvalidLength`] or [`BuildError::InvalidInput`] for a
/// key of the wrong shape for the chain's curve.
pub fn derive_address(
    asset: &AssetDescriptor,
    public_key: &PublicKey,
) -> Result<Address, BuildError> {
    let chain = asset.chain();
    let key = public_key.as_bytes();
    let address = match chain.driver {
        Driver::Evm | Driver::EvmLegacy => {
            alloy_primitives::Address::from(evm_address_bytes(key)?).to_checksum(None)
        }
        Driver::Solana => {
            if key.len() != solana::KEY_LEN {
                return Err(BuildError::invalid_length("public_key", solana::KEY_LEN, key.len()));
            }
            bs58::encode(key).into_string()
        }
        Driver::Cosmos => {
            let bytes = if chain.uses_ethereum_keys() {
                evm_address_bytes(key)?.to_vec()
            } else {
                hash160::Hash::hash(key).to_byte_array().to_vec()
            };
            cosmos::encode_account(&chain.chain_prefix, &bytes)?
        }
        Driver::Bitcoin => {
            let key = bitcoin::parse_public_key(key)?;
            bitcoin::p2wpkh_address(&key, bitcoin::network(chain)?).to_string()
        }
    };
    tracing::debug!(chain = %chain.chain, %address, "derived address");
    Ok(Address::new(address))
}

fn evm_address_bytes(key: &[u8]) -> Result<[u8; 20], BuildError> {
    let verifying = VerifyingKey::from_sec1_bytes(key)
        .map_err(|_| BuildError::invalid_input("public_key", "not a secp256k1 point"))?;
    let point = verifying.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}
