//! Cosmos SDK chains.
//!
//! - [`CosmosBuilder`] builds bank sends and CW20 transfers
//! - [`CosmosTx`] holds a single `SIGN_MODE_DIRECT` signature
//! - [`proto`] declares the protobuf messages both need
//!
//! Accounts are bech32 strings under the chain prefix. A token contract that
//! is itself a bech32 address under that prefix is a CW20 contract; any other
//! contract string is a bank denomination.

mod builder;
mod input;
pub mod proto;
mod tx;

pub use builder::CosmosBuilder;
pub use input::CosmosTxInput;
pub use tx::CosmosTx;

use bech32::{FromBase32, ToBase32, Variant};

use crossgate_core::error::BuildError;

/// Length of an account address.
pub const ACCOUNT_LEN: usize = 20;

/// Length of a contract address.
pub const CONTRACT_LEN: usize = 32;

fn decode(address: &str) -> Result<(String, Vec<u8>), BuildError> {
    let (hrp, data, _) = bech32::decode(address)
        .map_err(|e| BuildError::invalid_address(address, e.to_string()))?;
    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| BuildError::invalid_address(address, e.to_string()))?;
    Ok((hrp, bytes))
}

/// Validates a bech32 account or contract address under `prefix`.
///
/// # Errors
///
/// - [`BuildError::InvalidAddress`] for malformed bech32 or a foreign prefix
/// - [`BuildError::InvalidLength`] unless the payload is 20 or 32 bytes
pub fn parse_account(field: &str, address: &str, prefix: &str) -> Result<Vec<u8>, BuildError> {
    let (hrp, bytes) = decode(address)?;
    if !prefix.is_empty() && hrp != prefix {
        return Err(BuildError::invalid_address(
            address,
            format!("expected prefix '{prefix}', got '{hrp}'"),
        ));
    }
    if bytes.len() != ACCOUNT_LEN && bytes.len() != CONTRACT_LEN {
        return Err(BuildError::invalid_length(field, ACCOUNT_LEN, bytes.len()));
    }
    Ok(bytes)
}

/// Returns `true` if `contract` names a CW20 contract rather than a bank denom.
#[must_use]
pub fn is_cw20_contract(contract: &str, prefix: &str) -> bool {
    !prefix.is_empty() && parse_account("contract", contract, prefix).is_ok()
}

/// Encodes address bytes as bech32 under `prefix`.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] for an invalid prefix.
pub fn encode_account(prefix: &str, bytes: &[u8]) -> Result<String, BuildError> {
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| BuildError::encoding(format!("bech32 address: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_account_accepts_prefix() {
        let address = encode_account("xpla", &[7u8; ACCOUNT_LEN]).unwrap();
        assert!(address.starts_with("xpla1"));
        assert_eq!(parse_account("to", &address, "xpla").unwrap(), vec![7u8; 20]);
    }

    #[test]
    fn test_parse_account_rejects_foreign_prefix() {
        let address = encode_account("cosmos", &[7u8; ACCOUNT_LEN]).unwrap();
        let err = parse_account("to", &address, "xpla").unwrap_err();
        assert!(err.to_string().contains("expected prefix 'xpla', got 'cosmos'"));
    }

    #[test]
    fn test_parse_account_rejects_bad_length() {
        let address = encode_account("xpla", &[7u8; 5]).unwrap();
        assert_eq!(
            parse_account("from", &address, "xpla").unwrap_err().to_string(),
            "invalid from: invalid length, expected 20, got 5"
        );
        assert!(matches!(
            parse_account("from", "xpla1notbech32", "xpla"),
            Err(BuildError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_cw20_detection() {
        let contract = encode_account("terra", &[9u8; CONTRACT_LEN]).unwrap();
        assert!(is_cw20_contract(&contract, "terra"));
        assert!(!is_cw20_contract(&contract, "xpla"));
        assert!(!is_cw20_contract("uusd", "terra"));
        assert!(!is_cw20_contract("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2", "terra"));
    }
}
