//! EVM chains.
//!
//! - [`EvmBuilder`] builds fee-market (EIP-1559) or legacy transactions
//! - [`EvmTx`] holds one signature slot over the EIP-155/EIP-1559 signing hash
//! - [`abi`] encodes token transfers and task calls
//!
//! The legacy driver shares the builder and input; only the fee model differs.

pub mod abi;
mod builder;
mod input;
mod legacy;
mod tx;

pub use builder::{clamp_tip, EvmBuilder, FeeModel};
pub use input::EvmTxInput;
pub use tx::{decode_signature, EvmTx, EvmTxKind, EIP1559_TX_TYPE, SIGNATURE_LEN};

use alloy_primitives::Address;

use crossgate_core::error::BuildError;

/// Length of an EVM address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Parses a hex address, with or without `0x`.
///
/// Checksums are not enforced.
///
/// # Errors
///
/// - [`BuildError::InvalidAddress`] for non-hex input
/// - [`BuildError::InvalidLength`] unless the address decodes to 20 bytes
pub fn parse_address(field: &str, address: &str) -> Result<Address, BuildError> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits)
        .map_err(|e| BuildError::invalid_address(address, e.to_string()))?;
    if bytes.len() != ADDRESS_LEN {
        return Err(BuildError::invalid_length(field, ADDRESS_LEN, bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_address_accepts_both_cases() {
        let lower = parse_address("to", "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap();
        let mixed = parse_address("to", "A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_parse_address_errors() {
        assert!(matches!(
            parse_address("to", "0xzz"),
            Err(BuildError::InvalidAddress { .. })
        ));
        assert_eq!(
            parse_address("contract", "0x00").unwrap_err().to_string(),
            "invalid contract: invalid length, expected 20, got 1"
        );
    }
}
