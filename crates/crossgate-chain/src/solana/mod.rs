//! Solana.
//!
//! - [`SolanaBuilder`] builds system and SPL token transfers
//! - [`SolanaTx`] holds one signature slot per required signer
//! - [`instruction`] encodes the few instructions transfers need
//!
//! Token transfers always use `TransferChecked` against associated token
//! accounts unless the input names the accounts explicitly.

mod builder;
mod input;
pub mod instruction;
mod tx;

pub use builder::SolanaBuilder;
pub use input::SolanaTxInput;
pub use tx::SolanaTx;

use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;

use crossgate_core::error::BuildError;

/// Length of a public key or block hash.
pub const KEY_LEN: usize = 32;

/// The system program.
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("11111111111111111111111111111111");

/// The SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// The SPL Token-2022 program.
pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// The associated token account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

fn decode_key(field: &str, encoded: &str) -> Result<[u8; KEY_LEN], BuildError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| BuildError::invalid_address(encoded, e.to_string()))?;
    <[u8; KEY_LEN]>::try_from(bytes.as_slice())
        .map_err(|_| BuildError::invalid_length(field, KEY_LEN, bytes.len()))
}

/// Parses a base58 public key.
///
/// # Errors
///
/// - [`BuildError::InvalidAddress`] for non-base58 input
/// - [`BuildError::InvalidLength`] unless the key decodes to 32 bytes
pub fn parse_pubkey(field: &str, encoded: &str) -> Result<Pubkey, BuildError> {
    decode_key(field, encoded).map(Pubkey::new_from_array)
}

/// Parses a base58 block hash; the empty string is the zero hash.
///
/// # Errors
///
/// Fails like [`parse_pubkey`].
pub fn parse_block_hash(encoded: &str) -> Result<Hash, BuildError> {
    if encoded.is_empty() {
        return Ok(Hash::default());
    }
    decode_key("recent_block_hash", encoded).map(Hash::new_from_array)
}

/// Derives the associated token account of `owner` for `mint`.
#[must_use]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_pubkey_length_errors() {
        assert_eq!(
            parse_pubkey("from", "from").unwrap_err().to_string(),
            "invalid from: invalid length, expected 32, got 3"
        );
        assert_eq!(
            parse_pubkey("to", "to").unwrap_err().to_string(),
            "invalid to: invalid length, expected 32, got 2"
        );
        assert!(matches!(
            parse_pubkey("to", "0OIl"),
            Err(BuildError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_associated_token_address_vector() {
        let owner = parse_pubkey("owner", "Hzn3n914JaSpnxo5mBbmuCDmGL6mxWN9Ac2HzEXFSGtb").unwrap();
        let mint = parse_pubkey("mint", "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU").unwrap();
        assert_eq!(
            associated_token_address(&owner, &mint, &TOKEN_PROGRAM_ID).to_string(),
            "DvSgNMRxVSMBpLp4hZeBrmQo8ZRFne72actTZ3PYE3AA"
        );
    }

    #[test]
    fn test_parse_block_hash() {
        assert_eq!(parse_block_hash("").unwrap(), Hash::default());
        let encoded = bs58::encode([7u8; 32]).into_string();
        assert_eq!(parse_block_hash(&encoded).unwrap().to_bytes(), [7u8; 32]);
        assert!(parse_block_hash("abc").is_err());
    }
}
