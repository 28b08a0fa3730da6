//! Contract call encoding for fixed-width arguments.
//!
//! Calldata is a 4-byte selector followed by one 32-byte word per argument:
//!
//! - selector: first 4 bytes of `keccak256(signature)`
//! - `address`: left-padded to 32 bytes
//! - `uintN` / `bool`: big-endian, left-padded to 32 bytes
//! - `bytesN`: right-padded to 32 bytes
//!
//! ```
//! use crossgate_chain::evm::abi::{encode_transfer_call, TRANSFER_SELECTOR};
//! use crossgate_core::Amount;
//!
//! let to = alloy_primitives::Address::repeat_byte(0x11);
//! let data = encode_transfer_call(&to, &Amount::from_u64(1_000_000));
//! assert_eq!(data.len(), 68);
//! assert_eq!(data[..4], TRANSFER_SELECTOR);
//! ```

use alloy_primitives::{keccak256, Address, U256};

use crossgate_core::asset::TaskArg;
use crossgate_core::error::BuildError;
use crossgate_core::Amount;

use super::parse_address;

/// Canonical signature of the fungible token transfer method.
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// `keccak256("transfer(address,uint256)")[..4]`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Size of one argument word.
pub const WORD_LEN: usize = 32;

/// Returns the 4-byte method selector of a canonical signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pads an address to one word.
#[must_use]
pub fn address_word(address: &Address) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Encodes a call from a selector and pre-encoded words.
#[must_use]
pub fn encode_words(selector: [u8; 4], words: &[[u8; WORD_LEN]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD_LEN * words.len());
    data.extend_from_slice(&selector);
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

/// Encodes `transfer(to, amount)`.
#[must_use]
pub fn encode_transfer_call(to: &Address, amount: &Amount) -> Vec<u8> {
    encode_words(
        TRANSFER_SELECTOR,
        &[address_word(to), amount.to_be_bytes32()],
    )
}

/// Encodes a task call, resolving `destination` and `amount` placeholders.
///
/// Every argument must match the static parameter type at its position in
/// `signature`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] for a malformed signature, an argument
/// count mismatch, a type mismatch or an unparsable fixed value.
pub fn encode_call(
    signature: &str,
    args: &[TaskArg],
    to: &Address,
    amount: &Amount,
) -> Result<Vec<u8>, BuildError> {
    let params = parameter_types(signature)?;
    if params.len() != args.len() {
        return Err(BuildError::invalid_input(
            "task.args",
            format!(
                "'{signature}' takes {} arguments, {} configured",
                params.len(),
                args.len()
            ),
        ));
    }

    let words = params
        .iter()
        .zip(args)
        .map(|(param, arg)| encode_arg(param, arg, to, amount))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(encode_words(selector(signature), &words))
}

fn parameter_types(signature: &str) -> Result<Vec<&str>, BuildError> {
    let malformed = || {
        BuildError::invalid_input(
            "task.signature",
            format!("'{signature}' is not of the form name(type,...)"),
        )
    };
    let (name, rest) = signature.split_once('(').ok_or_else(malformed)?;
    let params = rest.strip_suffix(')').ok_or_else(malformed)?;
    if name.is_empty() || params.contains(['(', ')', ' ']) {
        return Err(malformed());
    }
    if params.is_empty() {
        return Ok(Vec::new());
    }
    Ok(params.split(',').collect())
}

fn encode_arg(
    param: &str,
    arg: &TaskArg,
    to: &Address,
    amount: &Amount,
) -> Result<[u8; WORD_LEN], BuildError> {
    let mismatch = || {
        BuildError::invalid_input(
            "task.args",
            format!("argument '{arg}' cannot be encoded as {param}"),
        )
    };

    match arg {
        TaskArg::Destination if param == "address" => Ok(address_word(to)),
        TaskArg::Address(text) if param == "address" => {
            Ok(address_word(&parse_address("task.args", text)?))
        }
        TaskArg::Amount if is_uint(param) => Ok(amount.to_be_bytes32()),
        TaskArg::Uint(text) if is_uint(param) => U256::from_str_radix(text, 10)
            .map(|value| value.to_be_bytes::<WORD_LEN>())
            .map_err(|_| {
                BuildError::invalid_input("task.args", format!("'{text}' is not a decimal integer"))
            }),
        TaskArg::Bool(value) if param == "bool" => {
            let mut word = [0u8; WORD_LEN];
            word[WORD_LEN - 1] = u8::from(*value);
            Ok(word)
        }
        TaskArg::Bytes32(text) if param == "bytes32" => {
            let bytes = hex::decode(text.strip_prefix("0x").unwrap_or(text))
                .map_err(|e| BuildError::invalid_input("task.args", e.to_string()))?;
            if bytes.len() > WORD_LEN {
                return Err(BuildError::invalid_length("task.args", WORD_LEN, bytes.len()));
            }
            let mut word = [0u8; WORD_LEN];
            word[..bytes.len()].copy_from_slice(&bytes);
            Ok(word)
        }
        _ => Err(mismatch()),
    }
}

fn is_uint(param: &str) -> bool {
    param
        .strip_prefix("uint")
        .and_then(|bits| bits.parse::<u16>().ok())
        .is_some_and(|bits| bits % 8 == 0 && (8..=256).contains(&bits))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn to() -> Address {
        "0x1234567890123456789012345678901234567890".parse().unwrap()
    }

    #[test]
    fn test_transfer_selector_matches_hash() {
        assert_eq!(selector(TRANSFER_SIGNATURE), TRANSFER_SELECTOR);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_encode_transfer_call_layout() {
        let data = encode_transfer_call(&to(), &Amount::from_u64(1_000_000));
        assert_eq!(
            hex::encode(&data),
            "a9059cbb\
             0000000000000000000000001234567890123456789012345678901234567890\
             00000000000000000000000000000000000000000000000000000000000f4240"
        );
    }

    #[test]
    fn test_encode_call_matches_transfer_encoding() {
        let amount = Amount::from_u64(42);
        let generic = encode_call(
            TRANSFER_SIGNATURE,
            &[TaskArg::Destination, TaskArg::Amount],
            &to(),
            &amount,
        )
        .unwrap();
        assert_eq!(generic, encode_transfer_call(&to(), &amount));
    }

    #[test]
    fn test_encode_call_fixed_arguments() {
        let data = encode_call(
            "deposit(bool,uint64,bytes32)",
            &[
                TaskArg::Bool(true),
                TaskArg::Uint("258".to_string()),
                TaskArg::Bytes32("0xabcd".to_string()),
            ],
            &to(),
            &Amount::ZERO,
        )
        .unwrap();
        assert_eq!(data.len(), 4 + 3 * WORD_LEN);
        assert_eq!(data[4 + 31], 1);
        assert_eq!(&data[36 + 30..36 + 32], &[0x01, 0x02]);
        assert_eq!(&data[68..70], &[0xab, 0xcd]);
        assert!(data[70..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_call_without_arguments() {
        let data = encode_call("claim()", &[], &to(), &Amount::ZERO).unwrap();
        assert_eq!(data, selector("claim()").to_vec());
    }

    #[test]
    fn test_encode_call_rejects_mismatches() {
        let err = encode_call("stake(uint256)", &[], &to(), &Amount::ZERO).unwrap_err();
        assert!(err.to_string().contains("takes 1 arguments, 0 configured"));

        let err = encode_call(
            "stake(address)",
            &[TaskArg::Amount],
            &to(),
            &Amount::ZERO,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be encoded as address"));

        assert!(encode_call("stake", &[], &to(), &Amount::ZERO).is_err());
        assert!(encode_call("(uint256)", &[TaskArg::Amount], &to(), &Amount::ZERO).is_err());
    }

    #[test]
    fn test_uint_widths() {
        assert!(is_uint("uint256"));
        assert!(is_uint("uint8"));
        assert!(!is_uint("uint"));
        assert!(!is_uint("uint7"));
        assert!(!is_uint("uint512"));
        assert!(!is_uint("int256"));
    }
}
