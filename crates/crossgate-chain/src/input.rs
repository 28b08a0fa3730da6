//! Network-sourced transaction inputs.
//!
//! A [`TxInput`] is fetched fresh by a [`Client`](crate::Client) for every
//! transfer attempt and consumed once by a builder. It is composed of a
//! [`TxInputEnvelope`] shared by every chain and a chain-specific
//! [`TxInputPayload`].
//!
//! Builders never inspect a payload of the wrong chain: the typed accessors
//! check the envelope tag first and report
//! [`BuildError::InputMismatch`] otherwise.

use serde::{Deserialize, Serialize};

use crossgate_core::error::BuildError;
use crossgate_core::{Amount, Driver};

use crate::bitcoin::BitcoinTxInput;
use crate::cosmos::CosmosTxInput;
use crate::evm::EvmTxInput;
use crate::solana::SolanaTxInput;

/// Fields common to every chain's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInputEnvelope {
    /// Driver the input was fetched for.
    pub driver: Driver,
    /// Network gas price in smallest units; sat/vbyte on Bitcoin, the legacy
    /// gas price on EVM chains, unused elsewhere.
    #[serde(default)]
    pub gas_price: Amount,
}

/// Chain-specific input fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxInputPayload {
    /// EVM account nonce and fee market fields.
    Evm(EvmTxInput),
    /// Solana block hash and token accounts.
    Solana(SolanaTxInput),
    /// Cosmos SDK account and fee fields.
    Cosmos(CosmosTxInput),
    /// Bitcoin unspent outputs.
    Bitcoin(BitcoinTxInput),
}

impl TxInputPayload {
    /// Returns the driver family the payload belongs to.
    ///
    /// EVM payloads report [`Driver::Evm`] for both EVM drivers.
    #[must_use]
    pub const fn family(&self) -> Driver {
        match self {
            Self::Evm(_) => Driver::Evm,
            Self::Solana(_) => Driver::Solana,
            Self::Cosmos(_) => Driver::Cosmos,
            Self::Bitcoin(_) => Driver::Bitcoin,
        }
    }
}

/// An input for one transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Common fields.
    pub envelope: TxInputEnvelope,
    /// Chain fields.
    pub payload: TxInputPayload,
}

impl TxInput {
    /// Creates an input from its parts.
    #[must_use]
    pub const fn new(driver: Driver, gas_price: Amount, payload: TxInputPayload) -> Self {
        Self {
            envelope: TxInputEnvelope { driver, gas_price },
            payload,
        }
    }

    /// Creates an EVM fee-market input.
    #[must_use]
    pub const fn evm(payload: EvmTxInput) -> Self {
        Self::new(Driver::Evm, Amount::ZERO, TxInputPayload::Evm(payload))
    }

    /// Creates an EVM legacy input paying `gas_price` per gas.
    #[must_use]
    pub const fn evm_legacy(gas_price: Amount, payload: EvmTxInput) -> Self {
        Self::new(Driver::EvmLegacy, gas_price, TxInputPayload::Evm(payload))
    }

    /// Creates a Solana input.
    #[must_use]
    pub const fn solana(payload: SolanaTxInput) -> Self {
        Self::new(Driver::Solana, Amount::ZERO, TxInputPayload::Solana(payload))
    }

    /// Creates a Cosmos input.
    #[must_use]
    pub const fn cosmos(payload: CosmosTxInput) -> Self {
        Self::new(Driver::Cosmos, Amount::ZERO, TxInputPayload::Cosmos(payload))
    }

    /// Creates a Bitcoin input paying `sat_per_vbyte`.
    #[must_use]
    pub const fn bitcoin(sat_per_vbyte: Amount, payload: BitcoinTxInput) -> Self {
        Self::new(Driver::Bitcoin, sat_per_vbyte, TxInputPayload::Bitcoin(payload))
    }

    /// Returns the driver tag.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.envelope.driver
    }

    /// Returns the network gas price.
    #[must_use]
    pub const fn gas_price(&self) -> &Amount {
        &self.envelope.gas_price
    }

    /// Checks that the input was fetched for `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InputMismatch`] for any other driver.
    pub fn expect_driver(&self, expected: Driver) -> Result<(), BuildError> {
        if self.envelope.driver == expected {
            Ok(())
        } else {
            Err(BuildError::InputMismatch {
                expected,
                actual: self.envelope.driver,
            })
        }
    }

    /// Returns the EVM payload for an EVM driver.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InputMismatch`] on a tag or payload mismatch.
    pub fn as_evm(&self, expected: Driver) -> Result<&EvmTxInput, BuildError> {
        self.expect_driver(expected)?;
        match &self.payload {
            TxInputPayload::Evm(payload) => Ok(payload),
            other => Err(self.payload_mismatch(expected, other)),
        }
    }

    /// Returns the Solana payload.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InputMismatch`] on a tag or payload mismatch.
    pub fn as_solana(&self) -> Result<&SolanaTxInput, BuildError> {
        self.expect_driver(Driver::Solana)?;
        match &self.payload {
            TxInputPayload::Solana(payload) => Ok(payload),
            other => Err(self.payload_mismatch(Driver::Solana, other)),
        }
    }

    /// Returns the Cosmos payload.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InputMismatch`] on a tag or payload mismatch.
    pub fn as_cosmos(&self) -> Result<&CosmosTxInput, BuildError> {
        self.expect_driver(Driver::Cosmos)?;
        match &self.payload {
            TxInputPayload::Cosmos(payload) => Ok(payload),
            other => Err(self.payload_mismatch(Driver::Cosmos, other)),
        }
    }

    /// Returns the Bitcoin payload.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InputMismatch`] on a tag or payload mismatch.
    pub fn as_bitcoin(&self) -> Result<&BitcoinTxInput, BuildError> {
        self.expect_driver(Driver::Bitcoin)?;
        match &self.payload {
            TxInputPayload::Bitcoin(payload) => Ok(payload),
            other => Err(self.payload_mismatch(Driver::Bitcoin, other)),
        }
    }

    fn payload_mismatch(&self, expected: Driver, payload: &TxInputPayload) -> BuildError {
        tracing::error!(
            driver = %self.envelope.driver,
            payload = %payload.family(),
            "transaction input tag does not match its payload"
        );
        BuildError::InputMismatch {
            expected,
            actual: payload.family(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn evm_payload() -> EvmTxInput {
        EvmTxInput {
            nonce: 7,
            gas_limit: 21_000,
            ..EvmTxInput::default()
        }
    }

    #[test]
    fn test_accessor_checks_driver_tag() {
        let input = TxInput::evm(evm_payload());
        assert_eq!(input.as_evm(Driver::Evm).unwrap().nonce, 7);

        let err = input.as_evm(Driver::EvmLegacy).unwrap_err();
        assert_eq!(
            err,
            BuildError::InputMismatch {
                expected: Driver::EvmLegacy,
                actual: Driver::Evm,
            }
        );
        assert!(matches!(
            input.as_solana().unwrap_err(),
            BuildError::InputMismatch {
                expected: Driver::Solana,
                ..
            }
        ));
    }

    #[test]
    fn test_accessor_checks_payload_shape() {
        let input = TxInput::new(
            Driver::Bitcoin,
            Amount::ZERO,
            TxInputPayload::Evm(evm_payload()),
        );
        assert_eq!(
            input.as_bitcoin().unwrap_err(),
            BuildError::InputMismatch {
                expected: Driver::Bitcoin,
                actual: Driver::Evm,
            }
        );
    }

    #[test]
    fn test_serde_roundtrip_keeps_tag() {
        let input = TxInput::evm_legacy(Amount::from_u64(3_000_000_000), evm_payload());
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"driver\":\"evm_legacy\""));
        let back: TxInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
        assert_eq!(back.gas_price(), &Amount::from_u64(3_000_000_000));
    }
}
