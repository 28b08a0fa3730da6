//! EVM transaction builder.
//!
//! Every transfer path reduces to a call: a recipient, a native value and
//! calldata. The fee model then turns the call into a fee-market or legacy
//! transaction.
//!
//! | Path | Recipient | Value | Calldata |
//! |------|-----------|-------|----------|
//! | native | `to` | `amount` | empty |
//! | token | contract | 0 | `transfer(to, amount)` |
//! | task | task contract | `amount` or 0 | task signature and arguments |

use std::sync::Arc;

use alloy_consensus::TxEip1559;
use alloy_primitives::{Address, Bytes, TxKind, U256};

use crossgate_core::asset::{AssetDescriptor, TaskAsset, TaskValue};
use crossgate_core::error::BuildError;
use crossgate_core::{Amount, BuilderConfig, Driver};

use super::abi::{encode_call, encode_transfer_call};
use super::input::EvmTxInput;
use super::legacy::build_legacy;
use super::parse_address;
use super::tx::EvmTx;
use crate::builder::{token_contract, TxBuilder};
use crate::input::TxInput;
use crate::tx::Tx;

/// How the builder prices gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeModel {
    /// EIP-1559 priority fee and fee cap.
    FeeMarket,
    /// Single gas price.
    Legacy,
}

/// A call resolved from a transfer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EvmCall {
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
}

/// Builder for EVM chains.
#[derive(Debug, Clone)]
pub struct EvmBuilder {
    asset: Arc<AssetDescriptor>,
    config: BuilderConfig,
    fee_model: FeeModel,
}

impl EvmBuilder {
    /// Creates a fee-market builder.
    #[must_use]
    pub const fn new(asset: Arc<AssetDescriptor>, config: BuilderConfig) -> Self {
        Self {
            asset,
            config,
            fee_model: FeeModel::FeeMarket,
        }
    }

    /// Creates a legacy gas price builder.
    #[must_use]
    pub const fn legacy(asset: Arc<AssetDescriptor>, config: BuilderConfig) -> Self {
        Self {
            asset,
            config,
            fee_model: FeeModel::Legacy,
        }
    }

    /// Returns the fee model.
    #[must_use]
    pub const fn fee_model(&self) -> FeeModel {
        self.fee_model
    }

    fn build(&self, call: EvmCall, input: &TxInput) -> Result<Tx, BuildError> {
        let evm = input.as_evm(self.driver())?;
        let chain_id = if evm.chain_id == 0 {
            self.asset.chain().chain_id
        } else {
            evm.chain_id
        };
        let fee_denom = self.asset.chain().chain_coin.clone();

        let tx = match self.fee_model {
            FeeModel::FeeMarket => EvmTx::eip1559(
                self.fee_market_tx(call, evm, chain_id)?,
                fee_denom,
            ),
            FeeModel::Legacy => EvmTx::legacy(
                build_legacy(call, evm, chain_id, input.gas_price())?,
                fee_denom,
            ),
        };
        Ok(Tx::Evm(tx))
    }

    fn fee_market_tx(
        &self,
        call: EvmCall,
        input: &EvmTxInput,
        chain_id: u64,
    ) -> Result<TxEip1559, BuildError> {
        let ceiling = self.asset.chain().max_tip_ceiling(&self.config);
        let tip = clamp_tip(&input.gas_tip_cap, &ceiling);
        if tip != input.gas_tip_cap {
            tracing::debug!(
                chain = %self.asset.chain().chain,
                requested = %input.gas_tip_cap,
                ceiling = %ceiling,
                "clamping priority fee to ceiling"
            );
        }
        // The client's fee cap is never raised.
        let fee_cap = input.gas_fee_cap;
        let tip = clamp_tip(&tip, &fee_cap);

        Ok(TxEip1559 {
            chain_id,
            nonce: input.nonce,
            gas_limit: input.gas_limit,
            max_fee_per_gas: wei_per_gas("gas_fee_cap", &fee_cap)?,
            max_priority_fee_per_gas: wei_per_gas("gas_tip_cap", &tip)?,
            to: TxKind::Call(call.to),
            value: call.value,
            access_list: Default::default(),
            input: call.input,
        })
    }

    fn recipient(to: &crossgate_core::Address) -> Result<Address, BuildError> {
        parse_address("to", to.as_str())
    }
}

/// Clamps a requested priority fee down to `ceiling`.
///
/// Requests at or below the ceiling are returned unchanged.
#[must_use]
pub fn clamp_tip(requested: &Amount, ceiling: &Amount) -> Amount {
    if requested > ceiling {
        *ceiling
    } else {
        *requested
    }
}

/// Narrows a per-gas price to the 128 bits transactions carry.
pub(crate) fn wei_per_gas(field: &str, price: &Amount) -> Result<u128, BuildError> {
    price
        .to_u128()
        .ok_or_else(|| BuildError::invalid_input(field, format!("{price} exceeds 128 bits")))
}

impl TxBuilder for EvmBuilder {
    fn driver(&self) -> Driver {
        match self.fee_model {
            FeeModel::FeeMarket => Driver::Evm,
            FeeModel::Legacy => Driver::EvmLegacy,
        }
    }

    fn asset(&self) -> &AssetDescriptor {
        &self.asset
    }

    fn new_native_transfer(
        &self,
        _from: &crossgate_core::Address,
        to: &crossgate_core::Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let call = EvmCall {
            to: Self::recipient(to)?,
            value: *amount.as_u256(),
            input: Bytes::new(),
        };
        self.build(call, input)
    }

    fn new_token_transfer(
        &self,
        _from: &crossgate_core::Address,
        to: &crossgate_core::Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let contract = parse_address("contract", token_contract(&self.asset)?)?;
        let call = EvmCall {
            to: contract,
            value: U256::ZERO,
            input: encode_transfer_call(&Self::recipient(to)?, amount).into(),
        };
        self.build(call, input)
    }

    fn new_task_transfer(
        &self,
        task: &TaskAsset,
        _from: &crossgate_core::Address,
        to: &crossgate_core::Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        if task.contract.is_empty() {
            return Err(BuildError::missing_contract(task.id.clone()));
        }
        let contract = parse_address("contract", &task.contract)?;
        let data = encode_call(&task.signature, &task.args, &Self::recipient(to)?, amount)?;
        let value = match task.value {
            TaskValue::Amount => *amount.as_u256(),
            TaskValue::None => U256::ZERO,
        };
        tracing::debug!(task = %task.id, signature = %task.signature, "building task call");
        self.build(
            EvmCall {
                to: contract,
                value,
                input: data.into(),
            },
            input,
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use crossgate_core::asset::{ChainDescriptor, TaskArg, TokenAsset};
    use proptest::prelude::*;

    use super::*;
    use crate::evm::tx::EvmTxKind;
    use crate::evm::abi::TRANSFER_SELECTOR;
    use crate::tx::ChainTx;

    const FROM: &str = "0x0000000000000000000000000000000000000001";
    const TO: &str = "0x1234567890123456789012345678901234567890";
    const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    fn chain() -> ChainDescriptor {
        ChainDescriptor::new("ETH", Driver::Evm)
            .with_chain_id(1)
            .with_chain_coin("ETH")
            .with_decimals(18)
    }

    fn gwei(n: u64) -> Amount {
        Amount::gwei_to_wei(n)
    }

    fn input(tip: Amount, fee_cap: Amount) -> TxInput {
        TxInput::evm(EvmTxInput {
            nonce: 3,
            gas_limit: 60_000,
            gas_tip_cap: tip,
            gas_fee_cap: fee_cap,
            chain_id: 0,
        })
    }

    fn native_builder(chain: ChainDescriptor) -> EvmBuilder {
        EvmBuilder::new(
            Arc::new(AssetDescriptor::native(chain)),
            BuilderConfig::default(),
        )
    }

    fn fee_market(tx: &Tx) -> &TxEip1559 {
        match tx {
            Tx::Evm(evm) => match evm.kind() {
                EvmTxKind::Eip1559(inner) => inner,
                EvmTxKind::Legacy(_) => panic!("expected fee-market transaction"),
            },
            _ => panic!("expected EVM transaction"),
        }
    }

    fn transfer(builder: &EvmBuilder, amount: u64, input: &TxInput) -> Result<Tx, BuildError> {
        builder.new_transfer(
            &FROM.into(),
            &TO.into(),
            &Amount::from_u64(amount),
            input,
        )
    }

    // ------------------------------------------------------------------------
    // Tip capping
    // ------------------------------------------------------------------------

    #[test]
    fn test_tip_below_ceiling_is_unchanged() {
        let tx = transfer(&native_builder(chain()), 1, &input(gwei(2), gwei(40))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.max_priority_fee_per_gas, 2_000_000_000);
        assert_eq!(inner.max_fee_per_gas, 40_000_000_000);
    }

    #[test]
    fn test_tip_above_default_ceiling_is_clamped() {
        let tx = transfer(&native_builder(chain()), 1, &input(gwei(80), gwei(100))).unwrap();
        assert_eq!(fee_market(&tx).max_priority_fee_per_gas, 5_000_000_000);
    }

    #[test]
    fn test_chain_ceiling_overrides_default() {
        let builder = native_builder(chain().with_max_gas_price_gwei(20));
        let tx = transfer(&builder, 1, &input(gwei(30), gwei(100))).unwrap();
        assert_eq!(fee_market(&tx).max_priority_fee_per_gas, 20_000_000_000);

        let config = BuilderConfig::builder().default_max_tip_gwei(1).build();
        let builder = EvmBuilder::new(Arc::new(AssetDescriptor::native(chain())), config);
        let tx = transfer(&builder, 1, &input(gwei(30), gwei(100))).unwrap();
        assert_eq!(fee_market(&tx).max_priority_fee_per_gas, 1_000_000_000);
    }

    #[test]
    fn test_fee_cap_is_never_raised() {
        let tx = transfer(&native_builder(chain()), 1, &input(gwei(3), gwei(1))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.max_fee_per_gas, 1_000_000_000);
        assert_eq!(inner.max_priority_fee_per_gas, 1_000_000_000);

        // Above the ceiling and above the cap: the lower bound wins.
        let tx = transfer(&native_builder(chain()), 1, &input(gwei(80), gwei(4))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.max_fee_per_gas, 4_000_000_000);
        assert_eq!(inner.max_priority_fee_per_gas, 4_000_000_000);
    }

    proptest! {
        #[test]
        fn prop_clamp_never_exceeds_ceiling(requested in any::<u128>(), ceiling in any::<u128>()) {
            let clamped = clamp_tip(&Amount::from_u128(requested), &Amount::from_u128(ceiling));
            prop_assert_eq!(clamped, Amount::from_u128(requested.min(ceiling)));
        }
    }

    // ------------------------------------------------------------------------
    // Transfer paths
    // ------------------------------------------------------------------------

    #[test]
    fn test_native_transfer_sends_value() {
        let tx = transfer(&native_builder(chain()), 1_000, &input(gwei(1), gwei(2))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.to, TxKind::Call(TO.parse().unwrap()));
        assert_eq!(inner.value, U256::from(1_000u64));
        assert!(inner.input.is_empty());
        assert_eq!(inner.chain_id, 1);
        assert_eq!(inner.nonce, 3);
    }

    #[test]
    fn test_input_chain_id_wins() {
        let mut evm = input(gwei(1), gwei(2));
        if let crate::input::TxInputPayload::Evm(payload) = &mut evm.payload {
            payload.chain_id = 137;
        }
        let tx = transfer(&native_builder(chain()), 1, &evm).unwrap();
        assert_eq!(fee_market(&tx).chain_id, 137);
    }

    #[test]
    fn test_token_transfer_calls_contract() {
        let builder = EvmBuilder::new(
            Arc::new(AssetDescriptor::Token(TokenAsset::new("USDC", TOKEN, 6, chain()))),
            BuilderConfig::default(),
        );
        let tx = transfer(&builder, 1_000_000, &input(gwei(1), gwei(2))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.to, TxKind::Call(TOKEN.parse().unwrap()));
        assert_eq!(inner.value, U256::ZERO);
        assert_eq!(inner.input.len(), 68);
        assert_eq!(inner.input[..4], TRANSFER_SELECTOR);
        assert_eq!(inner.input[16..36], hex::decode(&TO[2..]).unwrap()[..]);
    }

    #[test]
    fn test_token_without_contract_fails() {
        let builder = EvmBuilder::new(
            Arc::new(AssetDescriptor::Token(TokenAsset::new("USDC", "", 6, chain()))),
            BuilderConfig::default(),
        );
        let err = transfer(&builder, 1, &input(gwei(1), gwei(2))).unwrap_err();
        assert!(matches!(err, BuildError::MissingContract { .. }));
    }

    #[test]
    fn test_task_transfer_encodes_call_with_value() {
        let task = TaskAsset {
            id: "deposit".to_string(),
            contract: TOKEN.to_string(),
            signature: "deposit(address,uint256)".to_string(),
            args: vec![TaskArg::Destination, TaskArg::Amount],
            value: TaskValue::Amount,
            decimals: None,
            chain: chain(),
        };
        let builder = EvmBuilder::new(
            Arc::new(AssetDescriptor::Task(task)),
            BuilderConfig::default(),
        );
        let tx = transfer(&builder, 77, &input(gwei(1), gwei(2))).unwrap();
        let inner = fee_market(&tx);
        assert_eq!(inner.to, TxKind::Call(TOKEN.parse().unwrap()));
        assert_eq!(inner.value, U256::from(77u64));
        assert_eq!(
            inner.input[..4],
            crate::evm::abi::selector("deposit(address,uint256)")
        );
        assert_eq!(inner.input[67], 77);
    }

    #[test]
    fn test_invalid_recipient_reports_length() {
        let err = native_builder(chain())
            .new_transfer(
                &FROM.into(),
                &"0x1234".into(),
                &Amount::from_u64(1),
                &input(gwei(1), gwei(2)),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid to: invalid length, expected 20, got 2"
        );
    }

    #[test]
    fn test_input_for_other_chain_is_rejected() {
        let legacy_input = TxInput::evm_legacy(gwei(1), EvmTxInput::default());
        let err = transfer(&native_builder(chain()), 1, &legacy_input).unwrap_err();
        assert_eq!(
            err,
            BuildError::InputMismatch {
                expected: Driver::Evm,
                actual: Driver::EvmLegacy,
            }
        );
    }

    // ------------------------------------------------------------------------
    // End to end
    // ------------------------------------------------------------------------

    #[test]
    fn test_signed_transfer_recovers_sender() {
        use crossgate_crypto::{Secp256k1Signer, Signer};

        let signer = Secp256k1Signer::for_driver(Driver::Evm);
        let key = signer.import_private_key(&format!("{:064x}", 1)).unwrap();

        let mut tx = transfer(&native_builder(chain()), 5, &input(gwei(1), gwei(2))).unwrap();
        let sighashes = tx.sighashes().unwrap();
        let signature = signer.sign(&key, &sighashes[0]).unwrap();
        tx.add_signatures(std::slice::from_ref(&signature)).unwrap();
        assert!(tx.is_signed());

        let bytes = signature.as_bytes();
        let recovered = k256::ecdsa::VerifyingKey::recover_from_prehash(
            sighashes[0].payload(),
            &k256::ecdsa::Signature::from_slice(&bytes[..64]).unwrap(),
            k256::ecdsa::RecoveryId::from_byte(bytes[64]).unwrap(),
        )
        .unwrap();
        assert_eq!(
            recovered.to_encoded_point(false).as_bytes(),
            signer.public_key(&key).unwrap().as_bytes()
        );
    }
}
