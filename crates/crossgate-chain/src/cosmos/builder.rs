//! Cosmos SDK transaction builder.
//!
//! The fee always carries the gas fee, `floor(gas_limit * gas_price)` in the
//! gas denomination. Native and bank-denom transfers add the chain's
//! transfer tax in the transferred denomination; CW20 transfers do not.

use std::sync::Arc;

use prost::Message;

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::BuildError;
use crossgate_core::fee::{apply_transfer_tax, merge_fee};
use crossgate_core::{Address, Amount, Driver, FeeEntry};

use super::input::CosmosTxInput;
use super::proto::{
    Any, AuthInfo, Coin, Fee, ModeInfo, MsgExecuteContract, MsgSend, PubKey, SignDoc, SignerInfo,
    Single, TxBody, ETH_SECP256K1_PUBKEY_TYPE_URL, MSG_EXECUTE_CONTRACT_TYPE_URL,
    MSG_SEND_TYPE_URL, SECP256K1_PUBKEY_TYPE_URL, SIGN_MODE_DIRECT,
};
use super::tx::{CosmosTx, SignDigest};
use super::{is_cw20_contract, parse_account};
use crate::builder::{token_contract, TxBuilder};
use crate::input::TxInput;
use crate::tx::Tx;

/// Length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Builder for Cosmos SDK chains.
#[derive(Debug, Clone)]
pub struct CosmosBuilder {
    asset: Arc<AssetDescriptor>,
}

impl CosmosBuilder {
    /// Creates a builder.
    #[must_use]
    pub const fn new(asset: Arc<AssetDescriptor>) -> Self {
        Self { asset }
    }

    fn parse_addresses(&self, from: &Address, to: &Address) -> Result<(), BuildError> {
        let prefix = &self.asset.chain().chain_prefix;
        parse_account("from", from.as_str(), prefix)?;
        parse_account("to", to.as_str(), prefix)?;
        Ok(())
    }

    fn gas_fee(&self, input: &CosmosTxInput) -> Result<Vec<FeeEntry>, BuildError> {
        let gas = input.gas_price.mul_floor(&Amount::from_u64(input.gas_limit))?;
        Ok(merge_fee(Vec::new(), self.asset.gas_denom(), gas)?)
    }

    fn bank_send(
        &self,
        denom: &str,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let input = input.as_cosmos()?;
        self.parse_addresses(from, to)?;

        let send = MsgSend {
            from_address: from.as_str().to_string(),
            to_address: to.as_str().to_string(),
            amount: vec![coin(denom, amount)],
        };
        let fees = self.gas_fee(input)?;
        let fees = apply_transfer_tax(fees, denom, amount, self.asset.transfer_tax())?;
        self.finish(Any::pack(MSG_SEND_TYPE_URL, &send), fees, input)
    }

    fn cw20_transfer(
        &self,
        contract: &str,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let input = input.as_cosmos()?;
        self.parse_addresses(from, to)?;

        let call = serde_json::json!({
            "transfer": {
                "recipient": to.as_str(),
                "amount": amount.to_string(),
            }
        });
        let execute = MsgExecuteContract {
            sender: from.as_str().to_string(),
            contract: contract.to_string(),
            msg: serde_json::to_vec(&call)
                .map_err(|e| BuildError::encoding(format!("cw20 transfer message: {e}")))?,
            funds: Vec::new(),
        };
        let fees = self.gas_fee(input)?;
        self.finish(Any::pack(MSG_EXECUTE_CONTRACT_TYPE_URL, &execute), fees, input)
    }

    fn finish(
        &self,
        message: Any,
        fees: Vec<FeeEntry>,
        input: &CosmosTxInput,
    ) -> Result<Tx, BuildError> {
        let public_key = input.from_public_key.as_bytes();
        if public_key.len() != PUBLIC_KEY_LEN {
            return Err(BuildError::invalid_length(
                "from_public_key",
                PUBLIC_KEY_LEN,
                public_key.len(),
            ));
        }

        let chain = self.asset.chain();
        let (key_type_url, digest) = if chain.uses_ethereum_keys() {
            (ETH_SECP256K1_PUBKEY_TYPE_URL, SignDigest::Keccak256)
        } else {
            (SECP256K1_PUBKEY_TYPE_URL, SignDigest::Sha256)
        };

        let body = TxBody {
            messages: vec![message],
            memo: input.memo.clone(),
            timeout_height: input.timeout_height,
        };
        let auth_info = AuthInfo {
            signer_infos: vec![SignerInfo {
                public_key: Some(Any::pack(
                    key_type_url,
                    &PubKey {
                        key: public_key.to_vec(),
                    },
                )),
                mode_info: Some(ModeInfo {
                    single: Some(Single {
                        mode: SIGN_MODE_DIRECT,
                    }),
                }),
                sequence: input.sequence,
            }],
            fee: Some(Fee {
                amount: fees.iter().map(|fee| coin(&fee.denom, &fee.amount)).collect(),
                gas_limit: input.gas_limit,
                payer: String::new(),
                granter: String::new(),
            }),
        };
        let chain_id = if input.chain_id.is_empty() {
            chain.chain_id_str.clone()
        } else {
            input.chain_id.clone()
        };

        tracing::debug!(
            chain = %chain.chain,
            %chain_id,
            account_number = input.account_number,
            sequence = input.sequence,
            fee_entries = fees.len(),
            "built cosmos transaction"
        );

        let sign_doc = SignDoc {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
            chain_id,
            account_number: input.account_number,
        };
        Ok(Tx::Cosmos(CosmosTx::new(sign_doc, digest, fees)))
    }
}

fn coin(denom: &str, amount: &Amount) -> Coin {
    Coin {
        denom: denom.to_string(),
        amount: amount.to_string(),
    }
}

impl TxBuilder for CosmosBuilder {
    fn driver(&self) -> Driver {
        Driver::Cosmos
    }

    fn asset(&self) -> &AssetDescriptor {
        &self.asset
    }

    fn new_native_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let denom = self.asset.chain().chain_coin.clone();
        self.bank_send(&denom, from, to, amount, input)
    }

    fn new_token_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let contract = token_contract(&self.asset)?;
        if is_cw20_contract(contract, &self.asset.chain().chain_prefix) {
            self.cw20_transfer(contract, from, to, amount, input)
        } else {
            self.bank_send(contract, from, to, amount, input)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use crossgate_core::asset::{ChainDescriptor, TokenAsset};
    use crossgate_core::{DecimalRatio, PublicKey, TaxRate};
    use crossgate_crypto::{SecretKey, Secp256k1Signer, Signer};
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    use super::*;
    use crate::cosmos::proto::TxRaw;
    use crate::cosmos::{encode_account, CONTRACT_LEN};
    use crate::tx::{ChainTx, TxState};

    const KEY: &str = "0000000000000000000000000000000000000000000000000000000000000003";

    fn xpla(tax: f64) -> ChainDescriptor {
        ChainDescriptor::new("XPLA", Driver::Cosmos)
            .with_chain_id_str("dimension_37-1")
            .with_prefix("xpla")
            .with_chain_coin("axpla")
            .with_decimals(18)
            .with_hd_path(60)
            .with_transfer_tax(TaxRate::from_f64(tax).unwrap())
    }

    fn account(byte: u8) -> Address {
        Address::new(encode_account("xpla", &[byte; 20]).unwrap())
    }

    fn public_key() -> PublicKey {
        let key = SecretKey::from_hex(KEY).unwrap();
        Secp256k1Signer::new().public_key(&key).unwrap()
    }

    fn input() -> TxInput {
        TxInput::cosmos(CosmosTxInput {
            account_number: 12,
            sequence: 3,
            gas_limit: 100,
            gas_price: DecimalRatio::new(0, 0),
            from_public_key: public_key(),
            ..CosmosTxInput::default()
        })
    }

    fn build(chain: ChainDescriptor, amount: u64) -> CosmosTx {
        let builder = CosmosBuilder::new(Arc::new(AssetDescriptor::native(chain)));
        match builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(amount), &input())
            .unwrap()
        {
            Tx::Cosmos(tx) => tx,
            other => panic!("expected cosmos tx, got {other:?}"),
        }
    }

    fn body(tx: &CosmosTx) -> TxBody {
        TxBody::decode(tx.sign_doc().body_bytes.as_slice()).unwrap()
    }

    fn auth_info(tx: &CosmosTx) -> AuthInfo {
        AuthInfo::decode(tx.sign_doc().auth_info_bytes.as_slice()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Fees and transfer tax
    // ------------------------------------------------------------------------

    #[test]
    fn test_tax_merges_into_gas_denom() {
        let tx = build(xpla(0.05), 100);
        assert_eq!(tx.fees(), vec![FeeEntry::new("axpla", Amount::from_u64(5))]);
        let fee = auth_info(&tx).fee.unwrap();
        assert_eq!(fee.amount, vec![coin("axpla", &Amount::from_u64(5))]);
        assert_eq!(fee.gas_limit, 100);
    }

    #[test]
    fn test_tax_in_separate_denom_sorts() {
        let tx = build(xpla(0.05).with_gas_coin("uusd"), 100);
        let denoms: Vec<_> = tx.fees().into_iter().map(|fee| fee.denom).collect();
        assert_eq!(denoms, ["axpla", "uusd"]);
        assert_eq!(tx.fees()[0].amount, Amount::from_u64(5));
    }

    #[test]
    fn test_tax_flooring_to_zero_adds_nothing() {
        for rate in [0.005, 0.0] {
            let tx = build(xpla(rate), 100);
            assert_eq!(tx.fees(), vec![FeeEntry::new("axpla", Amount::ZERO)]);
        }
    }

    #[test]
    fn test_gas_fee_floors_fractional_price() {
        let builder = CosmosBuilder::new(Arc::new(AssetDescriptor::native(xpla(0.0))));
        let input = TxInput::cosmos(CosmosTxInput {
            gas_limit: 200_000,
            gas_price: "850000000000.5".parse().unwrap(),
            from_public_key: public_key(),
            ..CosmosTxInput::default()
        });
        let Tx::Cosmos(tx) = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1), &input)
            .unwrap()
        else {
            panic!("expected cosmos tx");
        };
        assert_eq!(
            tx.fees(),
            vec![FeeEntry::new("axpla", Amount::from_u64(170_000_000_000_100_000))]
        );
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    #[test]
    fn test_native_transfer_is_bank_send() {
        let tx = build(xpla(0.0), 100);
        let body = body(&tx);
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].type_url, MSG_SEND_TYPE_URL);
        let send = MsgSend::decode(body.messages[0].value.as_slice()).unwrap();
        assert_eq!(send.from_address, account(1).as_str());
        assert_eq!(send.to_address, account(2).as_str());
        assert_eq!(send.amount, vec![coin("axpla", &Amount::from_u64(100))]);
        assert_eq!(tx.sign_doc().chain_id, "dimension_37-1");
        assert_eq!(tx.sign_doc().account_number, 12);
    }

    #[test]
    fn test_bank_denom_token_pays_tax_in_denom() {
        let asset = AssetDescriptor::Token(TokenAsset::new("USD", "uusd", 6, xpla(0.05)));
        let builder = CosmosBuilder::new(Arc::new(asset));
        let Tx::Cosmos(tx) = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1_000), &input())
            .unwrap()
        else {
            panic!("expected cosmos tx");
        };
        let send = MsgSend::decode(body(&tx).messages[0].value.as_slice()).unwrap();
        assert_eq!(send.amount[0].denom, "uusd");
        assert_eq!(
            tx.fees(),
            vec![
                FeeEntry::new("axpla", Amount::ZERO),
                FeeEntry::new("uusd", Amount::from_u64(50)),
            ]
        );
    }

    #[test]
    fn test_cw20_token_executes_contract_without_tax() {
        let contract = encode_account("xpla", &[9u8; CONTRACT_LEN]).unwrap();
        let asset = AssetDescriptor::Token(TokenAsset::new("CTX", &contract, 6, xpla(0.05)));
        let builder = CosmosBuilder::new(Arc::new(asset));
        let Tx::Cosmos(tx) = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1_000), &input())
            .unwrap()
        else {
            panic!("expected cosmos tx");
        };

        let message = &body(&tx).messages[0];
        assert_eq!(message.type_url, MSG_EXECUTE_CONTRACT_TYPE_URL);
        let execute = MsgExecuteContract::decode(message.value.as_slice()).unwrap();
        assert_eq!(execute.contract, contract);
        let call: serde_json::Value = serde_json::from_slice(&execute.msg).unwrap();
        assert_eq!(call["transfer"]["recipient"], account(2).as_str());
        assert_eq!(call["transfer"]["amount"], "1000");
        assert_eq!(tx.fees(), vec![FeeEntry::new("axpla", Amount::ZERO)]);
    }

    #[test]
    fn test_token_without_contract_fails() {
        let asset = AssetDescriptor::Token(TokenAsset::new("CTX", "", 6, xpla(0.0)));
        let builder = CosmosBuilder::new(Arc::new(asset));
        let err = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1), &input())
            .unwrap_err();
        assert_eq!(err.to_string(), "asset does not have a contract: CTX.XPLA");
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_rejects_foreign_prefix_and_bad_key() {
        let builder = CosmosBuilder::new(Arc::new(AssetDescriptor::native(xpla(0.0))));
        let foreign = Address::new(encode_account("cosmos", &[2u8; 20]).unwrap());
        assert!(matches!(
            builder.new_transfer(&account(1), &foreign, &Amount::from_u64(1), &input()),
            Err(BuildError::InvalidAddress { .. })
        ));

        let input = TxInput::cosmos(CosmosTxInput {
            from_public_key: PublicKey::new(vec![4u8; 65]),
            ..CosmosTxInput::default()
        });
        let err = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1), &input)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid from_public_key: invalid length, expected 33, got 65"
        );
    }

    #[test]
    fn test_key_type_follows_hd_path() {
        let eth_style = auth_info(&build(xpla(0.0), 1));
        let key = eth_style.signer_infos[0].public_key.as_ref().unwrap();
        assert_eq!(key.type_url, ETH_SECP256K1_PUBKEY_TYPE_URL);

        let standard = auth_info(&build(xpla(0.0).with_hd_path(118), 1));
        let key = standard.signer_infos[0].public_key.as_ref().unwrap();
        assert_eq!(key.type_url, SECP256K1_PUBKEY_TYPE_URL);
        assert_eq!(standard.signer_infos[0].sequence, 3);
    }

    #[test]
    fn test_input_chain_id_wins() {
        let builder = CosmosBuilder::new(Arc::new(AssetDescriptor::native(xpla(0.0))));
        let input = TxInput::cosmos(CosmosTxInput {
            chain_id: "cube_47-5".to_string(),
            from_public_key: public_key(),
            ..CosmosTxInput::default()
        });
        let Tx::Cosmos(tx) = builder
            .new_transfer(&account(1), &account(2), &Amount::from_u64(1), &input)
            .unwrap()
        else {
            panic!("expected cosmos tx");
        };
        assert_eq!(tx.sign_doc().chain_id, "cube_47-5");
    }

    #[test]
    fn test_signed_transaction_verifies() {
        let mut tx = Tx::Cosmos(build(xpla(0.0).with_hd_path(118), 10));
        let key = SecretKey::from_hex(KEY).unwrap();
        let sighashes = tx.sighashes().unwrap();
        let signature = Secp256k1Signer::new().sign(&key, &sighashes[0]).unwrap();
        tx.add_signatures(&[signature]).unwrap();
        assert_eq!(tx.state(), TxState::Signed);

        let raw = TxRaw::decode(tx.serialize().unwrap().as_slice()).unwrap();
        let verifying = k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key().as_bytes()).unwrap();
        let compact = k256::ecdsa::Signature::from_slice(&raw.signatures[0]).unwrap();
        verifying
            .verify_prehash(sighashes[0].payload(), &compact)
            .unwrap();
    }
}
