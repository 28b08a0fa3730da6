//! Asset descriptors.
//!
//! An [`AssetDescriptor`] says what is being moved and on which chain: the
//! chain's base coin, a fungible token behind a contract, or an opaque
//! contract call ("task"). Descriptors are loaded once from configuration and
//! shared read-only by builders, signers and clients.
//!
//! Descriptors whose `type` is not one of the known kinds still load, as
//! [`AssetDescriptor::Unrecognized`], so configuration written for other
//! versions does not fail outright. Builders route those by contract presence.
//!
//! ```
//! use crossgate_core::asset::{AssetDescriptor, ChainDescriptor, TokenAsset};
//! use crossgate_core::Driver;
//!
//! let chain = ChainDescriptor::new("SOL", Driver::Solana).with_decimals(9);
//! let usdc = AssetDescriptor::Token(TokenAsset::new(
//!     "USDC",
//!     "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
//!     6,
//!     chain,
//! ));
//! assert_eq!(usdc.id(), "USDC.SOL");
//! assert_eq!(usdc.decimals(), 6);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::BuilderConfig;
use crate::error::AmountError;
use crate::ratio::{DecimalRatio, TaxRate};
use crate::types::Driver;

// ============================================================================
// ChainDescriptor
// ============================================================================

/// Chain-level parameters shared by every asset on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// Chain identifier, such as `ETH` or `XPLA`.
    pub chain: String,
    /// Driver handling this chain.
    pub driver: Driver,
    /// Numeric chain id (EVM).
    #[serde(default)]
    pub chain_id: u64,
    /// Textual chain id (Cosmos).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain_id_str: String,
    /// Bech32 human-readable prefix (Cosmos).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain_prefix: String,
    /// Base coin denomination (Cosmos).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain_coin: String,
    /// Alternate gas-paying denomination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_coin: Option<String>,
    /// Decimals of the base coin.
    #[serde(default)]
    pub decimals: u32,
    /// Transfer tax charged on transfers of the base coin.
    #[serde(default)]
    pub transfer_tax: TaxRate,
    /// Multiplier applied to network gas price estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_multiplier: Option<DecimalRatio>,
    /// Priority fee ceiling in gwei, overriding the builder default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas_price_gwei: Option<u64>,
    /// BIP-44 coin type used for key derivation; 60 marks Ethereum-style keys.
    #[serde(default)]
    pub hd_path: u32,
    /// Network name (`mainnet`, `testnet`, `signet`, `regtest`).
    #[serde(default = "default_network")]
    pub network: String,
}

fn default_network() -> String {
    "mainnet".to_string()
}

/// BIP-44 coin type for Ethereum-style keys.
pub const ETHEREUM_COIN_TYPE: u32 = 60;

impl ChainDescriptor {
    /// Creates a descriptor with default parameters.
    #[must_use]
    pub fn new(chain: impl Into<String>, driver: Driver) -> Self {
        Self {
            chain: chain.into(),
            driver,
            chain_id: 0,
            chain_id_str: String::new(),
            chain_prefix: String::new(),
            chain_coin: String::new(),
            gas_coin: None,
            decimals: 0,
            transfer_tax: TaxRate::ZERO,
            gas_multiplier: None,
            max_gas_price_gwei: None,
            hd_path: 0,
            network: default_network(),
        }
    }

    /// Sets the numeric chain id.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the textual chain id.
    #[must_use]
    pub fn with_chain_id_str(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id_str = chain_id.into();
        self
    }

    /// Sets the bech32 prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chain_prefix = prefix.into();
        self
    }

    /// Sets the base coin denomination.
    #[must_use]
    pub fn with_chain_coin(mut self, coin: impl Into<String>) -> Self {
        self.chain_coin = coin.into();
        self
    }

    /// Sets the alternate gas denomination.
    #[must_use]
    pub fn with_gas_coin(mut self, coin: impl Into<String>) -> Self {
        self.gas_coin = Some(coin.into());
        self
    }

    /// Sets the base coin decimals.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Sets the transfer tax.
    #[must_use]
    pub fn with_transfer_tax(mut self, rate: TaxRate) -> Self {
        self.transfer_tax = rate;
        self
    }

    /// Sets the gas multiplier.
    #[must_use]
    pub fn with_gas_multiplier(mut self, multiplier: DecimalRatio) -> Self {
        self.gas_multiplier = Some(multiplier);
        self
    }

    /// Sets the priority fee ceiling in gwei.
    #[must_use]
    pub fn with_max_gas_price_gwei(mut self, gwei: u64) -> Self {
        self.max_gas_price_gwei = Some(gwei);
        self
    }

    /// Sets the BIP-44 coin type.
    #[must_use]
    pub fn with_hd_path(mut self, hd_path: u32) -> Self {
        self.hd_path = hd_path;
        self
    }

    /// Sets the network name.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Returns the priority fee ceiling in wei.
    ///
    /// The chain's own ceiling wins; otherwise the builder default applies.
    #[must_use]
    pub fn max_tip_ceiling(&self, config: &BuilderConfig) -> Amount {
        let gwei = self
            .max_gas_price_gwei
            .filter(|gwei| *gwei > 0)
            .unwrap_or(config.default_max_tip_gwei);
        Amount::gwei_to_wei(gwei)
    }

    /// Applies the gas multiplier to a network gas price estimate.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the scaled price exceeds 256 bits.
    pub fn adjust_gas_price(&self, price: &Amount) -> Result<Amount, AmountError> {
        match self.gas_multiplier {
            Some(multiplier) if !multiplier.is_zero() => multiplier.mul_floor(price),
            _ => Ok(*price),
        }
    }

    /// Returns `true` for chains using Ethereum-style secp256k1 keys.
    #[must_use]
    pub const fn uses_ethereum_keys(&self) -> bool {
        self.hd_path == ETHEREUM_COIN_TYPE
    }
}

// ============================================================================
// Asset variants
// ============================================================================

/// The chain's base coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAsset {
    /// Chain parameters.
    pub chain: ChainDescriptor,
}

/// A fungible token behind a contract, mint or denom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAsset {
    /// Identifier; derived from symbol and chain when empty.
    pub id: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Contract address, mint address or bank denom.
    pub contract: String,
    /// Token decimals.
    pub decimals: u32,
    /// Chain parameters.
    pub chain: ChainDescriptor,
}

impl TokenAsset {
    /// Creates a token descriptor.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        contract: impl Into<String>,
        decimals: u32,
        chain: ChainDescriptor,
    ) -> Self {
        Self {
            id: String::new(),
            symbol: symbol.into(),
            contract: contract.into(),
            decimals,
            chain,
        }
    }
}

/// An opaque contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAsset {
    /// Identifier of the task.
    pub id: String,
    /// Contract receiving the call.
    pub contract: String,
    /// Canonical method signature, for example `deposit(address,uint256)`.
    pub signature: String,
    /// Call arguments in order.
    pub args: Vec<TaskArg>,
    /// Whether the transfer amount is attached as native value.
    pub value: TaskValue,
    /// Decimals of the amount argument; the chain's when absent.
    pub decimals: Option<u32>,
    /// Chain parameters.
    pub chain: ChainDescriptor,
}

/// A descriptor whose `type` is not a known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedAsset {
    /// The unrecognized `type` value.
    pub kind: String,
    /// Identifier.
    pub id: String,
    /// Contract address, possibly empty.
    pub contract: String,
    /// Decimals; the chain's when absent.
    pub decimals: Option<u32>,
    /// Chain parameters.
    pub chain: ChainDescriptor,
}

/// One argument of a task call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskArg {
    /// The transfer destination.
    Destination,
    /// The transfer amount.
    Amount,
    /// A fixed address.
    Address(String),
    /// A fixed unsigned integer, decimal text.
    Uint(String),
    /// A fixed boolean.
    Bool(bool),
    /// A fixed 32-byte word, hex text.
    Bytes32(String),
}

impl fmt::Display for TaskArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination => f.write_str("destination"),
            Self::Amount => f.write_str("amount"),
            Self::Address(address) => write!(f, "address:{address}"),
            Self::Uint(value) => write!(f, "uint:{value}"),
            Self::Bool(value) => write!(f, "bool:{value}"),
            Self::Bytes32(value) => write!(f, "bytes32:{value}"),
        }
    }
}

impl FromStr for TaskArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "destination" => Ok(Self::Destination),
            None if s == "amount" => Ok(Self::Amount),
            Some(("address", value)) => Ok(Self::Address(value.to_string())),
            Some(("uint", value)) => Ok(Self::Uint(value.to_string())),
            Some(("bool", value)) => value
                .parse()
                .map(Self::Bool)
                .map_err(|_| format!("invalid bool task argument '{value}'")),
            Some(("bytes32", value)) => Ok(Self::Bytes32(value.to_string())),
            _ => Err(format!("unknown task argument '{s}'")),
        }
    }
}

impl Serialize for TaskArg {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskArg {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Native value attached to a task call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskValue {
    /// No native value.
    #[default]
    None,
    /// The transfer amount.
    Amount,
}

// ============================================================================
// AssetDescriptor
// ============================================================================

/// What is being transferred, and on which chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAsset", into = "RawAsset")]
pub enum AssetDescriptor {
    /// The chain's base coin.
    Native(NativeAsset),
    /// A fungible token.
    Token(TokenAsset),
    /// A contract call.
    Task(TaskAsset),
    /// A descriptor of unknown kind.
    Unrecognized(UnrecognizedAsset),
}

impl AssetDescriptor {
    /// Creates a native asset descriptor.
    #[must_use]
    pub const fn native(chain: ChainDescriptor) -> Self {
        Self::Native(NativeAsset { chain })
    }

    /// Returns the chain parameters.
    #[must_use]
    pub const fn chain(&self) -> &ChainDescriptor {
        match self {
            Self::Native(asset) => &asset.chain,
            Self::Token(asset) => &asset.chain,
            Self::Task(asset) => &asset.chain,
            Self::Unrecognized(asset) => &asset.chain,
        }
    }

    /// Returns the driver of the asset's chain.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.chain().driver
    }

    /// Returns the asset identifier.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Native(asset) => asset.chain.chain.clone(),
            Self::Token(asset) if asset.id.is_empty() => {
                format!("{}.{}", asset.symbol, asset.chain.chain)
            }
            Self::Token(asset) => asset.id.clone(),
            Self::Task(asset) => asset.id.clone(),
            Self::Unrecognized(asset) => asset.id.clone(),
        }
    }

    /// Returns the decimals of amounts for this asset.
    #[must_use]
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Native(asset) => asset.chain.decimals,
            Self::Token(asset) => asset.decimals,
            Self::Task(asset) => asset.decimals.unwrap_or(asset.chain.decimals),
            Self::Unrecognized(asset) => asset.decimals.unwrap_or(asset.chain.decimals),
        }
    }

    /// Returns the contract address, or `None` when absent or empty.
    #[must_use]
    pub fn contract(&self) -> Option<&str> {
        let contract = match self {
            Self::Native(_) => return None,
            Self::Token(asset) => &asset.contract,
            Self::Task(asset) => &asset.contract,
            Self::Unrecognized(asset) => &asset.contract,
        };
        Some(contract.as_str()).filter(|c| !c.is_empty())
    }

    /// Returns the chain's transfer tax.
    #[must_use]
    pub const fn transfer_tax(&self) -> &TaxRate {
        &self.chain().transfer_tax
    }

    /// Returns the denomination gas is paid in.
    #[must_use]
    pub fn gas_denom(&self) -> &str {
        let chain = self.chain();
        chain
            .gas_coin
            .as_deref()
            .filter(|coin| !coin.is_empty())
            .unwrap_or(&chain.chain_coin)
    }

    /// Returns the descriptor kind as configured.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Native(_) => "native",
            Self::Token(_) => "token",
            Self::Task(_) => "task",
            Self::Unrecognized(asset) => &asset.kind,
        }
    }
}

/// Flat on-disk shape of an asset descriptor.
#[derive(Serialize, Deserialize)]
struct RawAsset {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    symbol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    contract: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    signature: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<TaskArg>,
    #[serde(default)]
    value: TaskValue,
    chain: ChainDescriptor,
}

impl TryFrom<RawAsset> for AssetDescriptor {
    type Error = String;

    fn try_from(raw: RawAsset) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_str() {
            "native" => Self::Native(NativeAsset { chain: raw.chain }),
            "token" => Self::Token(TokenAsset {
                id: raw.id,
                symbol: raw.symbol,
                contract: raw.contract,
                decimals: raw.decimals.unwrap_or(raw.chain.decimals),
                chain: raw.chain,
            }),
            "task" => {
                if raw.signature.is_empty() {
                    return Err(format!("task asset '{}' has no method signature", raw.id));
                }
                Self::Task(TaskAsset {
                    id: raw.id,
                    contract: raw.contract,
                    signature: raw.signature,
                    args: raw.args,
                    value: raw.value,
                    decimals: raw.decimals,
                    chain: raw.chain,
                })
            }
            _ => Self::Unrecognized(UnrecognizedAsset {
                kind: raw.kind,
                id: raw.id,
                contract: raw.contract,
                decimals: raw.decimals,
                chain: raw.chain,
            }),
        })
    }
}

impl From<AssetDescriptor> for RawAsset {
    fn from(asset: AssetDescriptor) -> Self {
        let mut raw = Self {
            kind: asset.kind().to_string(),
            id: String::new(),
            symbol: String::new(),
            contract: String::new(),
            decimals: None,
            signature: String::new(),
            args: Vec::new(),
            value: TaskValue::None,
            chain: asset.chain().clone(),
        };
        match asset {
            AssetDescriptor::Native(_) => {}
            AssetDescriptor::Token(token) => {
                raw.id = token.id;
                raw.symbol = token.symbol;
                raw.contract = token.contract;
                raw.decimals = Some(token.decimals);
            }
            AssetDescriptor::Task(task) => {
                raw.id = task.id;
                raw.contract = task.contract;
                raw.signature = task.signature;
                raw.args = task.args;
                raw.value = task.value;
                raw.decimals = task.decimals;
            }
            AssetDescriptor::Unrecognized(other) => {
                raw.id = other.id;
                raw.contract = other.contract;
                raw.decimals = other.decimals;
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use super::*;

    fn xpla() -> ChainDescriptor {
        ChainDescriptor::new("XPLA", Driver::Cosmos)
            .with_prefix("xpla")
            .with_chain_coin("axpla")
            .with_decimals(18)
    }

    // ------------------------------------------------------------------------
    // ChainDescriptor
    // ------------------------------------------------------------------------

    #[test]
    fn test_tip_ceiling_defaults_to_builder_config() {
        let chain = ChainDescriptor::new("ETH", Driver::Evm);
        assert_eq!(
            chain.max_tip_ceiling(&BuilderConfig::default()),
            Amount::from_u64(5_000_000_000)
        );
    }

    #[test]
    fn test_tip_ceiling_chain_override() {
        let chain = ChainDescriptor::new("ETH", Driver::Evm).with_max_gas_price_gwei(30);
        assert_eq!(
            chain.max_tip_ceiling(&BuilderConfig::default()),
            Amount::gwei_to_wei(30)
        );
    }

    #[test]
    fn test_adjust_gas_price() {
        let chain = ChainDescriptor::new("ETH", Driver::Evm);
        let price = Amount::from_u64(1_000);
        assert_eq!(chain.adjust_gas_price(&price).unwrap(), price);

        let chain = chain.with_gas_multiplier("1.25".parse().unwrap());
        assert_eq!(
            chain.adjust_gas_price(&price).unwrap(),
            Amount::from_u64(1_250)
        );
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[test]
    fn test_gas_denom_prefers_gas_coin() {
        let native = AssetDescriptor::native(xpla());
        assert_eq!(native.gas_denom(), "axpla");

        let native = AssetDescriptor::native(xpla().with_gas_coin("uusd"));
        assert_eq!(native.gas_denom(), "uusd");
    }

    #[test]
    fn test_contract_is_none_when_empty() {
        let token = AssetDescriptor::Token(TokenAsset::new("USDC", "", 6, xpla()));
        assert!(token.contract().is_none());
        assert!(AssetDescriptor::native(xpla()).contract().is_none());
    }

    #[test]
    fn test_decimals_fall_back_to_chain() {
        let other = AssetDescriptor::Unrecognized(UnrecognizedAsset {
            kind: "wrapped".to_string(),
            id: "W".to_string(),
            contract: String::new(),
            decimals: None,
            chain: xpla(),
        });
        assert_eq!(other.decimals(), 18);
        assert_eq!(other.kind(), "wrapped");
    }

    // ------------------------------------------------------------------------
    // Serde
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_token_from_toml() {
        let asset: AssetDescriptor = toml::from_str(
            r#"
            type = "token"
            symbol = "USDC"
            contract = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
            decimals = 6

            [chain]
            chain = "ETH"
            driver = "evm"
            chain_id = 1
            decimals = 18
            "#,
        )
        .unwrap();

        let AssetDescriptor::Token(token) = &asset else {
            panic!("expected token, got {asset:?}");
        };
        assert_eq!(token.decimals, 6);
        assert_eq!(asset.id(), "USDC.ETH");
        assert_eq!(asset.chain().network, "mainnet");
    }

    #[test]
    fn test_unknown_type_loads_as_unrecognized() {
        let asset: AssetDescriptor = serde_json::from_str(
            r#"{"type":"lp_token","id":"LP","contract":"0xabc",
                "chain":{"chain":"ETH","driver":"evm"}}"#,
        )
        .unwrap();
        assert!(matches!(asset, AssetDescriptor::Unrecognized(_)));
        assert_eq!(asset.contract(), Some("0xabc"));
    }

    #[test]
    fn test_task_requires_signature() {
        let result: Result<AssetDescriptor, _> = serde_json::from_str(
            r#"{"type":"task","id":"wrap","contract":"0xabc",
                "chain":{"chain":"ETH","driver":"evm"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_task_serde_round_trip() {
        let task = AssetDescriptor::Task(TaskAsset {
            id: "WETH.wrap".to_string(),
            contract: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
            signature: "deposit()".to_string(),
            args: vec![TaskArg::Destination, TaskArg::Bool(true)],
            value: TaskValue::Amount,
            decimals: None,
            chain: ChainDescriptor::new("ETH", Driver::Evm).with_decimals(18),
        });
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"bool:true\""));
        let parsed: AssetDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_task_arg_parse() {
        assert_eq!("amount".parse::<TaskArg>().unwrap(), TaskArg::Amount);
        assert_eq!(
            "uint:42".parse::<TaskArg>().unwrap(),
            TaskArg::Uint("42".to_string())
        );
        assert!("bool:maybe".parse::<TaskArg>().is_err());
        assert!("tuple:1".parse::<TaskArg>().is_err());
    }
}
