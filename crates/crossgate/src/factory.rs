//! Asset lookup and component construction.
//!
//! A [`Factory`] owns a validated [`Config`] and hands out the per-asset
//! pieces of a transfer: the builder, the signer for the chain's curve and
//! the sender address derived from a key.
//!
//! ```
//! use crossgate::config::Config;
//! use crossgate::crossgate_chain::TxBuilder;
//! use crossgate::Factory;
//! use crossgate_core::{AssetDescriptor, ChainDescriptor, Driver};
//!
//! let config = Config {
//!     assets: vec![AssetDescriptor::native(
//!         ChainDescriptor::new("SOL", Driver::Solana).with_chain_coin("SOL"),
//!     )],
//!     ..Config::default()
//! };
//! let factory = Factory::new(config).unwrap();
//! let builder = factory.new_builder("SOL").unwrap();
//! assert_eq!(builder.driver(), Driver::Solana);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crossgate_chain::{derive_address, BuilderRegistry, TxBuilder};
use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::{ConfigError, CrossgateError};
use crossgate_core::{Address, PublicKey};
use crossgate_crypto::{signer_for, SecretKey, Signer};

use crate::config::Config;

/// Creates builders, signers and addresses for configured assets.
#[derive(Debug, Clone)]
pub struct Factory {
    config: Config,
    assets: HashMap<String, Arc<AssetDescriptor>>,
    registry: BuilderRegistry,
}

impl Factory {
    /// Creates a factory over every driver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_registry(config, BuilderRegistry::new())
    }

    /// Creates a factory resolving builders through `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration is invalid.
    pub fn with_registry(config: Config, registry: BuilderRegistry) -> Result<Self, ConfigError> {
        config.validate()?;
        let assets = config
            .assets
            .iter()
            .map(|asset| (asset.id(), Arc::new(asset.clone())))
            .collect();
        Ok(Self {
            config,
            assets,
            registry,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the ids of the configured assets, sorted.
    #[must_use]
    pub fn asset_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the asset with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown id.
    pub fn asset(&self, id: &str) -> Result<Arc<AssetDescriptor>, ConfigError> {
        self.assets
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::invalid_value("asset", format!("unknown asset '{id}'")))
    }

    /// Creates the builder for asset `id`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown id or an unregistered driver.
    pub fn new_builder(&self, id: &str) -> Result<Arc<dyn TxBuilder>, CrossgateError> {
        let asset = self.asset(id)?;
        Ok(self.registry.builder_for(asset, &self.config.builder)?)
    }

    /// Creates the signer for the curve of asset `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown id.
    pub fn new_signer(&self, id: &str) -> Result<Box<dyn Signer>, ConfigError> {
        Ok(signer_for(self.asset(id)?.driver()))
    }

    /// Derives the address of `public_key` on the chain of asset `id`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown id or a key of the wrong shape.
    pub fn derive_address(&self, id: &str, public_key: &PublicKey) -> Result<Address, CrossgateError> {
        let asset = self.asset(id)?;
        Ok(derive_address(&asset, public_key)?)
    }

    /// Derives the address controlled by `key` on the chain of asset `id`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown id or a key invalid on the chain's curve.
    pub fn address_for_key(&self, id: &str, key: &SecretKey) -> Result<Address, CrossgateError> {
        let public_key = self.new_signer(id)?.public_key(key)?;
        self.derive_address(id, &public_key)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use crossgate_core::asset::TokenAsset;
    use crossgate_core::{ChainDescriptor, Driver};
    use crossgate_crypto::CurveType;

    use super::*;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn config() -> Config {
        Config {
            assets: vec![
                AssetDescriptor::native(
                    ChainDescriptor::new("ETH", Driver::Evm)
                        .with_chain_id(1)
                        .with_chain_coin("ETH"),
                ),
                AssetDescriptor::native(ChainDescriptor::new("BTC", Driver::Bitcoin)),
                AssetDescriptor::native(ChainDescriptor::new("SOL", Driver::Solana)),
                AssetDescriptor::Token(TokenAsset {
                    id: String::new(),
                    symbol: "USDC".to_string(),
                    contract: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
                    decimals: 6,
                    chain: ChainDescriptor::new("ETH", Driver::Evm).with_chain_id(1),
                }),
            ],
            ..Config::default()
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let factory = Factory::new(config()).unwrap();
        assert_eq!(factory.asset_ids(), vec!["BTC", "ETH", "SOL", "USDC.ETH"]);
        assert_eq!(factory.asset("USDC.ETH").unwrap().decimals(), 6);

        let err = factory.asset("DOGE").unwrap_err();
        assert_eq!(err.to_string(), "invalid value for 'asset': unknown asset 'DOGE'");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = config();
        config.assets.push(config.assets[0].clone());
        assert!(matches!(
            Factory::new(config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_builders_follow_driver() {
        let factory = Factory::new(config()).unwrap();
        assert_eq!(factory.new_builder("BTC").unwrap().driver(), Driver::Bitcoin);
        let token = factory.new_builder("USDC.ETH").unwrap();
        assert_eq!(token.asset().contract(), Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
    }

    #[test]
    fn test_empty_registry_surfaces_unsupported() {
        let factory = Factory::with_registry(config(), BuilderRegistry::empty()).unwrap();
        let err = factory.new_builder("ETH").err().unwrap();
        assert!(matches!(err, CrossgateError::Build(_)));
        assert_eq!(err.kind(), crossgate_core::ErrorKind::Unsupported);
    }

    #[test]
    fn test_signer_follows_curve() {
        let factory = Factory::new(config()).unwrap();
        assert_eq!(factory.new_signer("SOL").unwrap().curve(), CurveType::Ed25519);
        assert_eq!(factory.new_signer("ETH").unwrap().curve(), CurveType::Secp256k1);
    }

    #[test]
    fn test_address_for_key() {
        let factory = Factory::new(config()).unwrap();
        let key = SecretKey::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            factory.address_for_key("ETH", &key).unwrap().as_str(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        assert_eq!(
            factory.address_for_key("BTC", &key).unwrap().as_str(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }
}
