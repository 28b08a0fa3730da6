//! Builder registry for runtime driver lookup.
//!
//! [`BuilderRegistry`] maps each [`Driver`] to a constructor producing the
//! builder for one asset. Construction is cheap: a builder only holds the
//! shared descriptor and a copy of the builder configuration.
//!
//! ```
//! use std::sync::Arc;
//!
//! use crossgate_chain::BuilderRegistry;
//! use crossgate_core::{AssetDescriptor, BuilderConfig, ChainDescriptor, Driver};
//!
//! let registry = BuilderRegistry::new();
//! assert!(registry.supports(Driver::Solana));
//!
//! let asset = Arc::new(AssetDescriptor::native(ChainDescriptor::new("SOL", Driver::Solana)));
//! let builder = registry.builder_for(asset, &BuilderConfig::default()).unwrap();
//! assert_eq!(builder.driver(), Driver::Solana);
//! ```
//!
//! The registry clones cheaply (`Arc` internally) and can be shared across
//! tasks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::BuildError;
use crossgate_core::{BuilderConfig, Driver};

use crate::bitcoin::BitcoinBuilder;
use crate::builder::TxBuilder;
use crate::cosmos::CosmosBuilder;
use crate::evm::EvmBuilder;
use crate::solana::SolanaBuilder;

/// Constructs the builder for one asset.
pub type BuilderFactory = fn(Arc<AssetDescriptor>, &BuilderConfig) -> Arc<dyn TxBuilder>;

/// Registry of builder constructors keyed by driver.
#[derive(Clone)]
pub struct BuilderRegistry {
    factories: Arc<HashMap<Driver, BuilderFactory>>,
}

impl BuilderRegistry {
    /// Creates a registry with every supported driver.
    ///
    /// ```
    /// use crossgate_chain::BuilderRegistry;
    ///
    /// assert_eq!(BuilderRegistry::new().len(), 5);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut factories: HashMap<Driver, BuilderFactory> = HashMap::new();
        factories.insert(Driver::Evm, |asset, config| {
            Arc::new(EvmBuilder::new(asset, *config))
        });
        factories.insert(Driver::EvmLegacy, |asset, config| {
            Arc::new(EvmBuilder::legacy(asset, *config))
        });
        factories.insert(Driver::Solana, |asset, _| Arc::new(SolanaBuilder::new(asset)));
        factories.insert(Driver::Cosmos, |asset, _| Arc::new(CosmosBuilder::new(asset)));
        factories.insert(Driver::Bitcoin, |asset, _| Arc::new(BitcoinBuilder::new(asset)));

        Self {
            factories: Arc::new(factories),
        }
    }

    /// Creates a registry without drivers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: Arc::new(HashMap::new()),
        }
    }

    /// Registers a constructor, replacing any previous one for `driver`.
    pub fn register(&mut self, driver: Driver, factory: BuilderFactory) {
        Arc::make_mut(&mut self.factories).insert(driver, factory);
    }

    /// Returns the constructor for `driver`.
    #[must_use]
    pub fn get(&self, driver: Driver) -> Option<BuilderFactory> {
        self.factories.get(&driver).copied()
    }

    /// Builds the builder for `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the asset's driver is not registered.
    pub fn builder_for(
        &self,
        asset: Arc<AssetDescriptor>,
        config: &BuilderConfig,
    ) -> Result<Arc<dyn TxBuilder>, BuildError> {
        let driver = asset.driver();
        let factory = self.get(driver).ok_or_else(|| {
            tracing::warn!(%driver, asset = %asset.id(), "no builder registered for driver");
            BuildError::unsupported(format!("no builder for {driver} chains"))
        })?;
        Ok(factory(asset, config))
    }

    /// Returns `true` if `driver` has a constructor.
    #[must_use]
    pub fn supports(&self, driver: Driver) -> bool {
        self.factories.contains_key(&driver)
    }

    /// Returns the registered drivers, sorted by name.
    #[must_use]
    pub fn supported_drivers(&self) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self.factories.keys().copied().collect();
        drivers.sort_by_key(|driver| driver.as_str());
        drivers
    }

    /// Returns the number of registered drivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no driver is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("drivers", &self.supported_drivers())
            .finish()
    }
}
