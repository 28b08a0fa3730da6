//! Configuration file handling.
//!
//! Configuration lives in `crossgate.toml` under a base directory chosen by
//! the embedding application:
//!
//! ```toml
//! [builder]
//! default_max_tip_gwei = 5
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [[assets]]
//! type = "native"
//!
//! [assets.chain]
//! chain = "ETH"
//! driver = "evm"
//! chain_id = 1
//! chain_coin = "ETH"
//! decimals = 18
//! ```
//!
//! Every table is optional; missing values take their defaults.
//!
//! # Example
//!
//! ```no_run
//! use crossgate::config::ConfigLoader;
//!
//! let loader = ConfigLoader::with_base_dir("/etc/crossgate");
//! if !loader.exists() {
//!     loader.write_default().expect("write default config");
//! }
//! let config = loader.load().expect("load config");
//! assert!(config.builder.default_max_tip_gwei > 0);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::ConfigError;
use crossgate_core::BuilderConfig;

use crate::logging::LogConfig;

/// Name of the configuration file inside the base directory.
pub const CONFIG_FILE_NAME: &str = "crossgate.toml";

// ============================================================================
// Config
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings injected into every builder.
    pub builder: BuilderConfig,
    /// Subscriber settings.
    pub logging: LogConfig,
    /// Known assets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetDescriptor>,
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for malformed TOML and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::parse_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::parse_failed(format!("failed to serialize: {e}")))
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending asset for:
    /// - a transfer tax outside `[0, 1)`
    /// - a zero gas multiplier
    /// - an asset id used twice
    /// - a token or task without a contract
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for asset in &self.assets {
            let id = asset.id();
            let chain = asset.chain();

            if !chain.transfer_tax.ratio().is_below_one() {
                return Err(ConfigError::invalid_value(
                    format!("assets.{id}.chain.transfer_tax"),
                    format!("{} is not below 1", chain.transfer_tax),
                ));
            }
            if chain.gas_multiplier.is_some_and(|m| m.is_zero()) {
                return Err(ConfigError::invalid_value(
                    format!("assets.{id}.chain.gas_multiplier"),
                    "must be greater than zero",
                ));
            }
            let needs_contract = matches!(
                asset,
                AssetDescriptor::Token(_) | AssetDescriptor::Task(_)
            );
            if needs_contract && asset.contract().is_none() {
                return Err(ConfigError::invalid_value(
                    format!("assets.{id}.contract"),
                    format!("{} assets need a contract", asset.kind()),
                ));
            }
            if !seen.insert(id.clone()) {
                return Err(ConfigError::invalid_value(
                    "assets",
                    format!("duplicate asset id '{id}'"),
                ));
            }
        }
        Ok(())
    }

    /// Returns the asset with `id`.
    #[must_use]
    pub fn asset(&self, id: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|asset| asset.id() == id)
    }

    /// Returns the file written by [`ConfigLoader::write_default`].
    #[must_use]
    pub fn default_toml() -> String {
        r#"# crossgate configuration

[builder]
# Ceiling for EIP-1559 priority fees when an asset sets no max_gas_price_gwei.
default_max_tip_gwei = 5

[logging]
# trace | debug | info | warn | error, overridden by RUST_LOG
level = "info"
# pretty | json
format = "pretty"
include_target = true
include_timestamps = true

# Assets are declared as [[assets]] tables:
#
# [[assets]]
# type = "token"
# symbol = "USDC"
# contract = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
# decimals = 6
#
# [assets.chain]
# chain = "ETH"
# driver = "evm"
# chain_id = 1
# chain_coin = "ETH"
# decimals = 18
"#
        .to_string()
    }
}

// ============================================================================
// ConfigLoader
// ============================================================================

/// Reads and writes `crossgate.toml` in a base directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader rooted at `base_dir`.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Returns `true` if the configuration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    /// Loads the configuration, returning defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.exists() {
            tracing::debug!(path = %self.config_path().display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        self.read()
    }

    /// Loads the configuration, failing if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file is absent, otherwise
    /// the errors of [`ConfigLoader::load`].
    pub fn load_required(&self) -> Result<Config, ConfigError> {
        if !self.exists() {
            return Err(ConfigError::file_not_found(
                self.config_path().display().to_string(),
            ));
        }
        self.read()
    }

    /// Writes `config` to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or cannot be written.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.write(&config.to_toml_string()?)
    }

    /// Writes the commented default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        self.write(&Config::default_toml())
    }

    fn read(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::io(format!("failed to read {}", path.display()), e))?;
        let config = Config::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), assets = config.assets.len(), "loaded config");
        Ok(config)
    }

    fn write(&self, content: &str) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            ConfigError::io(format!("failed to create {}", self.base_dir.display()), e)
        })?;
        let path = self.config_path();
        std::fs::write(&path, content)
            .map_err(|e| ConfigError::io(format!("failed to write {}", path.display()), e))
    }
}
