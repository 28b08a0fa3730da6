//! Builder configuration.
//!
//! Values that would otherwise be process-wide constants are explicit fields
//! here, injected into each builder when it is constructed.

use serde::{Deserialize, Serialize};

/// Default ceiling for EIP-1559 priority fees, in gwei.
pub const DEFAULT_MAX_TIP_GWEI: u64 = 5;

/// Settings shared by every transaction builder.
///
/// # Example
///
/// ```
/// use crossgate_core::BuilderConfig;
///
/// let config = BuilderConfig::default();
/// assert_eq!(config.default_max_tip_gwei, 5);
///
/// let config = BuilderConfig::builder().default_max_tip_gwei(2).build();
/// assert_eq!(config.default_max_tip_gwei, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Priority fee ceiling in gwei used when an asset's chain sets none.
    pub default_max_tip_gwei: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_max_tip_gwei: DEFAULT_MAX_TIP_GWEI,
        }
    }
}

impl BuilderConfig {
    /// Starts a builder from the defaults.
    #[must_use]
    pub fn builder() -> BuilderConfigBuilder {
        BuilderConfigBuilder::default()
    }
}

/// Builder for [`BuilderConfig`].
#[derive(Debug, Clone, Default)]
pub struct BuilderConfigBuilder {
    config: BuilderConfig,
}

impl BuilderConfigBuilder {
    /// Sets the default priority fee ceiling in gwei.
    #[must_use]
    pub const fn default_max_tip_gwei(mut self, gwei: u64) -> Self {
        self.config.default_max_tip_gwei = gwei;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub const fn build(self) -> BuilderConfig {
        self.config
    }
}
