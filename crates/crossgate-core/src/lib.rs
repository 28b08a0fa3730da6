//! # crossgate-core
//!
//! Chain-independent building blocks for the crossgate transaction layer.
//!
//! Every chain driver depends on the types in this crate, and nothing in
//! it performs IO. All operations are pure functions over immutable values
//! and are safe to call from any number of threads.
//!
//! ## Modules
//!
//! - [`amount`] - 256-bit smallest-unit amounts with decimal conversion
//! - [`asset`] - Native, token and task asset descriptors
//! - [`ratio`] - Exact decimal ratios and transfer tax rates
//! - [`fee`] - Fee line items and transfer tax merging
//! - [`selector`] - Splitting an amount across ordered source accounts
//! - [`types`] - Drivers, addresses, hashes, digests and signatures
//! - [`config`] - Builder configuration with documented defaults
//! - [`error`] - Error types for every pipeline stage
//!
//! ## Example
//!
//! ```
//! use crossgate_core::selector::{select, SourceAccount};
//! use crossgate_core::fee::tax_on;
//! use crossgate_core::{Amount, TaxRate};
//!
//! let amount = Amount::parse_decimal("1.5", 6).unwrap();
//! let sources = vec![
//!     SourceAccount::new("acct-1", Amount::from_u64(1_000_000)),
//!     SourceAccount::new("acct-2", Amount::from_u64(1_000_000)),
//! ];
//! let split = select(&sources, &amount).unwrap();
//! assert_eq!(split.len(), 2);
//!
//! let tax = tax_on(&amount, &TaxRate::from_f64(0.01).unwrap()).unwrap();
//! assert_eq!(tax, Amount::from_u64(15_000));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod amount;
pub mod asset;
pub mod config;
pub mod error;
pub mod fee;
pub mod ratio;
pub mod selector;
pub mod types;

pub use alloy_primitives::U256;
pub use amount::Amount;
pub use asset::{
    AssetDescriptor, ChainDescriptor, NativeAsset, TaskArg, TaskAsset, TaskValue, TokenAsset,
    UnrecognizedAsset,
};
pub use config::BuilderConfig;
pub use error::{
    AmountError, BuildError, ClientError, ConfigError, CrossgateError, ErrorKind, SelectError,
    SignError, TxError,
};
pub use fee::FeeEntry;
pub use ratio::{DecimalRatio, TaxRate};
pub use selector::{SourceAccount, SourceAmount};
pub use types::{Address, Driver, PublicKey, TxDataToSign, TxHash, TxSignature};
