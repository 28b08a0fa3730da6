//! # crossgate
//!
//! One transaction interface over EVM, Solana, Cosmos SDK and Bitcoin chains.
//!
//! This crate ties the workspace together for applications:
//!
//! - [`config`] - `crossgate.toml` loading, validation and defaults
//! - [`logging`] - `tracing` subscriber setup
//! - [`factory`] - builders, signers and addresses per configured asset
//! - [`transfer`] - the fetch, build, sign and submit pipeline
//!
//! The member crates are re-exported for callers that only depend on this one.
//!
//! ## Example
//!
//! ```no_run
//! use crossgate::config::ConfigLoader;
//! use crossgate::transfer::{self, TransferRequest};
//! use crossgate::crossgate_chain::Client;
//! use crossgate::crossgate_core::{Amount, CrossgateError};
//! use crossgate::crossgate_crypto::SecretKey;
//! use crossgate::Factory;
//!
//! async fn send(client: &dyn Client, key: &SecretKey) -> Result<(), CrossgateError> {
//!     let config = ConfigLoader::with_base_dir("/etc/crossgate").load()?;
//!     let factory = Factory::new(config)?;
//!
//!     let builder = factory.new_builder("ETH")?;
//!     let signer = factory.new_signer("ETH")?;
//!     let from = factory.address_for_key("ETH", key)?;
//!
//!     let request = TransferRequest::new(
//!         from,
//!         "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF".into(),
//!         Amount::from_u64(1_000),
//!     );
//!     let hash = transfer::execute(client, builder.as_ref(), signer.as_ref(), key, &request).await?;
//!     let info = transfer::confirm(client, &hash).await?;
//!     println!("{hash}: {:?}", info.status);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod factory;
pub mod logging;
pub mod transfer;

pub use crossgate_chain;
pub use crossgate_core;
pub use crossgate_crypto;

pub use config::{Config, ConfigLoader};
pub use factory::Factory;
pub use logging::{init_logging, LogConfig, LogFormat, LogGuard, LogLevel};
pub use transfer::TransferRequest;
