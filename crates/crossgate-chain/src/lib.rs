//! # crossgate-chain
//!
//! Per-chain transaction construction behind one driver-independent contract.
//!
//! A transfer runs through the same lifecycle on every chain:
//!
//! 1. a [`Client`] fetches a [`TxInput`] for the sender and recipient
//! 2. a [`TxBuilder`] turns it into an unsigned [`Tx`]
//! 3. the caller signs every digest from [`ChainTx::sighashes`]
//! 4. [`ChainTx::add_signatures`] completes the transaction
//! 5. the [`Client`] submits it and reports its [`TxInfo`]
//!
//! ## Drivers
//!
//! | Driver | Module | Native | Token | Task |
//! |--------|--------|--------|-------|------|
//! | `evm` | [`evm`] | value transfer | `transfer(address,uint256)` | contract call |
//! | `evm_legacy` | [`evm`] | value transfer | `transfer(address,uint256)` | contract call |
//! | `solana` | [`solana`] | system transfer | SPL `TransferChecked` | - |
//! | `cosmos` | [`cosmos`] | `MsgSend` | `MsgSend` or CW20 `transfer` | - |
//! | `bitcoin` | [`bitcoin`] | P2WPKH spend | - | - |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use crossgate_chain::evm::EvmTxInput;
//! use crossgate_chain::{BuilderRegistry, ChainTx, TxInput, TxState};
//! use crossgate_core::{Address, Amount, AssetDescriptor, BuilderConfig, ChainDescriptor, Driver};
//!
//! let chain = ChainDescriptor::new("ETH", Driver::Evm).with_chain_id(1).with_chain_coin("ETH");
//! let asset = Arc::new(AssetDescriptor::native(chain));
//! let builder = BuilderRegistry::new()
//!     .builder_for(asset, &BuilderConfig::default())
//!     .unwrap();
//!
//! let input = TxInput::evm(EvmTxInput { gas_limit: 21_000, ..EvmTxInput::default() });
//! let tx = builder
//!     .new_transfer(
//!         &Address::new("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"),
//!         &Address::new("0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"),
//!         &Amount::from_u64(1),
//!         &input,
//!     )
//!     .unwrap();
//! assert_eq!(tx.state(), TxState::Unsigned);
//! assert_eq!(tx.sighashes().unwrap().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod bitcoin;
pub mod builder;
pub mod client;
pub mod cosmos;
pub mod evm;
pub mod input;
pub mod registry;
pub mod solana;
pub mod tx;

pub use address::derive_address;
pub use builder::{route, TransferRoute, TxBuilder};
pub use client::{Client, TxInfo, TxStatus};
pub use input::{TxInput, TxInputEnvelope, TxInputPayload};
pub use registry::{BuilderFactory, BuilderRegistry};
pub use tx::{ChainTx, Tx, TxState};
