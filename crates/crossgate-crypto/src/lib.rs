//! # crossgate-crypto
//!
//! Key handling and signing for the crossgate transaction layer.
//!
//! ## Modules
//!
//! - [`keys`] - Zeroizing secret key container
//! - [`keypair`] - secp256k1 and Ed25519 key pairs
//! - [`signer`] - The [`Signer`] trait and its per-curve implementations
//!
//! ## Supported Algorithms
//!
//! - ECDSA (secp256k1) - EVM chains, Cosmos SDK chains, Bitcoin
//! - `EdDSA` (Ed25519) - Solana
//!
//! ## Security
//!
//! - No unsafe code allowed
//! - Secret keys are zeroized on drop and never printed
//! - Secret key comparison is constant time

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod keypair;
pub mod keys;
pub mod signer;

pub use keypair::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, KeyPair, Secp256k1KeyPair,
    Secp256k1PublicKey, Secp256k1Signature,
};
pub use keys::{SecretKey, SECRET_KEY_LEN};
pub use signer::{signer_for, CurveType, Ed25519Signer, PublicKeyFormat, Secp256k1Signer, Signer};
