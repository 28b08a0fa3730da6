//! Error types for the crossgate transaction layer.
//!
//! Errors are organised by the pipeline stage that produces them:
//!
//! - [`AmountError`] - Decimal parsing and 256-bit arithmetic failures
//! - [`SelectError`] - Coin/account selection failures
//! - [`BuildError`] - Transaction construction failures
//! - [`TxError`] - Signature attachment, hashing and serialization failures
//! - [`SignError`] - Signing operation failures
//! - [`ClientError`] - Network boundary failures
//! - [`ConfigError`] - Configuration failures
//! - [`CrossgateError`] - Top-level error that wraps all of the above
//!
//! Every error is classified into an [`ErrorKind`], which tells callers
//! whether retrying can ever help. Only transport failures are retryable;
//! the core itself never retries.
//!
//! # Example
//!
//! ```rust
//! use crossgate_core::error::{BuildError, CrossgateError, ErrorKind};
//!
//! fn check_contract(contract: &str) -> Result<(), CrossgateError> {
//!     if contract.is_empty() {
//!         return Err(BuildError::missing_contract("USDC.SOL").into());
//!     }
//!     Ok(())
//! }
//!
//! let err = check_contract("").unwrap_err();
//! assert_eq!(ErrorKind::from(&err), ErrorKind::InputValidation);
//! assert!(!err.is_retryable());
//! ```

use std::fmt;

use crate::amount::Amount;
use crate::types::Driver;

/// Top-level error type for crossgate.
///
/// Wraps every domain-specific error with automatic conversion via `#[from]`.
/// Lower-stage errors are carried unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CrossgateError {
    /// Amount parsing or arithmetic failed.
    #[error("amount error: {0}")]
    Amount(#[from] AmountError),

    /// Source selection failed.
    #[error("selection error: {0}")]
    Select(#[from] SelectError),

    /// Transaction construction failed.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// Signature attachment or serialization failed.
    #[error("transaction error: {0}")]
    Tx(#[from] TxError),

    /// Signing failed.
    #[error("signing error: {0}")]
    Sign(#[from] SignError),

    /// The network client failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CrossgateError {
    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from(self)
    }

    /// Returns `true` if retrying the failed operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

// ============================================================================
// ErrorKind
// ============================================================================

/// Coarse classification of failures across the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed address, key, amount or missing descriptor field.
    InputValidation,
    /// The available balance cannot cover the requested amount.
    Insufficiency,
    /// A shape the system refuses to build (multisig source, unknown asset).
    Unsupported,
    /// The number of signatures does not match the number of digests.
    SignatureMismatch,
    /// A signature could not be produced or applied.
    Signing,
    /// The network boundary failed.
    Transport,
    /// Configuration could not be loaded or is invalid.
    Configuration,
    /// A wire format could not be produced.
    Encoding,
}

impl ErrorKind {
    /// Returns a short human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidation => "input validation",
            Self::Insufficiency => "insufficient balance",
            Self::Unsupported => "unsupported",
            Self::SignatureMismatch => "signature count mismatch",
            Self::Signing => "signing",
            Self::Transport => "transport",
            Self::Configuration => "configuration",
            Self::Encoding => "encoding",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SelectError> for ErrorKind {
    fn from(error: &SelectError) -> Self {
        match error {
            SelectError::InvalidAmount => Self::InputValidation,
            SelectError::Insufficient { .. } => Self::Insufficiency,
        }
    }
}

impl From<&BuildError> for ErrorKind {
    fn from(error: &BuildError) -> Self {
        match error {
            BuildError::InvalidAddress { .. }
            | BuildError::InvalidLength { .. }
            | BuildError::MissingContract { .. }
            | BuildError::InputMismatch { .. }
            | BuildError::InvalidInput { .. }
            | BuildError::Amount(_) => Self::InputValidation,
            BuildError::Select(inner) => Self::from(inner),
            BuildError::Unsupported { .. } => Self::Unsupported,
            BuildError::Encoding { .. } => Self::Encoding,
        }
    }
}

impl From<&TxError> for ErrorKind {
    fn from(error: &TxError) -> Self {
        match error {
            TxError::SignatureCount { .. } => Self::SignatureMismatch,
            TxError::NotSigned | TxError::InvalidSignature { .. } | TxError::UnknownSigner { .. } => {
                Self::Signing
            }
            TxError::Unsupported { .. } => Self::Unsupported,
            TxError::Encoding { .. } => Self::Encoding,
        }
    }
}

impl From<&CrossgateError> for ErrorKind {
    fn from(error: &CrossgateError) -> Self {
        match error {
            CrossgateError::Amount(_) => Self::InputValidation,
            CrossgateError::Select(inner) => Self::from(inner),
            CrossgateError::Build(inner) => Self::from(inner),
            CrossgateError::Tx(inner) => Self::from(inner),
            CrossgateError::Sign(SignError::InvalidKey | SignError::InvalidDigest { .. }) => {
                Self::InputValidation
            }
            CrossgateError::Sign(SignError::SignatureFailed { .. }) => Self::Signing,
            CrossgateError::Client(ClientError::Build(inner)) => Self::from(inner),
            CrossgateError::Client(ClientError::Tx(inner)) => Self::from(inner),
            CrossgateError::Client(ClientError::NotSigned) => Self::Signing,
            CrossgateError::Client(ClientError::Transport { .. }) => Self::Transport,
            CrossgateError::Client(ClientError::Rejected { .. }) => Self::InputValidation,
            CrossgateError::Config(_) => Self::Configuration,
        }
    }
}

// ============================================================================
// AmountError
// ============================================================================

/// Errors from decimal parsing and 256-bit arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The input is not a non-negative decimal number.
    #[error("invalid amount '{input}': expected a non-negative decimal number")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },

    /// The input carries more fractional digits than the asset supports.
    #[error("amount '{input}' has more than {decimals} fractional digits")]
    TooPrecise {
        /// The rejected input.
        input: String,
        /// The asset's decimal count.
        decimals: u32,
    },

    /// The value does not fit in 256 bits.
    #[error("amount overflow: {context}")]
    Overflow {
        /// What was being computed.
        context: String,
    },
}

impl AmountError {
    /// Create an invalid format error.
    #[must_use]
    pub fn invalid_format(input: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
        }
    }

    /// Create an overflow error.
    #[must_use]
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }
}

// ============================================================================
// SelectError
// ============================================================================

/// Errors from splitting an amount across source accounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// The requested amount is zero.
    #[error("requested amount must be greater than zero")]
    InvalidAmount,

    /// The sources together hold less than the requested amount.
    #[error("cannot send {requested}: source accounts hold {available} (short by {shortfall})")]
    Insufficient {
        /// The amount that was requested.
        requested: Amount,
        /// The total balance of all sources.
        available: Amount,
        /// `requested - available`.
        shortfall: Amount,
    },
}

// ============================================================================
// BuildError
// ============================================================================

/// Errors from building an unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An address could not be decoded.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A decoded address or key has the wrong size.
    #[error("invalid {field}: invalid length, expected {expected}, got {actual}")]
    InvalidLength {
        /// Which field was decoded.
        field: String,
        /// Required size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// A token-routed asset has no contract address.
    #[error("asset does not have a contract: {asset}")]
    MissingContract {
        /// The asset identifier.
        asset: String,
    },

    /// Source selection failed.
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Amount arithmetic failed.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The requested transaction shape is not supported.
    #[error("unsupported: {context}")]
    Unsupported {
        /// Description of the rejected shape.
        context: String,
    },

    /// The transaction input was produced for a different driver.
    #[error("transaction input mismatch: builder expects {expected}, input is for {actual}")]
    InputMismatch {
        /// Driver of the builder.
        expected: Driver,
        /// Driver tag carried by the input.
        actual: Driver,
    },

    /// A transaction input field is invalid.
    #[error("invalid input field '{field}': {reason}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The chain-native representation could not be encoded.
    #[error("encoding failed: {context}")]
    Encoding {
        /// What failed to encode.
        context: String,
    },
}

impl BuildError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid length error.
    #[must_use]
    pub fn invalid_length(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create a missing contract error.
    #[must_use]
    pub fn missing_contract(asset: impl Into<String>) -> Self {
        Self::MissingContract {
            asset: asset.into(),
        }
    }

    /// Create an unsupported shape error.
    #[must_use]
    pub fn unsupported(context: impl Into<String>) -> Self {
        Self::Unsupported {
            context: context.into(),
        }
    }

    /// Create an invalid input field error.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an encoding error.
    #[must_use]
    pub fn encoding(context: impl Into<String>) -> Self {
        Self::Encoding {
            context: context.into(),
        }
    }
}

// ============================================================================
// TxError
// ============================================================================

/// Errors from the transaction state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    /// The number of signatures does not match the number of digests.
    #[error("signature count mismatch: expected {expected}, got {actual}")]
    SignatureCount {
        /// Number of digests, or of signer slots.
        expected: usize,
        /// Number of signatures supplied.
        actual: usize,
    },

    /// The operation requires a fully signed transaction.
    #[error("transaction is not fully signed")]
    NotSigned,

    /// A signature could not be applied.
    #[error("invalid signature: {context}")]
    InvalidSignature {
        /// What was wrong with it.
        context: String,
    },

    /// A signature was offered for an account that is not a required signer.
    #[error("'{signer}' is not a required signer of this transaction")]
    UnknownSigner {
        /// The offered signer.
        signer: String,
    },

    /// The operation is not available for this chain.
    #[error("unsupported: {context}")]
    Unsupported {
        /// Description of the rejected operation.
        context: String,
    },

    /// Serialization failed.
    #[error("encoding failed: {context}")]
    Encoding {
        /// What failed to encode.
        context: String,
    },
}

impl TxError {
    /// Create an invalid signature error.
    #[must_use]
    pub fn invalid_signature(context: impl Into<String>) -> Self {
        Self::InvalidSignature {
            context: context.into(),
        }
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported(context: impl Into<String>) -> Self {
        Self::Unsupported {
            context: context.into(),
        }
    }

    /// Create an encoding error.
    #[must_use]
    pub fn encoding(context: impl Into<String>) -> Self {
        Self::Encoding {
            context: context.into(),
        }
    }
}

// ============================================================================
// SignError
// ============================================================================

/// Errors from signing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// Private key bytes are invalid for the curve.
    #[error("invalid private key")]
    InvalidKey,

    /// The digest has the wrong size for the signature scheme.
    #[error("invalid digest: expected {expected} bytes, got {actual}")]
    InvalidDigest {
        /// Required digest size.
        expected: usize,
        /// Supplied digest size.
        actual: usize,
    },

    /// The signing operation failed.
    #[error("signature failed: {context}")]
    SignatureFailed {
        /// What failed.
        context: String,
    },
}

impl SignError {
    /// Create a signature failed error.
    #[must_use]
    pub fn signature_failed(context: impl Into<String>) -> Self {
        Self::SignatureFailed {
            context: context.into(),
        }
    }
}

// ============================================================================
// ClientError
// ============================================================================

/// Errors surfaced at the network boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request did not reach the node, or the response was unreadable.
    #[error("transport error: {context}")]
    Transport {
        /// Description of the failure.
        context: String,
    },

    /// The node rejected the request.
    #[error("rejected by node: {reason}")]
    Rejected {
        /// The node's reason.
        reason: String,
    },

    /// Submission was attempted with a transaction that is not fully signed.
    #[error("only fully signed transactions can be submitted")]
    NotSigned,

    /// The fetched data could not be turned into a transaction input.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The transaction could not be serialized for submission.
    #[error(transparent)]
    Tx(#[from] TxError),
}

impl ClientError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
        }
    }

    /// Create a rejection error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// Reading or writing configuration failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed or serialized.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Parser message.
        context: String,
    },

    /// A configuration value is out of range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create a file not found error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an IO error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a parse failure error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    #[test]
    fn test_invalid_length_message_names_sizes() {
        let err = BuildError::invalid_length("from address", 32, 3);
        assert_eq!(
            err.to_string(),
            "invalid from address: invalid length, expected 32, got 3"
        );
    }

    #[test]
    fn test_missing_contract_message() {
        let err = BuildError::missing_contract("USDC.SOL");
        assert!(err.to_string().contains("asset does not have a contract"));
    }

    #[test]
    fn test_insufficient_message_reports_totals() {
        let err = SelectError::Insufficient {
            requested: Amount::from_u64(500),
            available: Amount::from_u64(300),
            shortfall: Amount::from_u64(200),
        };
        let message = err.to_string();
        assert!(message.contains("cannot send 500"));
        assert!(message.contains("300"));
        assert!(message.contains("short by 200"));
    }

    #[test]
    fn test_signature_count_message() {
        let err = TxError::SignatureCount {
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "signature count mismatch: expected 1, got 2"
        );
    }

    #[test]
    fn test_input_mismatch_names_both_drivers() {
        let err = BuildError::InputMismatch {
            expected: Driver::Solana,
            actual: Driver::Evm,
        };
        let message = err.to_string();
        assert!(message.contains("solana"));
        assert!(message.contains("evm"));
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    #[test]
    fn test_selector_insufficiency_survives_build_wrapping() {
        let select = SelectError::Insufficient {
            requested: Amount::from_u64(2),
            available: Amount::from_u64(1),
            shortfall: Amount::from_u64(1),
        };
        let err: CrossgateError = BuildError::from(select).into();
        assert_eq!(err.kind(), ErrorKind::Insufficiency);
    }

    #[test]
    fn test_only_transport_is_retryable() {
        let transport: CrossgateError = ClientError::transport("connection reset").into();
        assert!(transport.is_retryable());

        let rejected: CrossgateError = ClientError::rejected("nonce too low").into();
        assert!(!rejected.is_retryable());

        let count: CrossgateError = TxError::SignatureCount {
            expected: 1,
            actual: 0,
        }
        .into();
        assert!(!count.is_retryable());
        assert_eq!(count.kind(), ErrorKind::SignatureMismatch);
    }

    #[test]
    fn test_unsupported_classification() {
        let err: CrossgateError = BuildError::unsupported("multisig source").into();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.kind().to_string(), "unsupported");
    }

    #[test]
    fn test_config_error_io_keeps_source() {
        let err = ConfigError::io(
            "failed to read crossgate.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("failed to read crossgate.toml"));
    }
}
