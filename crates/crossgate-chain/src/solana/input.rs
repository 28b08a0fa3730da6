//! Solana transaction input.

use serde::{Deserialize, Serialize};

use crossgate_core::SourceAccount;

/// Block reference and token account data for a Solana transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolanaTxInput {
    /// Base58 recent block hash; empty leaves the zero hash.
    pub recent_block_hash: String,
    /// The destination is already a token account, not a wallet.
    pub to_is_ata: bool,
    /// The destination's associated token account must be created first.
    pub should_create_ata: bool,
    /// Token accounts of the sender holding the mint, in priority order.
    pub source_token_accounts: Vec<SourceAccount<String>>,
    /// Token program owning the mint; SPL Token when absent.
    pub token_program: Option<String>,
    /// Account paying fees; the sender when absent.
    pub fee_payer: Option<String>,
    /// Source accounts known to be owned by a multisig.
    pub multisig_sources: Vec<String>,
}

impl SolanaTxInput {
    /// Returns `true` if `account` is owned by a multisig.
    #[must_use]
    pub fn is_multisig_source(&self, account: &str) -> bool {
        self.multisig_sources.iter().any(|source| source == account)
    }
}
