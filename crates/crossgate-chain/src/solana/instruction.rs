//! Instruction encoding for transfers.
//!
//! | Instruction | Program | Data |
//! |-------------|---------|------|
//! | system transfer | system | `u32 LE 2`, `u64 LE lamports` |
//! | `TransferChecked` | token | `12`, `u64 LE amount`, `u8 decimals` |
//! | create idempotent | associated token | `1` |

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use super::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID};

/// System program tag of `Transfer`.
pub const SYSTEM_TRANSFER_TAG: u32 = 2;

/// Token program tag of `TransferChecked`.
pub const TRANSFER_CHECKED_TAG: u8 = 12;

/// Associated token program tag of `CreateIdempotent`.
pub const CREATE_IDEMPOTENT_TAG: u8 = 1;

/// Moves `lamports` from `from` to `to`.
#[must_use]
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction::new_with_bytes(
        SYSTEM_PROGRAM_ID,
        &data,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
    )
}

/// Moves `amount` of `mint` between token accounts, checking decimals.
#[must_use]
pub fn transfer_checked(
    token_program: &Pubkey,
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let mut data = Vec::with_capacity(10);
    data.push(TRANSFER_CHECKED_TAG);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    Instruction::new_with_bytes(
        *token_program,
        &data,
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
    )
}

/// Creates the associated token account of `owner` unless it exists.
#[must_use]
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    associated_account: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    Instruction::new_with_bytes(
        ASSOCIATED_TOKEN_PROGRAM_ID,
        &[CREATE_IDEMPOTENT_TAG],
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*associated_account, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
    )
}

/// Decodes the amount of a `TransferChecked` instruction's data.
#[must_use]
pub fn transfer_checked_amount(data: &[u8]) -> Option<u64> {
    match data {
        [TRANSFER_CHECKED_TAG, amount @ .., _decimals] => {
            <[u8; 8]>::try_from(amount).ok().map(u64::from_le_bytes)
        }
        _ => None,
    }
}
