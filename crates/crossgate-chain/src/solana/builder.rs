//! Solana transaction builder.

use std::sync::Arc;

use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;

use crossgate_core::asset::AssetDescriptor;
use crossgate_core::error::BuildError;
use crossgate_core::selector::select;
use crossgate_core::{Address, Amount, Driver};

use super::input::SolanaTxInput;
use super::instruction::{
    create_associated_token_account_idempotent, system_transfer, transfer_checked,
};
use super::tx::SolanaTx;
use super::{associated_token_address, parse_block_hash, parse_pubkey, TOKEN_PROGRAM_ID};
use crate::builder::{token_contract, TxBuilder};
use crate::input::TxInput;
use crate::tx::Tx;

/// Builder for Solana.
#[derive(Debug, Clone)]
pub struct SolanaBuilder {
    asset: Arc<AssetDescriptor>,
}

impl SolanaBuilder {
    /// Creates a builder. Solana fees are not configurable.
    #[must_use]
    pub const fn new(asset: Arc<AssetDescriptor>) -> Self {
        Self { asset }
    }

    fn finish(
        instructions: &[Instruction],
        from: &Pubkey,
        input: &SolanaTxInput,
    ) -> Result<Tx, BuildError> {
        let fee_payer = match input.fee_payer.as_deref() {
            Some(payer) if !payer.is_empty() => parse_pubkey("fee_payer", payer)?,
            _ => *from,
        };
        let block_hash = parse_block_hash(&input.recent_block_hash)?;
        let message = Message::new_with_blockhash(instructions, Some(&fee_payer), &block_hash);
        Ok(Tx::Solana(SolanaTx::new(message)))
    }

    fn token_instructions(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        amount: &Amount,
        input: &SolanaTxInput,
    ) -> Result<Vec<Instruction>, BuildError> {
        let mint = parse_pubkey("contract", token_contract(&self.asset)?)?;
        let token_program = match input.token_program.as_deref() {
            Some(program) if !program.is_empty() => parse_pubkey("token_program", program)?,
            _ => TOKEN_PROGRAM_ID,
        };
        let decimals = u8::try_from(self.asset.decimals())
            .map_err(|_| BuildError::invalid_input("decimals", "token decimals exceed 255"))?;

        let mut instructions = Vec::new();
        let destination = if input.to_is_ata {
            *to
        } else {
            let account = associated_token_address(to, &mint, &token_program);
            if input.should_create_ata {
                instructions.push(create_associated_token_account_idempotent(
                    from,
                    &account,
                    to,
                    &mint,
                    &token_program,
                ));
            }
            account
        };

        if input.source_token_accounts.len() <= 1 {
            let source = match input.source_token_accounts.first() {
                Some(source) => {
                    reject_multisig(input, &source.account)?;
                    parse_pubkey("source_token_account", &source.account)?
                }
                None => associated_token_address(from, &mint, &token_program),
            };
            instructions.push(transfer_checked(
                &token_program,
                &source,
                &mint,
                &destination,
                from,
                lamports(amount)?,
                decimals,
            ));
            return Ok(instructions);
        }

        let selected = select(&input.source_token_accounts, amount)?;
        tracing::debug!(
            sources = input.source_token_accounts.len(),
            selected = selected.len(),
            %amount,
            "splitting token transfer across source accounts"
        );
        for part in selected {
            reject_multisig(input, &part.account)?;
            let source = parse_pubkey("source_token_account", &part.account)?;
            instructions.push(transfer_checked(
                &token_program,
                &source,
                &mint,
                &destination,
                from,
                lamports(&part.amount)?,
                decimals,
            ));
        }
        Ok(instructions)
    }
}

fn reject_multisig(input: &SolanaTxInput, account: &str) -> Result<(), BuildError> {
    if input.is_multisig_source(account) {
        return Err(BuildError::unsupported(format!(
            "multisig source token account {account}"
        )));
    }
    Ok(())
}

fn lamports(amount: &Amount) -> Result<u64, BuildError> {
    amount
        .to_u64()
        .ok_or_else(|| BuildError::invalid_input("amount", format!("{amount} exceeds 64 bits")))
}

impl TxBuilder for SolanaBuilder {
    fn driver(&self) -> Driver {
        Driver::Solana
    }

    fn asset(&self) -> &AssetDescriptor {
        &self.asset
    }

    fn new_native_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let solana = input.as_solana()?;
        let from = parse_pubkey("from", from.as_str())?;
        let to = parse_pubkey("to", to.as_str())?;
        let instruction = system_transfer(&from, &to, lamports(amount)?);
        Self::finish(&[instruction], &from, solana)
    }

    fn new_token_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: &Amount,
        input: &TxInput,
    ) -> Result<Tx, BuildError> {
        let solana = input.as_solana()?;
        let from = parse_pubkey("from", from.as_str())?;
        let to = parse_pubkey("to", to.as_str())?;
        let instructions = self.token_instructions(&from, &to, amount, solana)?;
        Self::finish(&instructions, &from, solana)
    }
}
