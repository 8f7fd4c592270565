use anchor_lang::prelude::*;
use solana_program::hash::hash;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke,
};
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount};
use crate::{
    error::StakingError,
    events::VaultLiquidated,
    state::RewardGateway,
};

/// Burn `debt_amount` of the debt token from the liquidator, then ask the
/// vault manager to liquidate `vault_id`.
///
/// The manager is invoked with `sha256("global:liquidate_vault")[..8] ||
/// vault_id (LE)` and the remaining accounts, in order, as its account list.
/// Its errors abort the whole instruction, burn included. The forwarded
/// accounts name the collateral recipient, which is the liquidator.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, LiquidateVault<'info>>,
    vault_id: u64,
    debt_amount: u64,
) -> Result<()> {
    require!(debt_amount > 0, StakingError::ZeroAmount);

    token::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.debt_mint.to_account_info(),
                from: ctx.accounts.liquidator_debt.to_account_info(),
                authority: ctx.accounts.liquidator.to_account_info(),
            },
        ),
        debt_amount,
    )?;

    let mut data = hash(b"global:liquidate_vault").to_bytes()[..8].to_vec();
    data.extend_from_slice(&vault_id.to_le_bytes());

    let accounts = ctx
        .remaining_accounts
        .iter()
        .map(|a| AccountMeta {
            pubkey: a.key(),
            is_signer: a.is_signer,
            is_writable: a.is_writable,
        })
        .collect();
    let ix = Instruction {
        program_id: ctx.accounts.vault_manager.key(),
        accounts,
        data,
    };

    let mut infos = ctx.remaining_accounts.to_vec();
    infos.push(ctx.accounts.vault_manager.to_account_info());
    invoke(&ix, &infos)?;

    emit!(VaultLiquidated {
        gateway: ctx.accounts.gateway.key(),
        liquidator: ctx.accounts.liquidator.key(),
        vault_id,
        debt_burned: debt_amount,
    });
    msg!("Vault liquidated: id={} debt_burned={}", vault_id, debt_amount);
    Ok(())
}

#[derive(Accounts)]
pub struct LiquidateVault<'info> {
    #[account(mut)]
    pub liquidator: Signer<'info>,

    #[account(has_one = debt_mint @ StakingError::MintMismatch)]
    pub gateway: Box<Account<'info, RewardGateway>>,

    #[account(mut)]
    pub debt_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = liquidator_debt.mint == debt_mint.key() @ StakingError::MintMismatch,
        constraint = liquidator_debt.owner == liquidator.key() @ StakingError::Unauthorized,
    )]
    pub liquidator_debt: Box<Account<'info, TokenAccount>>,

    /// CHECK: must be the configured vault manager program
    #[account(
        executable,
        address = gateway.vault_manager @ StakingError::Unauthorized,
    )]
    pub vault_manager: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}
