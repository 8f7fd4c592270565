use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{Token, TokenAccount};
use crate::{
    constants::*,
    error::StakingError,
    state::{FeeDrop, StakingPool},
};
use super::{
    fees::{check_fee_vault, record_drop},
    payout::transfer_in,
};

/// Router-only fee injection. `mint == NATIVE_MINT` moves lamports from the
/// router signer into the pool account; any other mint moves tokens from
/// `source` into the pool's vault for that mint. Ignored (not an error) when
/// the amount is zero or no share is locked.
pub fn handler(ctx: Context<DropFees>, mint: Pubkey, amount: u64) -> Result<()> {
    if ctx.accounts.pool.classify_drop(&mint, amount) == FeeDrop::Ignored {
        msg!("Fee drop ignored: mint={} amount={}", mint, amount);
        return Ok(());
    }
    let pool_key = ctx.accounts.pool.key();

    if mint == NATIVE_MINT {
        record_drop(&mut ctx.accounts.pool, pool_key, mint, NATIVE_MINT, amount)?;
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.router.to_account_info(),
                    to: ctx.accounts.pool.to_account_info(),
                },
            ),
            amount,
        )?;
        return Ok(());
    }

    let (Some(source), Some(vault)) = (ctx.accounts.source.as_deref(), ctx.accounts.vault.as_deref()) else {
        return err!(StakingError::InvalidRequest);
    };
    require_keys_eq!(source.mint, mint, StakingError::MintMismatch);
    check_fee_vault(&ctx.accounts.pool, &pool_key, &mint, vault)?;
    let (source, vault) = (source.to_account_info(), vault.to_account_info());

    record_drop(&mut ctx.accounts.pool, pool_key, mint, vault.key(), amount)?;
    transfer_in(
        &ctx.accounts.token_program.to_account_info(),
        &source,
        &vault,
        &ctx.accounts.router.to_account_info(),
        amount,
    )
}

#[derive(Accounts)]
pub struct DropFees<'info> {
    /// The configured reward gateway key
    #[account(mut)]
    pub router: Signer<'info>,

    #[account(
        mut,
        constraint = pool.reward_gateway == router.key() @ StakingError::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// Router-owned token account; omitted for native SOL
    #[account(mut)]
    pub source: Option<Box<Account<'info, TokenAccount>>>,

    /// Pool vault for the mint; omitted for native SOL
    #[account(mut)]
    pub vault: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
