use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::{
    error::StakingError,
    state::{FeeDrop, RewardGateway, StakingPool},
};
use super::{
    fees::{check_fee_vault, record_drop},
    payout::transfer_in,
};

/// Operator drops `amount` of any token straight from their own account into
/// the pool. Skipped, leaving the tokens with the operator, when nothing is
/// locked or `amount` is zero.
pub fn handler(ctx: Context<AirdropToken>, amount: u64) -> Result<()> {
    let mint = ctx.accounts.mint.key();
    if ctx.accounts.pool.classify_drop(&mint, amount) == FeeDrop::Ignored {
        msg!("Airdrop skipped: mint={} amount={} (nothing locked)", mint, amount);
        return Ok(());
    }

    let pool_key = ctx.accounts.pool.key();
    check_fee_vault(&ctx.accounts.pool, &pool_key, &mint, &ctx.accounts.vault)?;
    let vault = ctx.accounts.vault.key();
    record_drop(&mut ctx.accounts.pool, pool_key, mint, vault, amount)?;

    transfer_in(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.operator_token.to_account_info(),
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.operator.to_account_info(),
        amount,
    )
}

#[derive(Accounts)]
pub struct AirdropToken<'info> {
    pub operator: Signer<'info>,

    #[account(
        has_one = operator @ StakingError::Unauthorized,
        has_one = pool,
    )]
    pub gateway: Box<Account<'info, RewardGateway>>,

    #[account(
        mut,
        constraint = pool.reward_gateway == gateway.authority @ StakingError::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = operator_token.mint == mint.key() @ StakingError::MintMismatch,
        constraint = operator_token.owner == operator.key() @ StakingError::Unauthorized,
    )]
    pub operator_token: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
