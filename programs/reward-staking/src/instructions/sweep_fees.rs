use anchor_lang::prelude::*;
use anchor_spl::token::Token;
use crate::{
    constants::*,
    error::StakingError,
    ledger,
    state::{RewardGateway, StakingPool},
};
use super::fees::RouterPull;

/// Forward everything the router holds into the pool.
///
/// Lamports on the gateway authority PDA go to the pool account. Each
/// `(router_token_account, pool_reward_vault)` pair in the remaining accounts
/// moves its whole balance; the router account must belong to the gateway
/// authority and carry a managed mint, but need not be its associated token
/// account. Balances the pool would ignore (zero, or nothing locked) stay
/// with the router. Permissionless.
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, SweepFees<'info>>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let pull = RouterPull::collect(
        &ctx.accounts.pool,
        &pool_key,
        &ctx.accounts.gateway,
        ctx.accounts.gateway_authority.to_account_info(),
        ctx.remaining_accounts,
        false,
    )?;
    ledger::book_inflows(&mut ctx.accounts.pool, &pull.inflows())?;
    let swept = pull.execute(
        pool_key,
        &ctx.accounts.pool.to_account_info(),
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
    )?;

    msg!("Fees swept: {} asset(s) into pool {}", swept, pool_key);
    Ok(())
}

#[derive(Accounts)]
pub struct SweepFees<'info> {
    #[account(
        seeds = [GATEWAY_SEED, pool.key().as_ref()],
        bump = gateway.bump,
        has_one = pool,
    )]
    pub gateway: Box<Account<'info, RewardGateway>>,

    /// CHECK: PDA holding router lamports and owning router token accounts
    #[account(
        mut,
        seeds = [GATEWAY_AUTHORITY_SEED, gateway.key().as_ref()],
        bump = gateway.authority_bump,
    )]
    pub gateway_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = pool.reward_gateway == gateway_authority.key() @ StakingError::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
