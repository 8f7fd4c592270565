use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::{
    constants::*,
    error::StakingError,
    events::RewardsClaimed,
    ledger,
    state::{Position, RewardGateway, StakerQueue, StakingPool},
};
use super::fees::{stake_router_pull, RouterPull};
use super::payout::{authority_seeds, pay_owed, secondary_pair, transfer_out};

/// Claim everything the position has accrued.
///
/// Reward tokens are paid for each `(pool_reward_vault, staker_token_account)`
/// pair in the remaining accounts; native SOL always. In Dual mode the
/// primary-asset payout is transferred to `staker_secondary`, or with
/// `compound` re-locked as secondary stake. Restarts the accrual window.
///
/// On a pool whose fees route through its gateway, the router's balances are
/// booked and pulled in before anything else; the remaining accounts then
/// start with one `(router_ata, pool_vault)` pair per managed mint.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
    compound: bool,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let staker_key = ctx.accounts.staker.key();

    let secondary = secondary_pair(
        &ctx.accounts.pool,
        &staker_key,
        &ctx.accounts.secondary_vault,
        &ctx.accounts.staker_secondary,
    )?
    .map(|(vault, user)| (vault.to_account_info(), user.to_account_info()));

    let pool_key = ctx.accounts.pool.key();
    let (router, payout_pairs) = stake_router_pull(
        &ctx.accounts.pool,
        &pool_key,
        &ctx.accounts.gateway,
        &ctx.accounts.gateway_authority,
        ctx.remaining_accounts,
    )?;
    let inflows = router.as_ref().map(RouterPull::inflows).unwrap_or_default();

    let before = ctx.accounts.position.secondary_amount;
    let primary_payout = ledger::claim(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.queue,
        &mut ctx.accounts.position,
        &inflows,
        compound,
        now,
    )?;
    let compounded = ctx.accounts.position.secondary_amount.saturating_sub(before);

    let token_program = ctx.accounts.token_program.to_account_info();
    let staker = ctx.accounts.staker.to_account_info();
    let pool_authority = ctx.accounts.pool_authority.to_account_info();

    if let Some(router) = router {
        router.execute(
            pool_key,
            &ctx.accounts.pool.to_account_info(),
            &token_program,
            &ctx.accounts.system_program.to_account_info(),
        )?;
    }

    let rewards = pay_owed(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.position,
        &staker,
        &pool_authority,
        &token_program,
        payout_pairs,
    )?;

    if let Some((vault, user)) = &secondary {
        let bump = [ctx.accounts.pool.authority_bump];
        let seeds = authority_seeds(&pool_key, &bump);
        transfer_out(&token_program, vault, user, &pool_authority, &seeds, primary_payout)?;
    }

    if primary_payout == 0 && compounded == 0 && rewards.is_empty() {
        msg!("No rewards to claim");
    } else {
        msg!(
            "Rewards claimed: primary={} compounded={} tokens={}",
            primary_payout, compounded, rewards.len()
        );
    }
    emit!(RewardsClaimed {
        pool: pool_key,
        owner: staker_key,
        primary: primary_payout.max(compounded),
        compounded: compounded > 0,
        rewards,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(mut)]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        mut,
        seeds = [QUEUE_SEED, pool.key().as_ref()],
        bump = pool.queue_bump,
        realloc = queue.space_for_push(queue.to_account_info().data_len()),
        realloc::payer = staker,
        realloc::zero = false,
    )]
    pub queue: Box<Account<'info, StakerQueue>>,

    /// CHECK: PDA vault authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == staker.key() @ StakingError::PositionMismatch,
        constraint = position.pool == pool.key() @ StakingError::PositionMismatch,
    )]
    pub position: Box<Account<'info, Position>>,

    /// Dual mode only
    #[account(mut)]
    pub secondary_vault: Option<Box<Account<'info, TokenAccount>>>,

    /// Dual mode only
    #[account(mut)]
    pub staker_secondary: Option<Box<Account<'info, TokenAccount>>>,

    /// Routed pools only
    pub gateway: Option<Box<Account<'info, RewardGateway>>>,

    /// CHECK: routed pools only; checked against the pool's reward gateway
    #[account(mut)]
    pub gateway_authority: Option<UncheckedAccount<'info>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
