use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::{
    constants::*,
    error::StakingError,
    events::StakeChanged,
    ledger,
    state::{Position, RewardGateway, StakerQueue, StakingPool},
};
use super::fees::{stake_router_pull, RouterPull};
use super::payout::{authority_seeds, pay_owed, secondary_pair, transfer_in, transfer_out};

/// Lock more primary (and, in Dual mode, secondary) stake.
///
/// Settles the position first: owed reward tokens with a payout pair in the
/// remaining accounts are transferred, and the Dual-mode primary-asset
/// payout goes to `staker_secondary`. Then the deposit is pulled in.
///
/// On a pool whose fees route through its gateway, the router's balances are
/// booked and pulled in before anything else; the remaining accounts then
/// start with one `(router_ata, pool_vault)` pair per managed mint.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, IncreaseStake<'info>>,
    primary_amount: u64,
    secondary_amount: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let staker_key = ctx.accounts.staker.key();

    if ctx.accounts.position.owner == Pubkey::default() {
        let pos = &mut ctx.accounts.position;
        pos.owner = staker_key;
        pos.pool = ctx.accounts.pool.key();
        pos.bump = ctx.bumps.position;
    }

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

    let primary_payout = ledger::increase_stake(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.queue,
        &mut ctx.accounts.position,
        &inflows,
        primary_amount,
        secondary_amount,
        now,
    )?;

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

    pay_owed(
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
        transfer_in(&token_program, user, vault, &staker, secondary_amount)?;
    }
    transfer_in(
        &token_program,
        &ctx.accounts.staker_primary.to_account_info(),
        &ctx.accounts.primary_vault.to_account_info(),
        &staker,
        primary_amount,
    )?;

    let pos = &ctx.accounts.position;
    emit!(StakeChanged {
        pool: pos.pool,
        owner: staker_key,
        primary_amount: pos.primary_amount,
        secondary_amount: pos.secondary_amount,
        start: pos.start,
        pool_start: ctx.accounts.pool.pool_start,
    });
    msg!(
        "Stake increased: primary={} secondary={} start={} payout={}",
        primary_amount, secondary_amount, pos.start, primary_payout
    );
    Ok(())
}

#[derive(Accounts)]
pub struct IncreaseStake<'info> {
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
        init_if_needed,
        payer = staker,
        space = Position::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), staker.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(
        mut,
        constraint = primary_vault.key() == pool.primary_vault @ StakingError::VaultMismatch,
    )]
    pub primary_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = staker_primary.mint == pool.primary_mint @ StakingError::MintMismatch,
        constraint = staker_primary.owner == staker.key() @ StakingError::Unauthorized,
    )]
    pub staker_primary: Box<Account<'info, TokenAccount>>,

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
