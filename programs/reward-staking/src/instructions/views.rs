use anchor_lang::prelude::*;
use crate::{
    error::StakingError,
    state::{Earnings, Position, StakingPool, TokenRate},
};

// Read-only instructions. Results come back as return data, so clients call
// them through simulation.

pub fn projected_earnings(ctx: Context<PositionView>) -> Result<Earnings> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.pool.projected_earnings(&ctx.accounts.position, now)
}

pub fn pool_start(ctx: Context<PoolView>) -> Result<i64> {
    Ok(ctx.accounts.pool.pool_start)
}

pub fn daily_rate(ctx: Context<PoolView>) -> Result<u128> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.pool.daily_rate(now)
}

pub fn daily_yield(ctx: Context<PoolView>) -> Result<Vec<TokenRate>> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.pool.daily_yield(now)
}

#[derive(Accounts)]
pub struct PoolView<'info> {
    pub pool: Box<Account<'info, StakingPool>>,
}

#[derive(Accounts)]
pub struct PositionView<'info> {
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        constraint = position.pool == pool.key() @ StakingError::PositionMismatch,
    )]
    pub position: Box<Account<'info, Position>>,
}
