use anchor_lang::prelude::*;
use crate::{error::StakingError, state::StakingPool};

/// Point the pool at a new fee source. For a `RewardGateway` this is the
/// gateway's authority PDA, which is what `sweep_fees` signs with.
pub fn handler(ctx: Context<SetRewardGateway>, reward_gateway: Pubkey) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous = pool.reward_gateway;
    pool.reward_gateway = reward_gateway;
    msg!("Reward gateway changed: {} -> {}", previous, reward_gateway);
    Ok(())
}

#[derive(Accounts)]
pub struct SetRewardGateway<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        constraint = pool.owner == owner.key() @ StakingError::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,
}
