use anchor_lang::prelude::*;
use crate::{constants::*, error::StakingError, state::RewardGateway};

/// Replace the set of mints `sweep_fees` forwards besides the debt mint.
/// Duplicates are dropped; order is kept.
pub fn handler(ctx: Context<SetRewardMints>, mints: Vec<Pubkey>) -> Result<()> {
    let mut unique: Vec<Pubkey> = Vec::with_capacity(mints.len());
    for mint in mints {
        if !unique.contains(&mint) {
            unique.push(mint);
        }
    }
    require!(unique.len() <= MAX_REWARD_TOKENS, StakingError::RewardTokenLimit);

    ctx.accounts.gateway.reward_mints = unique;
    msg!("Reward mints set: {} managed", ctx.accounts.gateway.reward_mints.len());
    Ok(())
}

#[derive(Accounts)]
pub struct SetRewardMints<'info> {
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = gateway.operator == operator.key() @ StakingError::Unauthorized,
    )]
    pub gateway: Box<Account<'info, RewardGateway>>,
}
