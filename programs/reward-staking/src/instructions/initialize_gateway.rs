use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use crate::{
    constants::*,
    error::StakingError,
    state::{RewardGateway, StakingPool},
};

/// Create the fee router for `pool`. Only the pool owner may do this; the
/// pool starts trusting the router once `set_reward_gateway` names its
/// authority PDA.
pub fn handler(ctx: Context<InitializeGateway>, vault_manager: Pubkey) -> Result<()> {
    let gateway = &mut ctx.accounts.gateway;
    gateway.operator = ctx.accounts.operator.key();
    gateway.pool = ctx.accounts.pool.key();
    gateway.authority = ctx.accounts.gateway_authority.key();
    gateway.authority_bump = ctx.bumps.gateway_authority;
    gateway.debt_mint = ctx.accounts.debt_mint.key();
    gateway.vault_manager = vault_manager;
    gateway.bump = ctx.bumps.gateway;
    gateway.reward_mints = Vec::new();

    msg!(
        "Gateway created: pool={} authority={} debt_mint={} vault_manager={}",
        gateway.pool, gateway.authority, gateway.debt_mint, vault_manager
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeGateway<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        constraint = pool.owner == operator.key() @ StakingError::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    pub debt_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = operator,
        space = RewardGateway::LEN,
        seeds = [GATEWAY_SEED, pool.key().as_ref()],
        bump,
    )]
    pub gateway: Box<Account<'info, RewardGateway>>,

    /// CHECK: PDA that receives router fees; system-owned, holds no data
    #[account(
        seeds = [GATEWAY_AUTHORITY_SEED, gateway.key().as_ref()],
        bump,
    )]
    pub gateway_authority: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
