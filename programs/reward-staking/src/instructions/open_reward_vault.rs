use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::{constants::*, state::StakingPool};

/// Create the pool's custody account for `mint` fees. Permissionless: the
/// address is fixed by seeds and the pool authority owns it. The token is
/// registered on its first fee drop, not here.
pub fn handler(ctx: Context<OpenRewardVault>) -> Result<()> {
    msg!(
        "Reward vault opened: pool={} mint={} vault={}",
        ctx.accounts.pool.key(),
        ctx.accounts.mint.key(),
        ctx.accounts.vault.key()
    );
    Ok(())
}

#[derive(Accounts)]
pub struct OpenRewardVault<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: PDA vault authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    pub mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref(), mint.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = pool_authority,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
