use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::{
    constants::*,
    error::StakingError,
    state::{StakerQueue, StakingMode, StakingPool},
};
use super::fees::reward_vault_address;

/// Create a staking pool for `primary_mint` together with its staker queue.
///
/// The primary vault is created here. In Dual mode the secondary vault is the
/// pool's reward vault for `secondary_mint`; it is recorded now and created by
/// `open_reward_vault`, which clients bundle into the same transaction.
/// `reward_gateway` starts as the creator until `set_reward_gateway` runs.
pub fn handler(ctx: Context<InitializePool>, mode: StakingMode) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let (secondary_mint, secondary_vault) = match mode {
        StakingMode::Dual => {
            let mint = ctx
                .accounts
                .secondary_mint
                .as_ref()
                .map(|m| m.key())
                .ok_or(StakingError::InvalidRequest)?;
            require_keys_neq!(mint, ctx.accounts.primary_mint.key(), StakingError::InvalidRequest);
            (mint, reward_vault_address(&pool_key, &mint))
        }
        StakingMode::Single => (Pubkey::default(), Pubkey::default()),
    };

    let queue = &mut ctx.accounts.queue;
    queue.pool = pool_key;
    queue.head = 0;
    queue.bump = ctx.bumps.queue;
    queue.entries = Vec::new();

    let pool = &mut ctx.accounts.pool;
    pool.owner = ctx.accounts.creator.key();
    pool.reward_gateway = ctx.accounts.creator.key();
    pool.mode = mode;
    pool.authority = ctx.accounts.pool_authority.key();
    pool.authority_bump = ctx.bumps.pool_authority;
    pool.primary_mint = ctx.accounts.primary_mint.key();
    pool.primary_vault = ctx.accounts.primary_vault.key();
    pool.secondary_mint = secondary_mint;
    pool.secondary_vault = secondary_vault;
    pool.total_primary = 0;
    pool.total_secondary = 0;
    pool.pool_start = 0;
    pool.primary_fees_in_pool = 0;
    pool.queue = ctx.accounts.queue.key();
    pool.queue_bump = ctx.bumps.queue;
    pool.bump = ctx.bumps.pool;
    pool.reward_tokens = Vec::new();

    msg!(
        "Pool created: primary={} secondary={} mode={:?}",
        pool.primary_mint, secondary_mint, mode
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    pub primary_mint: Account<'info, Mint>,

    /// Dual mode only
    pub secondary_mint: Option<Account<'info, Mint>>,

    #[account(
        init,
        payer = creator,
        space = StakingPool::LEN,
        seeds = [POOL_SEED, primary_mint.key().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        init,
        payer = creator,
        space = StakerQueue::space(QUEUE_INITIAL_ENTRIES),
        seeds = [QUEUE_SEED, pool.key().as_ref()],
        bump,
    )]
    pub queue: Box<Account<'info, StakerQueue>>,

    /// CHECK: PDA vault authority, owns every vault and holds no data
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = creator,
        token::mint = primary_mint,
        token::authority = pool_authority,
    )]
    pub primary_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
