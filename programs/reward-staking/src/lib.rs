/// Reward Staking: a staking ledger that splits protocol fees across stakers,
/// plus the fee router that feeds it.
///
/// Ledger (one pool per primary mint, Dual or Single mode):
///   initialize_pool      create the pool, its staker queue and primary vault
///   set_reward_gateway   owner-only: change the accepted fee source
///   open_reward_vault    create the pool's custody account for a reward mint
///   increase_stake       lock more stake; settles and restarts the position
///   decrease_stake       withdraw part or all of the stake
///   claim                collect (or, in Dual mode, compound) earned rewards
///   drop_fees            router-only fee injection, native SOL or SPL
///
/// Views (return data):
///   projected_earnings, pool_start, daily_rate, daily_yield
///
/// Router:
///   initialize_gateway   create the router for a pool
///   set_reward_mints     operator-only: mints the router forwards
///   sweep_fees           forward every held fee asset into the pool
///   airdrop_token        operator drops tokens straight into the pool
///   liquidate_vault      burn debt and liquidate a vault on the manager program

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("GTPuP6Rd8tijypDk6kaQ1kUMYBqy82euYeTNqay88Bze");

#[program]
pub mod reward_staking {
    use super::*;

    // ─── Ledger ───────────────────────────────────────────────────────────────

    /// Create a pool for `primary_mint`. Dual mode needs `secondary_mint`.
    pub fn initialize_pool(ctx: Context<InitializePool>, mode: StakingMode) -> Result<()> {
        initialize_pool::handler(ctx, mode)
    }

    /// Owner-only. Set the only key `drop_fees` accepts.
    pub fn set_reward_gateway(ctx: Context<SetRewardGateway>, reward_gateway: Pubkey) -> Result<()> {
        set_reward_gateway::handler(ctx, reward_gateway)
    }

    pub fn open_reward_vault(ctx: Context<OpenRewardVault>) -> Result<()> {
        open_reward_vault::handler(ctx)
    }

    /// Lock more stake. Remaining accounts: `(pool_reward_vault, staker_token_account)`
    /// pairs for the reward tokens to pay out on settlement.
    pub fn increase_stake<'info>(
        ctx: Context<'_, '_, 'info, 'info, IncreaseStake<'info>>,
        primary_amount: u64,
        secondary_amount: u64,
    ) -> Result<()> {
        increase_stake::handler(ctx, primary_amount, secondary_amount)
    }

    /// Withdraw stake. Same remaining-account layout as `increase_stake`.
    pub fn decrease_stake<'info>(
        ctx: Context<'_, '_, 'info, 'info, DecreaseStake<'info>>,
        primary_amount: u64,
        secondary_amount: u64,
    ) -> Result<()> {
        decrease_stake::handler(ctx, primary_amount, secondary_amount)
    }

    /// Collect rewards. `compound` re-locks the primary reward asset (Dual only).
    pub fn claim<'info>(
        ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
        compound: bool,
    ) -> Result<()> {
        claim::handler(ctx, compound)
    }

    /// Router-only. `mint == NATIVE_MINT` drops lamports.
    pub fn drop_fees(ctx: Context<DropFees>, mint: Pubkey, amount: u64) -> Result<()> {
        drop_fees::handler(ctx, mint, amount)
    }

    // ─── Views ────────────────────────────────────────────────────────────────

    pub fn projected_earnings(ctx: Context<PositionView>) -> Result<Earnings> {
        views::projected_earnings(ctx)
    }

    pub fn pool_start(ctx: Context<PoolView>) -> Result<i64> {
        views::pool_start(ctx)
    }

    /// Dual only; 0 in Single mode.
    pub fn daily_rate(ctx: Context<PoolView>) -> Result<u128> {
        views::daily_rate(ctx)
    }

    pub fn daily_yield(ctx: Context<PoolView>) -> Result<Vec<TokenRate>> {
        views::daily_yield(ctx)
    }

    // ─── Router ───────────────────────────────────────────────────────────────

    pub fn initialize_gateway(ctx: Context<InitializeGateway>, vault_manager: Pubkey) -> Result<()> {
        initialize_gateway::handler(ctx, vault_manager)
    }

    pub fn set_reward_mints(ctx: Context<SetRewardMints>, mints: Vec<Pubkey>) -> Result<()> {
        set_reward_mints::handler(ctx, mints)
    }

    /// Permissionless. Remaining accounts: `(router_token_account, pool_reward_vault)` pairs.
    pub fn sweep_fees<'info>(ctx: Context<'_, '_, 'info, 'info, SweepFees<'info>>) -> Result<()> {
        sweep_fees::handler(ctx)
    }

    pub fn airdrop_token(ctx: Context<AirdropToken>, amount: u64) -> Result<()> {
        airdrop_token::handler(ctx, amount)
    }

    /// Remaining accounts are forwarded verbatim to the vault manager.
    pub fn liquidate_vault<'info>(
        ctx: Context<'_, '_, 'info, 'info, LiquidateVault<'info>>,
        vault_id: u64,
        debt_amount: u64,
    ) -> Result<()> {
        liquidate_vault::handler(ctx, vault_id, debt_amount)
    }
}
