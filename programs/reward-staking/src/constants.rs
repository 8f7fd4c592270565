use anchor_lang::prelude::Pubkey;

/// PDA seeds
pub const POOL_SEED: &[u8] = b"staking_pool";
pub const POSITION_SEED: &[u8] = b"position";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";
pub const QUEUE_SEED: &[u8] = b"staker_queue";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";
pub const GATEWAY_SEED: &[u8] = b"reward_gateway";
pub const GATEWAY_AUTHORITY_SEED: &[u8] = b"gateway_authority";

/// Registry identifier for native SOL rewards (lamports held by the pool account)
pub const NATIVE_MINT: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Seconds per day for the time-weighted rate
pub const DAY: i64 = 86_400;

/// Fixed-point scale of `daily_rate` / `daily_yield` (1e12)
pub const RATE_PRECISION: u128 = 1_000_000_000_000;

/// Q64.64 fixed-point scale (reward per-share accumulators)
pub const Q64: u128 = 1u128 << 64;

/// Reward registry capacity; also bounds per-position checkpoints
pub const MAX_REWARD_TOKENS: usize = 16;

/// Initial entry room of a new StakerQueue; it grows from there
pub const QUEUE_INITIAL_ENTRIES: usize = 16;

/// Queue length below which tombstones are never compacted away
pub const QUEUE_COMPACT_MIN: usize = 32;
