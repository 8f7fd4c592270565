//! Parameter and result types for [`crate::StakingClient`].
//!
//! Result types serialize pubkeys as base58 and u128 rates as decimal
//! strings so they can go through `serde_json::Value` unchanged.

use std::fmt::Display;

use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;

fn display<T: Display, S: Serializer>(value: &T, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// Pool flavour, fixed at creation.  Discriminants match the on-chain enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StakingMode {
    /// Primary + secondary locked; secondary-mint fees paid by the daily rate.
    Dual = 0,
    /// Primary only; every reward token pro-rata to locked primary.
    Single = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    #[serde(serialize_with = "display")]
    pub mint:   Pubkey,
    pub amount: u64,
}

/// Per-day yield per staked unit, scaled by [`crate::math::RATE_PRECISION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenRate {
    #[serde(serialize_with = "display")]
    pub mint: Pubkey,
    #[serde(serialize_with = "display")]
    pub rate: u128,
}

// ─── Pool creation ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreatePoolParams {
    pub primary_mint:   Pubkey,
    /// Required for [`StakingMode::Dual`], ignored otherwise.
    pub secondary_mint: Option<Pubkey>,
    pub mode:           StakingMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePoolResult {
    pub signature:       String,
    #[serde(serialize_with = "display")]
    pub pool:            Pubkey,
    #[serde(serialize_with = "display")]
    pub pool_authority:  Pubkey,
    #[serde(serialize_with = "display")]
    pub queue:           Pubkey,
    #[serde(serialize_with = "display")]
    pub primary_vault:   Pubkey,
    /// `Pubkey::default()` for Single-mode pools.
    #[serde(serialize_with = "display")]
    pub secondary_vault: Pubkey,
    pub mode:            StakingMode,
}

#[derive(Debug, Clone)]
pub struct CreateGatewayParams {
    pub primary_mint:  Pubkey,
    pub debt_mint:     Pubkey,
    pub vault_manager: Pubkey,
    /// Mints swept besides the debt mint.  Empty leaves the set untouched.
    pub reward_mints:  Vec<Pubkey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGatewayResult {
    pub signature:         String,
    #[serde(serialize_with = "display")]
    pub gateway:           Pubkey,
    /// Router address: send fees here (lamports, or token accounts it owns).
    #[serde(serialize_with = "display")]
    pub gateway_authority: Pubkey,
}

// ─── Staking ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StakeParams {
    pub primary_mint:     Pubkey,
    pub primary_amount:   u64,
    /// Must be 0 for Single-mode pools.
    pub secondary_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StakeResult {
    pub signature:        String,
    #[serde(serialize_with = "display")]
    pub pool:             Pubkey,
    #[serde(serialize_with = "display")]
    pub position:         Pubkey,
    pub primary_amount:   u64,
    pub secondary_amount: u64,
}

#[derive(Debug, Clone)]
pub struct ClaimParams {
    pub primary_mint: Pubkey,
    /// Re-lock the primary reward asset as secondary stake (Dual only).
    pub compound:     bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimResult {
    pub signature: String,
    #[serde(serialize_with = "display")]
    pub pool:      Pubkey,
    #[serde(serialize_with = "display")]
    pub position:  Pubkey,
    pub compound:  bool,
    /// What the position had earned just before the claim was sent.
    pub expected:  Earnings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Earnings {
    /// Primary reward asset by the daily rate (Dual only).
    pub primary: u64,
    pub rewards: Vec<TokenAmount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub signature:     String,
    #[serde(serialize_with = "display")]
    pub pool:          Pubkey,
    /// Router token accounts included in the sweep.
    pub token_accounts: usize,
}

// ─── Read results ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RewardTokenInfo {
    #[serde(serialize_with = "display")]
    pub mint:     Pubkey,
    #[serde(serialize_with = "display")]
    pub vault:    Pubkey,
    /// Dropped but not yet paid out.
    pub resident: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolInfo {
    #[serde(serialize_with = "display")]
    pub pool:                 Pubkey,
    pub mode:                 StakingMode,
    #[serde(serialize_with = "display")]
    pub owner:                Pubkey,
    #[serde(serialize_with = "display")]
    pub reward_gateway:       Pubkey,
    #[serde(serialize_with = "display")]
    pub primary_mint:         Pubkey,
    #[serde(serialize_with = "display")]
    pub secondary_mint:       Pubkey,
    pub total_primary:        u64,
    pub total_secondary:      u64,
    /// Oldest active start (unix seconds), 0 with no stakers.
    pub pool_start:           i64,
    pub primary_fees_in_pool: u64,
    #[serde(serialize_with = "display")]
    pub daily_rate:           u128,
    pub daily_yield:          Vec<TokenRate>,
    pub reward_tokens:        Vec<RewardTokenInfo>,
    /// Active positions in the staker queue.
    pub stakers:              usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionInfo {
    #[serde(serialize_with = "display")]
    pub address:          Pubkey,
    #[serde(serialize_with = "display")]
    pub pool:             Pubkey,
    #[serde(serialize_with = "display")]
    pub owner:            Pubkey,
    pub primary_amount:   u64,
    pub secondary_amount: u64,
    pub start:            i64,
    pub earnings:         Earnings,
}

#[derive(Debug, Clone, Serialize)]
pub struct StakerInfo {
    #[serde(serialize_with = "display")]
    pub owner: Pubkey,
    pub start: i64,
}
