//! Reward arithmetic.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain projections match
//! what `claim` pays.  No RPC calls are made here; `now` is the cluster clock.

use crate::error::{Error, Result};
use crate::state::{PoolState, PositionState};
use crate::types::{Earnings, StakingMode, TokenAmount, TokenRate};

// ─── Constants ────────────────────────────────────────────────────────────────

pub const DAY: i64 = 86_400;
/// Fixed-point scale of daily rates.
pub const RATE_PRECISION: u128 = 1_000_000_000_000;
/// Q64.64 one.
pub const Q64: u128 = 1u128 << 64;

// ─── Accumulator ──────────────────────────────────────────────────────────────

/// `amount / basis` as Q64.64, divide-first.
pub fn per_share_delta(amount: u64, basis: u64) -> Result<u128> {
    if basis == 0 {
        return Err(Error::MathOverflow);
    }
    let (amount, basis) = (amount as u128, basis as u128);
    (amount / basis)
        .checked_mul(Q64)
        .and_then(|q| q.checked_add((amount % basis) * Q64 / basis))
        .ok_or(Error::MathOverflow)
}

/// `share * (per_share - checkpoint) >> 64`
pub fn accrued(share: u64, per_share: u128, checkpoint: u128) -> Result<u64> {
    let owed = (share as u128)
        .checked_mul(per_share.saturating_sub(checkpoint))
        .ok_or(Error::MathOverflow)?
        >> 64;
    u64::try_from(owed).map_err(|_| Error::MathOverflow)
}

/// Owed plus unsettled accrual per registry token, registry order.
pub fn pending_rewards(pool: &PoolState, position: &PositionState) -> Result<Vec<TokenAmount>> {
    let share = position.share(pool.mode);
    pool.reward_tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let (checkpoint, owed) = position
                .rewards
                .get(i)
                .map_or((0, 0), |e| (e.checkpoint, e.owed));
            let amount = owed
                .checked_add(accrued(share, token.per_share, checkpoint)?)
                .ok_or(Error::MathOverflow)?;
            Ok(TokenAmount { mint: token.mint, amount })
        })
        .collect()
}

// ─── Daily rate ───────────────────────────────────────────────────────────────

/// `amount * RATE_PRECISION * DAY / (staked * (now - since))`; zero with
/// nothing staked, no start, or no elapsed time.
pub fn rate_per_day(amount: u64, staked: u64, since: i64, now: i64) -> Result<u128> {
    if staked == 0 || since == 0 || now <= since {
        return Ok(0);
    }
    let numerator = (amount as u128)
        .checked_mul(RATE_PRECISION)
        .and_then(|v| v.checked_mul(DAY as u128))
        .ok_or(Error::MathOverflow)?;
    let denominator = (staked as u128)
        .checked_mul((now - since) as u128)
        .ok_or(Error::MathOverflow)?;
    Ok(numerator / denominator)
}

/// Secondary-mint fees per primary unit per day.  Zero for Single pools.
pub fn daily_rate(pool: &PoolState, now: i64) -> Result<u128> {
    if pool.mode != StakingMode::Dual {
        return Ok(0);
    }
    rate_per_day(pool.primary_fees_in_pool, pool.total_primary, pool.pool_start, now)
}

/// Resident amount of every reward token per unit of share per day.
pub fn daily_yield(pool: &PoolState, now: i64) -> Result<Vec<TokenRate>> {
    pool.reward_tokens
        .iter()
        .map(|t| {
            Ok(TokenRate {
                mint: t.mint,
                rate: rate_per_day(t.resident, pool.share_basis(), pool.pool_start, now)?,
            })
        })
        .collect()
}

/// Primary reward asset a claim would pay now, capped at the pool's fees.
pub fn projected_primary(pool: &PoolState, position: &PositionState, now: i64) -> Result<u64> {
    if pool.mode != StakingMode::Dual || !position.is_active() || position.start == 0 {
        return Ok(0);
    }
    let tenure = now.saturating_sub(position.start).max(0) as u128;
    let earned = daily_rate(pool, now)?
        .checked_mul(position.primary_amount as u128)
        .and_then(|v| v.checked_mul(tenure))
        .ok_or(Error::MathOverflow)?
        / (DAY as u128 * RATE_PRECISION);
    Ok(earned.min(pool.primary_fees_in_pool as u128) as u64)
}

/// Everything `claim` would pay `position` at `now`.
pub fn projected_earnings(pool: &PoolState, position: &PositionState, now: i64) -> Result<Earnings> {
    Ok(Earnings {
        primary: projected_primary(pool, position, now)?,
        rewards: pending_rewards(pool, position)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CheckpointState, RewardTokenState};
    use solana_sdk::pubkey::Pubkey;

    const T0: i64 = 1_700_000_000;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn dual_pool(total_primary: u64, total_secondary: u64, fees: u64, pool_start: i64) -> PoolState {
        PoolState {
            owner:                key(1),
            reward_gateway:       key(1),
            mode:                 StakingMode::Dual,
            authority:            key(2),
            primary_mint:         key(3),
            primary_vault:        key(4),
            secondary_mint:       key(5),
            secondary_vault:      key(6),
            total_primary,
            total_secondary,
            pool_start,
            primary_fees_in_pool: fees,
            queue:                key(7),
            reward_tokens:        vec![],
        }
    }

    fn position(primary: u64, secondary: u64, start: i64) -> PositionState {
        PositionState {
            owner:            key(8),
            pool:             key(9),
            primary_amount:   primary,
            secondary_amount: secondary,
            start,
            rewards:          vec![],
        }
    }

    #[test]
    fn per_share_is_exact_for_divisible_amounts() {
        let delta = per_share_delta(100, 4).unwrap();
        assert_eq!(delta, 25 * Q64);
        assert_eq!(accrued(4, delta, 0).unwrap(), 100);
        assert!(per_share_delta(1, 0).is_err());
    }

    #[test]
    fn accrual_truncates_toward_zero() {
        let delta = per_share_delta(10, 3).unwrap();
        assert_eq!(accrued(1, delta, 0).unwrap(), 3);
        assert_eq!(accrued(3, delta, 0).unwrap(), 9);
    }

    #[test]
    fn daily_rate_halves_as_the_window_doubles() {
        // 10 fees over 100 staked for one day = 0.1 per unit per day.
        let pool = dual_pool(100, 100, 10, T0);
        assert_eq!(daily_rate(&pool, T0 + DAY).unwrap(), RATE_PRECISION / 10);
        assert_eq!(daily_rate(&pool, T0 + 2 * DAY).unwrap(), RATE_PRECISION / 20);
        assert_eq!(daily_rate(&pool, T0).unwrap(), 0);
    }

    #[test]
    fn single_pools_have_no_daily_rate() {
        let mut pool = dual_pool(100, 0, 10, T0);
        pool.mode = StakingMode::Single;
        assert_eq!(daily_rate(&pool, T0 + DAY).unwrap(), 0);
        assert_eq!(projected_primary(&pool, &position(50, 0, T0), T0 + DAY).unwrap(), 0);
    }

    #[test]
    fn projection_splits_fees_by_primary_and_tenure() {
        let pool = dual_pool(100, 100, 10, T0);
        let now = T0 + DAY;
        assert_eq!(projected_primary(&pool, &position(50, 50, T0), now).unwrap(), 5);
        assert_eq!(projected_primary(&pool, &position(50, 50, T0 + DAY / 2), now).unwrap(), 2);
        assert_eq!(projected_primary(&pool, &position(0, 0, 0), now).unwrap(), 0);
    }

    #[test]
    fn projection_is_capped_at_fees_in_pool() {
        // The oldest staker's window can exceed the fees actually held.
        let pool = dual_pool(10, 10, 5, T0 + DAY);
        let early = position(10, 10, T0);
        assert_eq!(projected_primary(&pool, &early, T0 + 2 * DAY).unwrap(), 5);
    }

    #[test]
    fn pending_includes_owed_and_unsettled_accrual() {
        let mut pool = dual_pool(100, 4, 0, T0);
        pool.reward_tokens = vec![
            RewardTokenState { mint: key(20), vault: key(21), per_share: 25 * Q64, resident: 100 },
            RewardTokenState { mint: key(22), vault: key(23), per_share: Q64, resident: 4 },
        ];
        let mut pos = position(0, 2, T0);
        pos.rewards = vec![CheckpointState { mint: key(20), checkpoint: 5 * Q64, owed: 3 }];

        let pending = pending_rewards(&pool, &pos).unwrap();
        assert_eq!(pending[0], TokenAmount { mint: key(20), amount: 3 + 40 });
        // Registered after the last settlement: accrues from zero.
        assert_eq!(pending[1], TokenAmount { mint: key(22), amount: 2 });
    }

    #[test]
    fn daily_yield_covers_every_registered_token() {
        let mut pool = dual_pool(100, 50, 0, T0);
        pool.reward_tokens = vec![
            RewardTokenState { mint: key(20), vault: key(21), per_share: 0, resident: 100 },
        ];
        let rates = daily_yield(&pool, T0 + DAY).unwrap();
        assert_eq!(rates, vec![TokenRate { mint: key(20), rate: 2 * RATE_PRECISION }]);
    }
}
