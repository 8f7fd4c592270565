//! Stake accounting shared by the instruction handlers.
//!
//! Every function takes the accounts it mutates explicitly and performs no
//! token movement; handlers call these first and transfer afterwards.
//! Router balances pulled by the same instruction arrive as `inflows` and are
//! booked against the shares that existed before the change.

use anchor_lang::prelude::*;
use crate::{
    error::StakingError,
    state::{FeeDrop, FeeInflow, Position, StakerQueue, StakingMode, StakingPool},
};

/// Book each inflow as a fee drop, in order.
pub fn book_inflows(pool: &mut StakingPool, inflows: &[FeeInflow]) -> Result<Vec<FeeDrop>> {
    inflows
        .iter()
        .map(|inflow| pool.drop_fees(inflow.mint, inflow.vault, inflow.amount))
        .collect()
}

/// Settle reward tokens into `owed` and take the Dual-mode primary-asset
/// payout out of `primary_fees_in_pool`. Returns that payout.
pub fn settle(pool: &mut StakingPool, position: &mut Position, now: i64) -> Result<u64> {
    position.settle_rewards(pool)?;
    let primary = pool.projected_primary(position, now)?;
    pool.primary_fees_in_pool = pool
        .primary_fees_in_pool
        .checked_sub(primary)
        .ok_or(StakingError::MathOverflow)?;
    Ok(primary)
}

/// Restart the position's accrual window at `now`, or retire it from the
/// queue when it holds nothing, then refresh `pool.pool_start`.
pub fn restart(
    pool: &mut StakingPool,
    queue: &mut StakerQueue,
    position: &mut Position,
    now: i64,
) -> Result<()> {
    if position.start != 0 {
        queue.retire(&position.owner, position.start);
    }
    position.start = if position.is_active() {
        queue.push(position.owner, now)
    } else {
        0
    };
    pool.pool_start = queue.oldest_start();
    Ok(())
}

pub fn increase_stake(
    pool: &mut StakingPool,
    queue: &mut StakerQueue,
    position: &mut Position,
    inflows: &[FeeInflow],
    primary_amount: u64,
    secondary_amount: u64,
    now: i64,
) -> Result<u64> {
    if primary_amount == 0 && secondary_amount == 0 {
        return Err(pool.invalid_stake().into());
    }
    require!(
        pool.mode == StakingMode::Dual || secondary_amount == 0,
        StakingError::InvalidRequest
    );

    book_inflows(pool, inflows)?;
    let payout = settle(pool, position, now)?;

    position.primary_amount = position
        .primary_amount
        .checked_add(primary_amount)
        .ok_or(StakingError::MathOverflow)?;
    position.secondary_amount = position
        .secondary_amount
        .checked_add(secondary_amount)
        .ok_or(StakingError::MathOverflow)?;
    pool.total_primary = pool
        .total_primary
        .checked_add(primary_amount)
        .ok_or(StakingError::MathOverflow)?;
    pool.total_secondary = pool
        .total_secondary
        .checked_add(secondary_amount)
        .ok_or(StakingError::MathOverflow)?;

    restart(pool, queue, position, now)?;
    Ok(payout)
}

pub fn decrease_stake(
    pool: &mut StakingPool,
    queue: &mut StakerQueue,
    position: &mut Position,
    inflows: &[FeeInflow],
    primary_amount: u64,
    secondary_amount: u64,
    now: i64,
) -> Result<u64> {
    let valid = (primary_amount > 0 || secondary_amount > 0)
        && primary_amount <= position.primary_amount
        && secondary_amount <= position.secondary_amount;
    if !valid {
        return Err(pool.invalid_unstake().into());
    }

    book_inflows(pool, inflows)?;
    let payout = settle(pool, position, now)?;

    position.primary_amount -= primary_amount;
    position.secondary_amount -= secondary_amount;
    pool.total_primary = pool
        .total_primary
        .checked_sub(primary_amount)
        .ok_or(StakingError::MathOverflow)?;
    pool.total_secondary = pool
        .total_secondary
        .checked_sub(secondary_amount)
        .ok_or(StakingError::MathOverflow)?;

    restart(pool, queue, position, now)?;
    Ok(payout)
}

/// Settle and restart. With `compound`, the primary-asset payout is locked
/// as extra secondary stake and 0 is returned for transfer.
pub fn claim(
    pool: &mut StakingPool,
    queue: &mut StakerQueue,
    position: &mut Position,
    inflows: &[FeeInflow],
    compound: bool,
    now: i64,
) -> Result<u64> {
    require!(
        !compound || pool.mode == StakingMode::Dual,
        StakingError::InvalidRequest
    );

    book_inflows(pool, inflows)?;
    let payout = settle(pool, position, now)?;
    let transfer = if compound && payout > 0 {
        position.secondary_amount = position
            .secondary_amount
            .checked_add(payout)
            .ok_or(StakingError::MathOverflow)?;
        pool.total_secondary = pool
            .total_secondary
            .checked_add(payout)
            .ok_or(StakingError::MathOverflow)?;
        0
    } else {
        payout
    };

    if position.is_active() {
        restart(pool, queue, position, now)?;
    }
    Ok(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::state::RewardToken;
    use anchor_lang::error::Error;

    const T0: i64 = 1_700_000_000;

    struct Ledger {
        pool: StakingPool,
        queue: StakerQueue,
    }

    impl Ledger {
        fn new(mode: StakingMode) -> Self {
            let pool = StakingPool {
                owner: Pubkey::new_unique(),
                reward_gateway: Pubkey::new_unique(),
                mode,
                authority: Pubkey::new_unique(),
                authority_bump: 255,
                primary_mint: Pubkey::new_unique(),
                primary_vault: Pubkey::new_unique(),
                secondary_mint: if mode == StakingMode::Dual {
                    Pubkey::new_unique()
                } else {
                    Pubkey::default()
                },
                secondary_vault: Pubkey::new_unique(),
                total_primary: 0,
                total_secondary: 0,
                pool_start: 0,
                primary_fees_in_pool: 0,
                queue: Pubkey::new_unique(),
                queue_bump: 255,
                bump: 255,
                reward_tokens: vec![],
            };
            let queue = StakerQueue { pool: Pubkey::default(), head: 0, bump: 255, entries: vec![] };
            Self { pool, queue }
        }

        fn position(&self) -> Position {
            Position { owner: Pubkey::new_unique(), ..Default::default() }
        }

        fn stake(&mut self, pos: &mut Position, primary: u64, secondary: u64, now: i64) -> u64 {
            increase_stake(&mut self.pool, &mut self.queue, pos, &[], primary, secondary, now).unwrap()
        }

        fn unstake(&mut self, pos: &mut Position, primary: u64, secondary: u64, now: i64) -> u64 {
            decrease_stake(&mut self.pool, &mut self.queue, pos, &[], primary, secondary, now).unwrap()
        }

        fn claim(&mut self, pos: &mut Position, now: i64) -> u64 {
            claim(&mut self.pool, &mut self.queue, pos, &[], false, now).unwrap()
        }

        fn primary_fees(&mut self, amount: u64) {
            let mint = self.pool.secondary_mint;
            let vault = self.pool.secondary_vault;
            assert_eq!(self.pool.drop_fees(mint, vault, amount).unwrap(), FeeDrop::PrimaryAsset);
        }

        fn rate(&self, now: i64) -> u128 {
            self.pool.daily_rate(now).unwrap()
        }
    }

    fn rate_eq(value: u128, bps: u128) -> bool {
        value == RATE_PRECISION * bps / 10_000
    }

    /// Owed balance of registry token `index` after settling.
    fn settled_owed(ledger: &Ledger, pos: &mut Position, index: usize) -> u64 {
        pos.settle_rewards(&ledger.pool).unwrap();
        pos.rewards[index].owed
    }

    #[test]
    fn pool_start_follows_oldest_active_position() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut users: Vec<Position> = (0..4).map(|_| l.position()).collect();
        for (i, u) in users.iter_mut().enumerate() {
            l.stake(u, 100, 0, T0 + 60 * i as i64);
        }
        assert_eq!(l.pool.pool_start, T0);

        // Top-up by a younger staker does not move the pool start.
        l.stake(&mut users[2], 50, 0, T0 + 300);
        assert_eq!(l.pool.pool_start, T0);
        assert_eq!(users[2].start, T0 + 300);

        l.unstake(&mut users[0], 100, 0, T0 + 400);
        assert_eq!(users[0].start, 0);
        assert_eq!(l.pool.pool_start, T0 + 60);

        l.unstake(&mut users[2], 150, 0, T0 + 500);
        assert_eq!(l.pool.pool_start, T0 + 60);

        l.unstake(&mut users[1], 100, 0, T0 + 600);
        assert_eq!(l.pool.pool_start, T0 + 180);

        l.unstake(&mut users[3], 100, 0, T0 + 700);
        assert_eq!(l.pool.pool_start, 0);
        assert_eq!(l.pool.total_primary, 0);
    }

    #[test]
    fn partial_withdrawal_restarts_start() {
        let mut l = Ledger::new(StakingMode::Dual);
        let mut a = l.position();
        let mut b = l.position();
        l.stake(&mut a, 100, 100, T0);
        l.stake(&mut b, 100, 0, T0 + 10);
        l.unstake(&mut a, 50, 0, T0 + 20);
        assert_eq!(a.start, T0 + 20);
        assert_eq!(l.pool.pool_start, T0 + 10);
        assert_eq!((a.primary_amount, a.secondary_amount), (50, 100));
    }

    #[test]
    fn invalid_amounts_use_mode_specific_errors() {
        let mut dual = Ledger::new(StakingMode::Dual);
        let mut pos = dual.position();
        let err = increase_stake(&mut dual.pool, &mut dual.queue, &mut pos, &[], 0, 0, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidStake));
        dual.stake(&mut pos, 10, 5, T0);
        let err = decrease_stake(&mut dual.pool, &mut dual.queue, &mut pos, &[], 11, 0, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidUnstake));
        let err = decrease_stake(&mut dual.pool, &mut dual.queue, &mut pos, &[], 0, 6, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidUnstake));

        let mut single = Ledger::new(StakingMode::Single);
        let mut pos = single.position();
        let err = increase_stake(&mut single.pool, &mut single.queue, &mut pos, &[], 0, 0, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidRequest));
        let err = increase_stake(&mut single.pool, &mut single.queue, &mut pos, &[], 1, 1, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidRequest));
        single.stake(&mut pos, 10, 0, T0);
        let err = decrease_stake(&mut single.pool, &mut single.queue, &mut pos, &[], 20, 0, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidRequest));
        let err = claim(&mut single.pool, &mut single.queue, &mut pos, &[], true, T0).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidRequest));
    }

    #[test]
    fn daily_rate_recalculates_on_moving_inputs() {
        let mut l = Ledger::new(StakingMode::Dual);
        let (mut u1, mut u2, mut u3) = (l.position(), l.position(), l.position());

        l.stake(&mut u1, 100, 0, T0);
        assert_eq!(l.rate(T0), 0);
        l.primary_fees(10);
        assert_eq!(l.rate(T0), 0);

        let day1 = T0 + DAY;
        assert!(rate_eq(l.rate(day1), 1_000));
        l.stake(&mut u2, 100, 0, day1);
        assert!(rate_eq(l.rate(day1), 500));
        l.primary_fees(10);
        assert!(rate_eq(l.rate(day1), 1_000));

        let day2 = T0 + 2 * DAY;
        assert!(rate_eq(l.rate(day2), 500));
        l.stake(&mut u3, 200, 0, day2);
        assert!(rate_eq(l.rate(day2), 250));
        l.primary_fees(10);
        assert!(rate_eq(l.rate(day2), 375));
    }

    #[test]
    fn projected_earnings_and_claim_use_pool_wide_rate() {
        let mut l = Ledger::new(StakingMode::Dual);
        // Fees that arrive before anyone stakes still count.
        l.primary_fees(20);
        let (mut u1, mut u2, mut u3) = (l.position(), l.position(), l.position());
        l.stake(&mut u1, 100, 0, T0);
        l.stake(&mut u2, 200, 0, T0 + DAY);
        let now = T0 + 2 * DAY;
        l.stake(&mut u3, 100, 0, now);

        assert_eq!(l.pool.projected_earnings(&u1, now).unwrap().primary, 5);
        assert_eq!(l.pool.projected_earnings(&u2, now).unwrap().primary, 5);
        assert_eq!(l.pool.projected_earnings(&u3, now).unwrap().primary, 0);

        assert_eq!(l.claim(&mut u1, now), 5);
        assert_eq!(l.pool.primary_fees_in_pool, 15);
        assert_eq!(u1.start, now);
        assert_eq!(l.pool.pool_start, T0 + DAY);
        assert_eq!(l.pool.projected_earnings(&u1, now).unwrap().primary, 0);
    }

    #[test]
    fn compound_relocks_primary_payout_as_secondary() {
        let mut l = Ledger::new(StakingMode::Dual);
        let mut u = l.position();
        l.stake(&mut u, 100, 0, T0);
        l.primary_fees(10);
        let paid = claim(&mut l.pool, &mut l.queue, &mut u, &[], true, T0 + DAY).unwrap();
        assert_eq!(paid, 0);
        assert_eq!(u.secondary_amount, 10);
        assert_eq!(l.pool.total_secondary, 10);
        assert_eq!(l.pool.primary_fees_in_pool, 0);
    }

    #[test]
    fn tokens_split_by_share_and_claims_are_idempotent() {
        let mut l = Ledger::new(StakingMode::Single);
        let (mut u1, mut u2) = (l.position(), l.position());
        l.stake(&mut u1, 100, 0, T0);
        l.stake(&mut u2, 300, 0, T0);

        let (token_a, vault_a) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (token_b, vault_b) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.pool.drop_fees(token_a, vault_a, 7_000).unwrap();
        l.pool.drop_fees(token_b, vault_b, 8_000_000).unwrap();
        l.pool.drop_fees(NATIVE_MINT, NATIVE_MINT, 400).unwrap();

        l.claim(&mut u1, T0 + DAY);
        assert_eq!(u1.rewards[0].owed, 1_750);
        assert_eq!(u1.rewards[1].owed, 2_000_000);
        assert_eq!(u1.rewards[2].owed, 100);
        let taken: Vec<u64> = (0..3).map(|i| u1.take_owed(i)).collect();
        assert_eq!(taken, vec![1_750, 2_000_000, 100]);

        l.claim(&mut u1, T0 + DAY);
        assert!(u1.rewards.iter().all(|r| r.owed == 0));
        assert_eq!(settled_owed(&l, &mut u2, 0), 5_250);
    }

    #[test]
    fn zero_share_drop_is_ignored() {
        let mut l = Ledger::new(StakingMode::Single);
        let mint = Pubkey::new_unique();
        assert_eq!(l.pool.drop_fees(mint, Pubkey::new_unique(), 50).unwrap(), FeeDrop::Ignored);
        assert!(l.pool.reward_tokens.is_empty());

        let mut u = l.position();
        l.stake(&mut u, 10, 0, T0);
        assert_eq!(l.pool.drop_fees(mint, Pubkey::new_unique(), 0).unwrap(), FeeDrop::Ignored);
        assert!(l.pool.reward_tokens.is_empty());
    }

    #[test]
    fn dual_mode_shares_tokens_by_secondary_stake() {
        let mut l = Ledger::new(StakingMode::Dual);
        let (mut u1, mut u2) = (l.position(), l.position());
        l.stake(&mut u1, 1_000, 0, T0);
        assert_eq!(l.pool.classify_drop(&NATIVE_MINT, 10), FeeDrop::Ignored);

        l.stake(&mut u2, 0, 50, T0);
        l.pool.drop_fees(NATIVE_MINT, NATIVE_MINT, 500).unwrap();
        assert_eq!(settled_owed(&l, &mut u2, 0), 500);
        assert_eq!(settled_owed(&l, &mut u1, 0), 0);
    }

    #[test]
    fn redeposit_after_exit_earns_nothing_retroactively() {
        let mut l = Ledger::new(StakingMode::Single);
        let (mut u1, mut u2) = (l.position(), l.position());
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());

        l.stake(&mut u1, 100, 0, T0);
        l.pool.drop_fees(mint, vault, 100).unwrap();
        l.unstake(&mut u1, 100, 0, T0 + 10);
        assert_eq!(u1.rewards[0].owed, 100);
        assert_eq!(u1.take_owed(0), 100);
        assert_eq!(l.pool.pool_start, 0);

        l.stake(&mut u2, 100, 0, T0 + 20);
        l.pool.drop_fees(mint, vault, 100).unwrap();

        l.stake(&mut u1, 100, 0, T0 + 30);
        assert_eq!(u1.start, T0 + 30);
        assert_eq!(u1.rewards[0].owed, 0);
        assert_eq!(u1.rewards[0].checkpoint, l.pool.reward_tokens[0].per_share);

        l.pool.drop_fees(mint, vault, 200).unwrap();
        assert_eq!(settled_owed(&l, &mut u1, 0), 100);
        assert_eq!(settled_owed(&l, &mut u2, 0), 200);
    }

    #[test]
    fn late_registered_token_accrues_from_zero() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut u = l.position();
        l.stake(&mut u, 40, 0, T0);
        assert!(u.rewards.is_empty());
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.pool.drop_fees(mint, vault, 80).unwrap();
        let pending = u.pending(&l.pool).unwrap();
        assert_eq!(pending[0].amount, 80);
        assert_eq!(pending[0].mint, mint);
    }

    #[test]
    fn registry_rejects_vault_swap_and_overflowing_capacity() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut u = l.position();
        l.stake(&mut u, 1, 0, T0);
        let mint = Pubkey::new_unique();
        l.pool.drop_fees(mint, Pubkey::new_unique(), 1).unwrap();
        assert!(l.pool.drop_fees(mint, Pubkey::new_unique(), 1).is_err());

        while l.pool.reward_tokens.len() < MAX_REWARD_TOKENS {
            l.pool.drop_fees(Pubkey::new_unique(), Pubkey::new_unique(), 1).unwrap();
        }
        let err = l.pool.drop_fees(Pubkey::new_unique(), Pubkey::new_unique(), 1).unwrap_err();
        assert_eq!(err, Error::from(StakingError::RewardTokenLimit));
    }

    #[test]
    fn pending_is_conserved_up_to_truncation_dust() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut users: Vec<Position> = (0..3).map(|_| l.position()).collect();
        let stakes = [7u64, 13, 29];
        for (u, s) in users.iter_mut().zip(stakes) {
            l.stake(u, s, 0, T0);
        }
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        let drops = [1_000u64, 333, 17, 90_001, 5];
        let mut dropped = 0;
        for (i, amount) in drops.iter().enumerate() {
            l.pool.drop_fees(mint, vault, *amount).unwrap();
            dropped += amount;
            // Reshuffle shares between drops; settlement precedes every change.
            l.stake(&mut users[i % 3], 3, 0, T0 + i as i64 + 1);
        }
        let owed: u64 = users.iter_mut().map(|u| settled_owed(&l, u, 0)).sum();
        assert!(owed <= dropped);
        assert!(dropped - owed <= drops.len() as u64 + users.len() as u64);
        assert_eq!(l.pool.reward_tokens[0].resident, dropped);
    }

    #[test]
    fn daily_yield_reports_resident_per_share_per_day() {
        let mut l = Ledger::new(StakingMode::Single);
        assert!(l.pool.daily_yield(T0).unwrap().is_empty());
        let mut u = l.position();
        l.stake(&mut u, 100, 0, T0);
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.pool.drop_fees(mint, vault, 10).unwrap();

        let now = l.pool.daily_yield(T0).unwrap();
        assert_eq!(now.len(), 1);
        assert_eq!(now[0].rate, 0);
        assert!(rate_eq(l.pool.daily_yield(T0 + DAY).unwrap()[0].rate, 1_000));

        l.pool.release(0, 5).unwrap();
        assert_eq!(l.pool.reward_tokens[0], RewardToken { mint, vault, per_share: Q64 / 10, resident: 5 });
        assert!(rate_eq(l.pool.daily_yield(T0 + DAY).unwrap()[0].rate, 500));
    }

    #[test]
    fn router_fees_pending_at_entry_go_to_existing_stakers() {
        let mut l = Ledger::new(StakingMode::Single);
        let (mut u1, mut u2) = (l.position(), l.position());
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.stake(&mut u1, 100, 0, T0);
        l.pool.drop_fees(mint, vault, 100).unwrap();

        let pending = [FeeInflow { mint, vault, amount: 1_000 }];
        increase_stake(&mut l.pool, &mut l.queue, &mut u2, &pending, 100, 0, T0 + 5).unwrap();
        assert_eq!(settled_owed(&l, &mut u2, 0), 0);
        assert_eq!(settled_owed(&l, &mut u1, 0), 1_100);

        l.pool.drop_fees(mint, vault, 1_000).unwrap();
        assert_eq!(settled_owed(&l, &mut u2, 0), 500);
        assert_eq!(settled_owed(&l, &mut u1, 0), 1_600);
    }

    #[test]
    fn router_fees_pending_at_exit_reach_the_leaving_staker() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut u = l.position();
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.stake(&mut u, 100, 0, T0);

        let pending = [
            FeeInflow { mint, vault, amount: 300 },
            FeeInflow { mint: NATIVE_MINT, vault: NATIVE_MINT, amount: 400 },
        ];
        decrease_stake(&mut l.pool, &mut l.queue, &mut u, &pending, 100, 0, T0 + 5).unwrap();
        assert_eq!(u.rewards[0].owed, 300);
        assert_eq!(u.rewards[1].owed, 400);
        assert_eq!(l.pool.total_primary, 0);

        // Nobody is left to credit, so later router balances stay put.
        let late = [FeeInflow { mint, vault, amount: 70 }];
        assert_eq!(book_inflows(&mut l.pool, &late).unwrap(), vec![FeeDrop::Ignored]);
        assert_eq!(l.pool.reward_tokens[0].resident, 300);
    }

    #[test]
    fn claim_books_pending_router_fees_before_paying() {
        let mut l = Ledger::new(StakingMode::Dual);
        let mut u = l.position();
        l.stake(&mut u, 100, 20, T0);
        let pending = [
            FeeInflow { mint: l.pool.secondary_mint, vault: l.pool.secondary_vault, amount: 10 },
            FeeInflow { mint: NATIVE_MINT, vault: NATIVE_MINT, amount: 60 },
        ];
        let paid = claim(&mut l.pool, &mut l.queue, &mut u, &pending, false, T0 + DAY).unwrap();
        assert_eq!(paid, 10);
        assert_eq!(u.rewards[0].owed, 60);
        assert_eq!(l.pool.primary_fees_in_pool, 0);
    }

    #[test]
    fn registered_token_drop_after_full_exit_leaves_registry_untouched() {
        let mut l = Ledger::new(StakingMode::Single);
        let (mut u1, mut u2) = (l.position(), l.position());
        let (mint, vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        l.stake(&mut u1, 30, 0, T0);
        l.stake(&mut u2, 70, 0, T0);
        l.pool.drop_fees(mint, vault, 1_000).unwrap();
        l.unstake(&mut u1, 30, 0, T0 + 1);
        l.unstake(&mut u2, 70, 0, T0 + 2);
        assert_eq!(l.pool.share_basis(), 0);

        let before = l.pool.reward_tokens[0];
        assert_eq!(l.pool.drop_fees(mint, vault, 500).unwrap(), FeeDrop::Ignored);
        assert_eq!(l.pool.reward_tokens[0].per_share, before.per_share);
        assert_eq!(l.pool.reward_tokens[0].resident, before.resident);
        assert_eq!(l.pool.reward_tokens.len(), 1);
    }

    #[test]
    fn release_rejects_underflow_and_unknown_tokens() {
        let mut l = Ledger::new(StakingMode::Single);
        let mut u = l.position();
        l.stake(&mut u, 10, 0, T0);
        l.pool.drop_fees(Pubkey::new_unique(), Pubkey::new_unique(), 8).unwrap();

        let err = l.pool.release(0, 9).unwrap_err();
        assert_eq!(err, Error::from(StakingError::MathOverflow));
        assert_eq!(l.pool.reward_tokens[0].resident, 8);
        let err = l.pool.release(1, 1).unwrap_err();
        assert_eq!(err, Error::from(StakingError::InvalidRequest));
        l.pool.release(0, 8).unwrap();
        assert_eq!(l.pool.reward_tokens[0].resident, 0);
    }
}
