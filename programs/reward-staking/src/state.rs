use anchor_lang::prelude::*;
use crate::{constants::*, error::StakingError};

// ─── Shared value types ────────────────────────────────────────────────────

/// Dual: primary + secondary locked; secondary-mint fees are paid by the
/// clock-based daily rate, every other reward token pro-rata to locked secondary.
/// Single: primary only; every reward token pro-rata to locked primary.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakingMode {
    Dual,
    Single,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAmount {
    pub mint: Pubkey,
    pub amount: u64,
}

/// Per-day yield of one reward token per staked unit, scaled by RATE_PRECISION
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRate {
    pub mint: Pubkey,
    pub rate: u128,
}

/// Return data of the `projected_earnings` view
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Earnings {
    /// Primary reward asset a claim would pay right now (Dual only)
    pub primary: u64,
    /// Owed + pending per reward token, registry order
    pub rewards: Vec<TokenAmount>,
}

/// What the ledger does with a fee drop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeDrop {
    /// Dual-mode primary reward asset: added to `primary_fees_in_pool`
    PrimaryAsset,
    /// Credited to the accumulator at this registry index
    Accrued(usize),
    /// Zero amount or nothing locked; funds stay with the sender
    Ignored,
}

/// A router balance booked into the pool ahead of a stake change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeInflow {
    pub mint: Pubkey,
    /// Custody account the amount lands in; NATIVE_MINT for lamports
    pub vault: Pubkey,
    pub amount: u64,
}

// ─── Reward registry ───────────────────────────────────────────────────────
// Append-only. Index i in the registry matches index i of every
// Position::rewards vector.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardToken {
    /// Mint, or NATIVE_MINT for lamports
    pub mint: Pubkey,        // 32
    /// Token account holding the balance; NATIVE_MINT for lamports on the pool
    pub vault: Pubkey,       // 32
    /// Cumulative reward per unit of share, Q64.64 fixed-point
    pub per_share: u128,     // 16
    /// Dropped but not yet paid out
    pub resident: u64,       // 8
}

impl RewardToken {
    pub const LEN: usize = 88;
}

// ─── StakingPool ───────────────────────────────────────────────────────────
// One per primary mint. The PDA authority owns every vault.
#[account]
pub struct StakingPool {
    /// May change `reward_gateway`
    pub owner: Pubkey,                   // 32
    /// Only signer accepted by `drop_fees` / gateway authority accepted by `sweep_fees`
    pub reward_gateway: Pubkey,          // 32
    pub mode: StakingMode,               // 1
    pub authority: Pubkey,               // 32
    pub authority_bump: u8,              // 1
    pub primary_mint: Pubkey,            // 32
    pub primary_vault: Pubkey,           // 32
    /// Pubkey::default() in Single mode
    pub secondary_mint: Pubkey,          // 32
    pub secondary_vault: Pubkey,         // 32
    pub total_primary: u64,              // 8
    pub total_secondary: u64,            // 8
    /// Oldest `start` among active positions, 0 when none
    pub pool_start: i64,                 // 8
    /// Dual only: unpaid primary reward asset sitting in the secondary vault
    pub primary_fees_in_pool: u64,       // 8
    pub queue: Pubkey,                   // 32
    pub queue_bump: u8,                  // 1
    pub bump: u8,                        // 1
    pub reward_tokens: Vec<RewardToken>, // 4 + 16 * 88
}

impl StakingPool {
    // 8 + 32+32+1+32+1+32+32+32+32+8+8+8+8+32+1+1 + 4 = 304, plus the registry
    pub const LEN: usize = 304 + MAX_REWARD_TOKENS * RewardToken::LEN;

    /// Locked amount that reward-token accumulators are divided by.
    pub fn share_basis(&self) -> u64 {
        match self.mode {
            StakingMode::Dual => self.total_secondary,
            StakingMode::Single => self.total_primary,
        }
    }

    pub fn is_primary_reward(&self, mint: &Pubkey) -> bool {
        self.mode == StakingMode::Dual && *mint == self.secondary_mint
    }

    pub fn reward_index(&self, mint: &Pubkey) -> Option<usize> {
        self.reward_tokens.iter().position(|t| t.mint == *mint)
    }

    pub fn invalid_stake(&self) -> StakingError {
        match self.mode {
            StakingMode::Dual => StakingError::InvalidStake,
            StakingMode::Single => StakingError::InvalidRequest,
        }
    }

    pub fn invalid_unstake(&self) -> StakingError {
        match self.mode {
            StakingMode::Dual => StakingError::InvalidUnstake,
            StakingMode::Single => StakingError::InvalidRequest,
        }
    }

    /// Decide how a drop of `amount` would be booked, without booking it.
    /// Sweeps call this first so ignored balances never leave the router.
    pub fn classify_drop(&self, mint: &Pubkey, amount: u64) -> FeeDrop {
        if amount == 0 {
            return FeeDrop::Ignored;
        }
        if self.is_primary_reward(mint) {
            return FeeDrop::PrimaryAsset;
        }
        if self.share_basis() == 0 {
            return FeeDrop::Ignored;
        }
        FeeDrop::Accrued(self.reward_index(mint).unwrap_or(self.reward_tokens.len()))
    }

    /// Book a fee drop. A first-seen mint is appended to the registry with
    /// `vault` as its custody account; later drops must name the same vault.
    pub fn drop_fees(&mut self, mint: Pubkey, vault: Pubkey, amount: u64) -> Result<FeeDrop> {
        let outcome = self.classify_drop(&mint, amount);
        match outcome {
            FeeDrop::Ignored => {}
            FeeDrop::PrimaryAsset => {
                self.primary_fees_in_pool = self
                    .primary_fees_in_pool
                    .checked_add(amount)
                    .ok_or(StakingError::MathOverflow)?;
            }
            FeeDrop::Accrued(index) => {
                if index == self.reward_tokens.len() {
                    require!(index < MAX_REWARD_TOKENS, StakingError::RewardTokenLimit);
                    self.reward_tokens.push(RewardToken { mint, vault, per_share: 0, resident: 0 });
                }
                let delta = per_share_delta(amount, self.share_basis())?;
                let token = &mut self.reward_tokens[index];
                require_keys_eq!(token.vault, vault, StakingError::VaultMismatch);
                token.per_share = token
                    .per_share
                    .checked_add(delta)
                    .ok_or(StakingError::MathOverflow)?;
                token.resident = token
                    .resident
                    .checked_add(amount)
                    .ok_or(StakingError::MathOverflow)?;
            }
        }
        Ok(outcome)
    }

    /// Record that `amount` of registry token `index` left the pool.
    pub fn release(&mut self, index: usize, amount: u64) -> Result<()> {
        let token = self
            .reward_tokens
            .get_mut(index)
            .ok_or(StakingError::InvalidRequest)?;
        token.resident = token
            .resident
            .checked_sub(amount)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Secondary-mint fees per primary unit per day, scaled by RATE_PRECISION. Zero outside Dual mode.
    pub fn daily_rate(&self, now: i64) -> Result<u128> {
        if self.mode != StakingMode::Dual {
            return Ok(0);
        }
        rate_per_day(self.primary_fees_in_pool, self.total_primary, self.pool_start, now)
    }

    /// Resident amount of every reward token per unit of share per day.
    pub fn daily_yield(&self, now: i64) -> Result<Vec<TokenRate>> {
        self.reward_tokens
            .iter()
            .map(|t| {
                Ok(TokenRate {
                    mint: t.mint,
                    rate: rate_per_day(t.resident, self.share_basis(), self.pool_start, now)?,
                })
            })
            .collect()
    }

    /// Primary reward asset owed to `position` by the pool-wide daily rate,
    /// capped at what the pool holds.
    pub fn projected_primary(&self, position: &Position, now: i64) -> Result<u64> {
        if self.mode != StakingMode::Dual || !position.is_active() || position.start == 0 {
            return Ok(0);
        }
        let rate = self.daily_rate(now)?;
        let tenure = now.saturating_sub(position.start).max(0) as u128;
        let earned = rate
            .checked_mul(position.primary_amount as u128)
            .ok_or(StakingError::MathOverflow)?
            .checked_mul(tenure)
            .ok_or(StakingError::MathOverflow)?
            / (DAY as u128 * RATE_PRECISION);
        Ok(earned.min(self.primary_fees_in_pool as u128) as u64)
    }

    pub fn projected_earnings(&self, position: &Position, now: i64) -> Result<Earnings> {
        Ok(Earnings {
            primary: self.projected_primary(position, now)?,
            rewards: position.pending(self)?,
        })
    }
}

// ─── Position ──────────────────────────────────────────────────────────────
// One per (pool, owner). Never closed: checkpoints survive a full exit.
#[account]
#[derive(Default)]
pub struct Position {
    pub owner: Pubkey,                      // 32
    pub pool: Pubkey,                       // 32
    pub primary_amount: u64,                // 8
    /// Always 0 in Single mode
    pub secondary_amount: u64,              // 8
    /// Start of the current accrual window; 0 while inactive
    pub start: i64,                         // 8
    pub bump: u8,                           // 1
    pub rewards: Vec<RewardCheckpoint>,     // 4 + 16 * 56
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardCheckpoint {
    pub mint: Pubkey,        // 32
    /// Accumulator value at last settlement, Q64.64
    pub checkpoint: u128,    // 16
    /// Settled but not yet transferred
    pub owed: u64,           // 8
}

impl Position {
    // 8 + 32+32+8+8+8+1 + 4 = 101, plus the checkpoints
    pub const LEN: usize = 101 + MAX_REWARD_TOKENS * 56;

    pub fn is_active(&self) -> bool {
        self.primary_amount > 0 || self.secondary_amount > 0
    }

    pub fn share(&self, mode: StakingMode) -> u64 {
        match mode {
            StakingMode::Dual => self.secondary_amount,
            StakingMode::Single => self.primary_amount,
        }
    }

    /// Move accrual since the last settlement into `owed` and checkpoint
    /// every registry token at its current accumulator.
    /// Call before any change to the locked amounts.
    pub fn settle_rewards(&mut self, pool: &StakingPool) -> Result<()> {
        let share = self.share(pool.mode);
        for (i, token) in pool.reward_tokens.iter().enumerate() {
            if i == self.rewards.len() {
                // Registered after our last settlement: accrual started at zero.
                self.rewards.push(RewardCheckpoint { mint: token.mint, ..Default::default() });
            }
            let entry = &mut self.rewards[i];
            let pending = accrued(share, token.per_share, entry.checkpoint)?;
            entry.owed = entry.owed.checked_add(pending).ok_or(StakingError::MathOverflow)?;
            entry.checkpoint = token.per_share;
        }
        Ok(())
    }

    /// Owed plus not-yet-settled accrual per registry token. Read-only.
    pub fn pending(&self, pool: &StakingPool) -> Result<Vec<TokenAmount>> {
        let share = self.share(pool.mode);
        pool.reward_tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let (checkpoint, owed) = self
                    .rewards
                    .get(i)
                    .map_or((0, 0), |e| (e.checkpoint, e.owed));
                let amount = owed
                    .checked_add(accrued(share, token.per_share, checkpoint)?)
                    .ok_or(StakingError::MathOverflow)?;
                Ok(TokenAmount { mint: token.mint, amount })
            })
            .collect()
    }

    /// Zero and return the owed balance of registry token `index`.
    pub fn take_owed(&mut self, index: usize) -> u64 {
        self.rewards
            .get_mut(index)
            .map_or(0, |e| std::mem::take(&mut e.owed))
    }
}

// ─── StakerQueue ───────────────────────────────────────────────────────────
// Oldest-active-start tracker: a lazy-deletion monotonic queue.
// Entries are appended in non-decreasing `start` order; `head` always sits on
// the oldest live entry (or the vector is empty). The account has no entry
// cap: instructions that may push grow it by one entry, paid by the staker.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueEntry {
    pub owner: Pubkey,   // 32
    pub start: i64,      // 8
    pub live: bool,      // 1
}

#[account]
pub struct StakerQueue {
    pub pool: Pubkey,              // 32
    pub head: u32,                 // 4
    pub bump: u8,                  // 1
    pub entries: Vec<QueueEntry>,  // 4 + n * 41
}

impl StakerQueue {
    pub const ENTRY_LEN: usize = 41;

    /// Account size holding `entries` entries: 8 + 32+4+1 + 4 = 49, plus the entries.
    pub fn space(entries: usize) -> usize {
        49 + entries * Self::ENTRY_LEN
    }

    /// Account size needed before an instruction that may push one entry.
    /// Never shrinks the account.
    pub fn space_for_push(&self, current: usize) -> usize {
        current.max(Self::space(self.entries.len() + 1))
    }

    /// Append `owner` starting at `now`. Returns the stamped start, which is
    /// never below the current tail so ordering survives a repeated clock.
    /// Tombstones are dropped once they make up half the queue.
    pub fn push(&mut self, owner: Pubkey, now: i64) -> i64 {
        let start = self.entries.last().map_or(now, |tail| tail.start.max(now));
        if self.entries.len() >= QUEUE_COMPACT_MIN && self.live_len() * 2 <= self.entries.len() {
            self.compact();
        }
        self.entries.push(QueueEntry { owner, start, live: true });
        start
    }

    /// Tombstone the live entry of `owner` stamped `start`.
    pub fn retire(&mut self, owner: &Pubkey, start: i64) {
        let head = (self.head as usize).min(self.entries.len());
        let from = head + self.entries[head..].partition_point(|e| e.start < start);
        if let Some(entry) = self.entries[from..]
            .iter_mut()
            .take_while(|e| e.start == start)
            .find(|e| e.live && e.owner == *owner)
        {
            entry.live = false;
        }
        self.advance_head();
    }

    pub fn oldest_start(&self) -> i64 {
        self.entries.get(self.head as usize).map_or(0, |e| e.start)
    }

    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|e| e.live).count()
    }

    fn advance_head(&mut self) {
        let mut head = self.head as usize;
        while head < self.entries.len() && !self.entries[head].live {
            head += 1;
        }
        if head >= self.entries.len() {
            self.entries.clear();
            head = 0;
        }
        self.head = head as u32;
    }

    fn compact(&mut self) {
        self.entries.retain(|e| e.live);
        self.head = 0;
    }
}

// ─── RewardGateway ─────────────────────────────────────────────────────────
// Fee router for one pool. Its authority PDA receives lamports and owns the
// router's token accounts.
#[account]
pub struct RewardGateway {
    /// May airdrop and manage the reward-mint set
    pub operator: Pubkey,            // 32
    pub pool: Pubkey,                // 32
    pub authority: Pubkey,           // 32
    pub authority_bump: u8,          // 1
    /// Burned on liquidation; always sweepable as a fee asset
    pub debt_mint: Pubkey,           // 32
    /// External program implementing `liquidate_vault`
    pub vault_manager: Pubkey,       // 32
    pub bump: u8,                    // 1
    pub reward_mints: Vec<Pubkey>,   // 4 + 16 * 32
}

impl RewardGateway {
    // 8 + 32+32+32+1+32+32+1 + 4 = 174, plus the mint set
    pub const LEN: usize = 174 + MAX_REWARD_TOKENS * 32;

    pub fn manages(&self, mint: &Pubkey) -> bool {
        *mint == self.debt_mint || self.reward_mints.contains(mint)
    }

    /// Debt mint first, then the reward-mint set without repeats. Stake
    /// changes expect one router token account per entry, in this order.
    pub fn managed_mints(&self) -> Vec<Pubkey> {
        let mut mints = vec![self.debt_mint];
        for mint in &self.reward_mints {
            if !mints.contains(mint) {
                mints.push(*mint);
            }
        }
        mints
    }
}

// ─── Fixed-point helpers ───────────────────────────────────────────────────

/// `amount / basis` as Q64.64. Divide-first to avoid u128 overflow:
/// q * Q64 + r * Q64 / basis
pub fn per_share_delta(amount: u64, basis: u64) -> Result<u128> {
    require!(basis > 0, StakingError::MathOverflow);
    let amount = amount as u128;
    let basis = basis as u128;
    let q = amount / basis;
    let r = amount % basis;
    q.checked_mul(Q64)
        .ok_or(StakingError::MathOverflow)?
        .checked_add(r * Q64 / basis)
        .ok_or_else(|| error!(StakingError::MathOverflow))
}

/// share * (per_share - checkpoint) >> 64
pub fn accrued(share: u64, per_share: u128, checkpoint: u128) -> Result<u64> {
    let delta = per_share.saturating_sub(checkpoint);
    let owed = (share as u128)
        .checked_mul(delta)
        .ok_or(StakingError::MathOverflow)?
        >> 64;
    u64::try_from(owed).map_err(|_| error!(StakingError::MathOverflow))
}

/// amount / staked / elapsed days, scaled by RATE_PRECISION.
/// Zero with nothing staked, no start, or no elapsed time.
pub fn rate_per_day(amount: u64, staked: u64, since: i64, now: i64) -> Result<u128> {
    if staked == 0 || since == 0 || now <= since {
        return Ok(0);
    }
    let elapsed = (now - since) as u128;
    let numerator = (amount as u128)
        .checked_mul(RATE_PRECISION)
        .ok_or(StakingError::MathOverflow)?
        .checked_mul(DAY as u128)
        .ok_or(StakingError::MathOverflow)?;
    let denominator = (staked as u128)
        .checked_mul(elapsed)
        .ok_or(StakingError::MathOverflow)?;
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_queue() -> StakerQueue {
        StakerQueue { pool: Pubkey::default(), head: 0, bump: 0, entries: vec![] }
    }

    #[test]
    fn queue_tracks_oldest_live_entry() {
        let mut q = empty_queue();
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(q.oldest_start(), 0);

        q.push(a, 100);
        q.push(b, 160);
        q.push(c, 220);
        assert_eq!(q.oldest_start(), 100);

        q.retire(&b, 160);
        assert_eq!(q.oldest_start(), 100);
        q.retire(&a, 100);
        assert_eq!(q.oldest_start(), 220);
        q.retire(&c, 220);
        assert_eq!(q.oldest_start(), 0);
        assert!(q.entries.is_empty());
        assert_eq!(q.head, 0);
    }

    #[test]
    fn queue_stamps_never_go_backwards() {
        let mut q = empty_queue();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(q.push(a, 500), 500);
        assert_eq!(q.push(b, 499), 500);
        q.retire(&b, 500);
        assert_eq!(q.live_len(), 1);
        q.retire(&a, 500);
        assert_eq!(q.oldest_start(), 0);
    }

    #[test]
    fn queue_retire_matches_owner_within_equal_starts() {
        let mut q = empty_queue();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        q.push(a, 10);
        q.push(b, 10);
        q.retire(&b, 10);
        assert_eq!(q.live_len(), 1);
        assert_eq!(q.oldest_start(), 10);
        assert!(q.entries[0].live);
        assert!(!q.entries[1].live);
    }

    #[test]
    fn queue_compacts_once_tombstones_dominate() {
        let mut q = empty_queue();
        let keep = Pubkey::new_unique();
        q.push(keep, 1);
        // Every churn entry is superseded as soon as the next one lands.
        let churn = Pubkey::new_unique();
        let mut start = q.push(churn, 2);
        for t in 3..(QUEUE_COMPACT_MIN as i64 + 2) {
            q.retire(&churn, start);
            start = q.push(churn, t);
        }
        assert!(q.entries.len() < QUEUE_COMPACT_MIN);
        assert_eq!(q.live_len(), 2);
        assert_eq!(q.oldest_start(), 1);
        assert_eq!(q.entries[0].owner, keep);
        assert_eq!(q.head, 0);
    }

    #[test]
    fn queue_admits_stakers_past_initial_room() {
        let mut q = empty_queue();
        let owners: Vec<Pubkey> = (0..1_000).map(|_| Pubkey::new_unique()).collect();
        for (t, owner) in owners.iter().enumerate() {
            q.push(*owner, t as i64 + 1);
        }
        assert_eq!(q.live_len(), 1_000);
        assert_eq!(q.oldest_start(), 1);

        q.retire(&owners[0], 1);
        assert_eq!(q.oldest_start(), 2);
        assert_eq!(q.live_len(), 999);
    }

    #[test]
    fn queue_space_matches_serialized_size() {
        let mut q = empty_queue();
        let mut data = Vec::new();
        q.serialize(&mut data).unwrap();
        assert_eq!(data.len() + 8, StakerQueue::space(0));

        for t in 0..QUEUE_INITIAL_ENTRIES as i64 + 5 {
            q.push(Pubkey::new_unique(), t);
        }
        let mut data = Vec::new();
        q.serialize(&mut data).unwrap();
        assert_eq!(data.len() + 8, StakerQueue::space(q.entries.len()));

        let current = StakerQueue::space(QUEUE_INITIAL_ENTRIES);
        assert_eq!(q.space_for_push(current), StakerQueue::space(QUEUE_INITIAL_ENTRIES + 6));
        assert_eq!(q.space_for_push(usize::MAX), usize::MAX);
    }

    #[test]
    fn gateway_managed_mints_put_debt_mint_first_without_repeats() {
        let (debt, a, b) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let gateway = RewardGateway {
            operator: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            authority_bump: 255,
            debt_mint: debt,
            vault_manager: Pubkey::new_unique(),
            bump: 255,
            reward_mints: vec![a, debt, b, a],
        };
        assert_eq!(gateway.managed_mints(), vec![debt, a, b]);
        assert!(gateway.manages(&b));
    }

    #[test]
    fn per_share_delta_is_exact_for_even_splits() {
        assert_eq!(per_share_delta(400, 400).unwrap(), Q64);
        assert_eq!(per_share_delta(7_000, 400).unwrap(), Q64 * 17 + Q64 / 2);
        assert!(per_share_delta(1, 0).is_err());
    }

    #[test]
    fn accrued_truncates_toward_zero() {
        let delta = per_share_delta(10, 3).unwrap();
        assert_eq!(accrued(1, delta, 0).unwrap(), 3);
        assert_eq!(accrued(3, delta, 0).unwrap(), 9);
        assert_eq!(accrued(3, delta, delta).unwrap(), 0);
    }

    #[test]
    fn rate_is_zero_without_time_stake_or_start() {
        assert_eq!(rate_per_day(10, 100, 0, 1_000).unwrap(), 0);
        assert_eq!(rate_per_day(10, 0, 1, 1_000).unwrap(), 0);
        assert_eq!(rate_per_day(10, 100, 1_000, 1_000).unwrap(), 0);
    }

    #[test]
    fn doubling_stake_halves_rate() {
        let one = rate_per_day(10, 100, 1, 1 + DAY).unwrap();
        let two = rate_per_day(10, 200, 1, 1 + DAY).unwrap();
        assert_eq!(one, RATE_PRECISION / 10);
        assert_eq!(two * 2, one);
    }

    #[test]
    fn gateway_manages_debt_mint_and_configured_set() {
        let debt = Pubkey::new_unique();
        let extra = Pubkey::new_unique();
        let gw = RewardGateway {
            operator: Pubkey::default(),
            pool: Pubkey::default(),
            authority: Pubkey::default(),
            authority_bump: 0,
            debt_mint: debt,
            vault_manager: Pubkey::default(),
            bump: 0,
            reward_mints: vec![extra],
        };
        assert!(gw.manages(&debt));
        assert!(gw.manages(&extra));
        assert!(!gw.manages(&Pubkey::new_unique()));
    }
}
