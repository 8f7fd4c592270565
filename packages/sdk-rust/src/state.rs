//! On-chain account deserialization.
//!
//! Accounts are Borsh-encoded behind an 8-byte Anchor discriminator.  Every
//! program account ends in a `Vec`, so parsing walks a cursor instead of
//! fixed offsets; field order mirrors the `#[account]` structs exactly.

use solana_sdk::{hash::hash, pubkey::Pubkey};

use crate::{
    error::{Error, Result},
    types::StakingMode,
};

/// Anchor account discriminator: `sha256("account:{TypeName}")[..8]`.
pub fn account_disc(type_name: &str) -> [u8; 8] {
    let h = hash(format!("account:{type_name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&h.to_bytes()[..8]);
    out
}

// ─── StakingPool ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTokenState {
    pub mint:      Pubkey,
    pub vault:     Pubkey,
    /// Cumulative reward per unit of share, Q64.64 fixed-point.
    pub per_share: u128,
    pub resident:  u64,
}

/// Deserialized `StakingPool` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  reward_gateway(32)  mode(1)  authority(32)  authority_bump(1)
/// primary_mint(32)  primary_vault(32)  secondary_mint(32)  secondary_vault(32)
/// total_primary(8)  total_secondary(8)  pool_start(8)  primary_fees_in_pool(8)
/// queue(32)  queue_bump(1)  bump(1)  reward_tokens(4 + n * 88)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub owner:                Pubkey,
    pub reward_gateway:       Pubkey,
    pub mode:                 StakingMode,
    pub authority:            Pubkey,
    pub primary_mint:         Pubkey,
    pub primary_vault:        Pubkey,
    pub secondary_mint:       Pubkey,
    pub secondary_vault:      Pubkey,
    pub total_primary:        u64,
    pub total_secondary:      u64,
    pub pool_start:           i64,
    pub primary_fees_in_pool: u64,
    pub queue:                Pubkey,
    pub reward_tokens:        Vec<RewardTokenState>,
}

impl PoolState {
    /// Locked amount reward-token accumulators are divided by.
    pub fn share_basis(&self) -> u64 {
        match self.mode {
            StakingMode::Dual   => self.total_secondary,
            StakingMode::Single => self.total_primary,
        }
    }
}

/// Deserialize a `StakingPool` account from raw bytes.
pub fn parse_pool(data: &[u8]) -> Result<PoolState> {
    let mut c = Cursor::account(data, "StakingPool")?;
    let owner          = c.pubkey()?;
    let reward_gateway = c.pubkey()?;
    let mode           = c.mode()?;
    let authority      = c.pubkey()?;
    c.skip(1)?; // authority_bump
    let primary_mint    = c.pubkey()?;
    let primary_vault   = c.pubkey()?;
    let secondary_mint  = c.pubkey()?;
    let secondary_vault = c.pubkey()?;
    let total_primary        = c.u64()?;
    let total_secondary      = c.u64()?;
    let pool_start           = c.i64()?;
    let primary_fees_in_pool = c.u64()?;
    let queue = c.pubkey()?;
    c.skip(2)?; // queue_bump, bump
    let reward_tokens = c.vec(|c| {
        Ok(RewardTokenState {
            mint:      c.pubkey()?,
            vault:     c.pubkey()?,
            per_share: c.u128()?,
            resident:  c.u64()?,
        })
    })?;

    Ok(PoolState {
        owner,
        reward_gateway,
        mode,
        authority,
        primary_mint,
        primary_vault,
        secondary_mint,
        secondary_vault,
        total_primary,
        total_secondary,
        pool_start,
        primary_fees_in_pool,
        queue,
        reward_tokens,
    })
}

// ─── Position ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckpointState {
    pub mint:       Pubkey,
    /// Accumulator value at last settlement, Q64.64.
    pub checkpoint: u128,
    /// Settled but not yet transferred.
    pub owed:       u64,
}

/// Deserialized `Position` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  pool(32)  primary_amount(8)  secondary_amount(8)  start(8)
/// bump(1)  rewards(4 + n * 56)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    pub owner:            Pubkey,
    pub pool:             Pubkey,
    pub primary_amount:   u64,
    pub secondary_amount: u64,
    pub start:            i64,
    pub rewards:          Vec<CheckpointState>,
}

impl PositionState {
    pub fn is_active(&self) -> bool {
        self.primary_amount > 0 || self.secondary_amount > 0
    }

    pub fn share(&self, mode: StakingMode) -> u64 {
        match mode {
            StakingMode::Dual   => self.secondary_amount,
            StakingMode::Single => self.primary_amount,
        }
    }
}

/// Deserialize a `Position` account from raw bytes.
pub fn parse_position(data: &[u8]) -> Result<PositionState> {
    let mut c = Cursor::account(data, "Position")?;
    let owner            = c.pubkey()?;
    let pool             = c.pubkey()?;
    let primary_amount   = c.u64()?;
    let secondary_amount = c.u64()?;
    let start            = c.i64()?;
    c.skip(1)?; // bump
    let rewards = c.vec(|c| {
        Ok(CheckpointState {
            mint:       c.pubkey()?,
            checkpoint: c.u128()?,
            owed:       c.u64()?,
        })
    })?;

    Ok(PositionState { owner, pool, primary_amount, secondary_amount, start, rewards })
}

// ─── StakerQueue ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntryState {
    pub owner: Pubkey,
    pub start: i64,
    pub live:  bool,
}

/// Deserialized `StakerQueue` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// pool(32)  head(4)  bump(1)  entries(4 + n * 41)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueState {
    pub pool:    Pubkey,
    pub head:    u32,
    pub entries: Vec<QueueEntryState>,
}

impl QueueState {
    /// Live entries from the head on, oldest start first.
    pub fn live(&self) -> impl Iterator<Item = &QueueEntryState> {
        self.entries
            .iter()
            .skip(self.head as usize)
            .filter(|e| e.live)
    }
}

/// Deserialize a `StakerQueue` account from raw bytes.
pub fn parse_queue(data: &[u8]) -> Result<QueueState> {
    let mut c = Cursor::account(data, "StakerQueue")?;
    let pool = c.pubkey()?;
    let head = c.u32()?;
    c.skip(1)?; // bump
    let entries = c.vec(|c| {
        Ok(QueueEntryState {
            owner: c.pubkey()?,
            start: c.i64()?,
            live:  c.bool()?,
        })
    })?;
    Ok(QueueState { pool, head, entries })
}

// ─── RewardGateway ────────────────────────────────────────────────────────────

/// Deserialized `RewardGateway` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// operator(32)  pool(32)  authority(32)  authority_bump(1)  debt_mint(32)
/// vault_manager(32)  bump(1)  reward_mints(4 + n * 32)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayState {
    pub operator:      Pubkey,
    pub pool:          Pubkey,
    pub authority:     Pubkey,
    pub debt_mint:     Pubkey,
    pub vault_manager: Pubkey,
    pub reward_mints:  Vec<Pubkey>,
}

impl GatewayState {
    /// Mints `sweep_fees` accepts.
    pub fn managed_mints(&self) -> Vec<Pubkey> {
        let mut mints = vec![self.debt_mint];
        mints.extend(self.reward_mints.iter().filter(|m| **m != self.debt_mint));
        mints
    }
}

/// Deserialize a `RewardGateway` account from raw bytes.
pub fn parse_gateway(data: &[u8]) -> Result<GatewayState> {
    let mut c = Cursor::account(data, "RewardGateway")?;
    let operator  = c.pubkey()?;
    let pool      = c.pubkey()?;
    let authority = c.pubkey()?;
    c.skip(1)?; // authority_bump
    let debt_mint     = c.pubkey()?;
    let vault_manager = c.pubkey()?;
    c.skip(1)?; // bump
    let reward_mints = c.vec(|c| c.pubkey())?;
    Ok(GatewayState { operator, pool, authority, debt_mint, vault_manager, reward_mints })
}

// ─── SPL token account / sysvars ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountState {
    pub mint:   Pubkey,
    pub owner:  Pubkey,
    pub amount: u64,
}

/// Read `mint`, `owner` and `amount` from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_account(data: &[u8]) -> Result<TokenAccountState> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    Ok(TokenAccountState {
        mint:   read_pubkey(data, 0)?,
        owner:  read_pubkey(data, 32)?,
        amount: read_u64(data, 64)?,
    })
}

/// `unix_timestamp` from the Clock sysvar.
///
/// Clock layout: `slot(8) epoch_start_timestamp(8) epoch(8) leader_schedule_epoch(8) unix_timestamp(8)`
pub fn parse_clock_timestamp(data: &[u8]) -> Result<i64> {
    read_u64(data, 32).map(|v| v as i64)
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

fn slice<'a>(data: &'a [u8], offset: usize, len: usize, what: &str) -> Result<&'a [u8]> {
    data.get(offset..offset + len).ok_or_else(|| Error::ParseError {
        offset,
        reason: format!("slice too short for {what} ({len} bytes)"),
    })
}

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let mut b = [0u8; 32];
    b.copy_from_slice(slice(data, offset, 32, "Pubkey")?);
    Ok(Pubkey::from(b))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let mut b = [0u8; 8];
    b.copy_from_slice(slice(data, offset, 8, "u64")?);
    Ok(u64::from_le_bytes(b))
}

struct Cursor<'a> {
    data:   &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Start after the discriminator, checking it matches `type_name`.
    fn account(data: &'a [u8], type_name: &str) -> Result<Self> {
        let disc = slice(data, 0, 8, "discriminator")?;
        if disc != account_disc(type_name) {
            return Err(Error::ParseError {
                offset: 0,
                reason: format!("not a {type_name} account"),
            });
        }
        Ok(Self { data, offset: 8 })
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let bytes = slice(self.data, self.offset, len, what)?;
        self.offset += len;
        Ok(bytes)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len, "padding").map(|_| ())
    }

    fn pubkey(&mut self) -> Result<Pubkey> {
        let mut b = [0u8; 32];
        b.copy_from_slice(self.take(32, "Pubkey")?);
        Ok(Pubkey::from(b))
    }

    fn u32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4, "u32")?);
        Ok(u32::from_le_bytes(b))
    }

    fn u64(&mut self) -> Result<u64> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8, "u64")?);
        Ok(u64::from_le_bytes(b))
    }

    fn i64(&mut self) -> Result<i64> {
        self.u64().map(|v| v as i64)
    }

    fn u128(&mut self) -> Result<u128> {
        let mut b = [0u8; 16];
        b.copy_from_slice(self.take(16, "u128")?);
        Ok(u128::from_le_bytes(b))
    }

    fn bool(&mut self) -> Result<bool> {
        Ok(self.take(1, "bool")?[0] != 0)
    }

    fn mode(&mut self) -> Result<StakingMode> {
        let offset = self.offset;
        match self.take(1, "StakingMode")?[0] {
            0 => Ok(StakingMode::Dual),
            1 => Ok(StakingMode::Single),
            v => Err(Error::ParseError { offset, reason: format!("unknown StakingMode {v}") }),
        }
    }

    fn vec<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let len = self.u32()? as usize;
        let mut out = Vec::with_capacity(len.min(256));
        for _ in 0..len {
            out.push(item(self)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn position_bytes(rewards: &[(Pubkey, u128, u64)]) -> Vec<u8> {
        let mut d = account_disc("Position").to_vec();
        d.extend_from_slice(key(1).as_ref());
        d.extend_from_slice(key(2).as_ref());
        d.extend_from_slice(&40u64.to_le_bytes());
        d.extend_from_slice(&7u64.to_le_bytes());
        d.extend_from_slice(&1_700_000_000i64.to_le_bytes());
        d.push(254);
        d.extend_from_slice(&(rewards.len() as u32).to_le_bytes());
        for (mint, checkpoint, owed) in rewards {
            d.extend_from_slice(mint.as_ref());
            d.extend_from_slice(&checkpoint.to_le_bytes());
            d.extend_from_slice(&owed.to_le_bytes());
        }
        // Anchor accounts are allocated at full size; trailing zeros follow.
        d.resize(d.len() + 64, 0);
        d
    }

    #[test]
    fn parses_position_with_checkpoints() {
        let data = position_bytes(&[(key(3), 1 << 64, 5), (key(4), 0, 0)]);
        let pos = parse_position(&data).unwrap();
        assert_eq!(pos.owner, key(1));
        assert_eq!(pos.pool, key(2));
        assert_eq!(pos.primary_amount, 40);
        assert_eq!(pos.secondary_amount, 7);
        assert_eq!(pos.start, 1_700_000_000);
        assert_eq!(pos.rewards.len(), 2);
        assert_eq!(pos.rewards[0], CheckpointState { mint: key(3), checkpoint: 1 << 64, owed: 5 });
        assert_eq!(pos.share(StakingMode::Dual), 7);
        assert_eq!(pos.share(StakingMode::Single), 40);
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let mut data = position_bytes(&[]);
        data[..8].copy_from_slice(&account_disc("StakingPool"));
        assert!(matches!(parse_position(&data), Err(Error::ParseError { offset: 0, .. })));
    }

    #[test]
    fn truncated_vec_is_a_parse_error() {
        let mut data = position_bytes(&[(key(3), 0, 0)]);
        data.truncate(8 + 32 + 32 + 8 + 8 + 8 + 1 + 4 + 10);
        assert!(matches!(parse_position(&data), Err(Error::ParseError { .. })));
    }

    #[test]
    fn queue_live_skips_tombstones_and_head() {
        let mut d = account_disc("StakerQueue").to_vec();
        d.extend_from_slice(key(9).as_ref());
        d.extend_from_slice(&1u32.to_le_bytes());
        d.push(255);
        d.extend_from_slice(&3u32.to_le_bytes());
        for (owner, start, live) in [(key(1), 10i64, false), (key(2), 20, true), (key(3), 30, false)] {
            d.extend_from_slice(owner.as_ref());
            d.extend_from_slice(&start.to_le_bytes());
            d.push(live as u8);
        }
        let queue = parse_queue(&d).unwrap();
        let live: Vec<_> = queue.live().map(|e| e.owner).collect();
        assert_eq!(live, vec![key(2)]);
    }

    #[test]
    fn gateway_managed_mints_lead_with_debt_mint() {
        let gateway = GatewayState {
            operator:      key(1),
            pool:          key(2),
            authority:     key(3),
            debt_mint:     key(4),
            vault_manager: key(5),
            reward_mints:  vec![key(6), key(4)],
        };
        assert_eq!(gateway.managed_mints(), vec![key(4), key(6)]);
    }
}
