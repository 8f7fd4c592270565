//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly.  Optional
//! accounts that are left out are passed as the program id, which is how
//! Anchor encodes `None`.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.
//! Anchor account discriminators:    `sha256("account:{TypeName}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey,
    pubkey::Pubkey,
    sysvar,
};

use crate::types::StakingMode;

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub const SPL_TOKEN_ID:   Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ATA_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Stand-in mint for native SOL rewards (lamports held on the pool account).
pub const NATIVE_MINT: Pubkey = Pubkey::new_from_array([0u8; 32]);

// ─── PDA seeds (mirrors programs/reward-staking/src/constants.rs) ────────────

pub const POOL_SEED:              &[u8] = b"staking_pool";
pub const POSITION_SEED:          &[u8] = b"position";
pub const POOL_AUTHORITY_SEED:    &[u8] = b"pool_authority";
pub const QUEUE_SEED:             &[u8] = b"staker_queue";
pub const REWARD_VAULT_SEED:      &[u8] = b"reward_vault";
pub const GATEWAY_SEED:           &[u8] = b"reward_gateway";
pub const GATEWAY_AUTHORITY_SEED: &[u8] = b"gateway_authority";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the staking pool PDA for a primary mint.
pub fn derive_pool(primary_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, primary_mint.as_ref()], program_id)
}

/// Derive the pool-authority PDA that owns every vault.
pub fn derive_pool_authority(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_AUTHORITY_SEED, pool.as_ref()], program_id)
}

/// Derive the staker queue PDA of a pool.
pub fn derive_queue(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[QUEUE_SEED, pool.as_ref()], program_id)
}

/// Derive the per-staker position PDA for a pool.
pub fn derive_position(pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the pool's custody account for `mint` fees.  In Dual mode the
/// secondary vault is the reward vault of the secondary mint.
pub fn derive_reward_vault(pool: &Pubkey, mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[REWARD_VAULT_SEED, pool.as_ref(), mint.as_ref()],
        program_id,
    )
}

/// Derive the reward gateway (fee router) PDA of a pool.
pub fn derive_gateway(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GATEWAY_SEED, pool.as_ref()], program_id)
}

/// Derive the gateway authority PDA: receives router fees and owns the
/// router's token accounts.
pub fn derive_gateway_authority(gateway: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GATEWAY_AUTHORITY_SEED, gateway.as_ref()], program_id)
}

/// Derive the Associated Token Account for a wallet + mint.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), SPL_TOKEN_ID.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_ID,
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&h.to_bytes()[..8]);
    out
}

fn optional(key: Option<&Pubkey>, program_id: &Pubkey) -> AccountMeta {
    match key {
        Some(k) => AccountMeta::new(*k, false),
        None    => AccountMeta::new_readonly(*program_id, false),
    }
}

fn pairs(pairs: &[(Pubkey, Pubkey)]) -> impl Iterator<Item = AccountMeta> + '_ {
    pairs
        .iter()
        .flat_map(|(a, b)| [AccountMeta::new(*a, false), AccountMeta::new(*b, false)])
}

/// Accounts shared by every stake-changing instruction.
#[derive(Debug, Clone, Copy)]
pub struct StakeAccounts<'a> {
    pub staker:        &'a Pubkey,
    pub pool:          &'a Pubkey,
    pub primary_vault: &'a Pubkey,
    pub staker_primary: &'a Pubkey,
    /// `(secondary_vault, staker_secondary)`; `None` for Single-mode pools.
    pub secondary:     Option<(&'a Pubkey, &'a Pubkey)>,
    /// `(router_ata, pool_vault)` per managed mint, in [`GatewayState::managed_mints`]
    /// order, when the pool routes fees through its gateway; `None` otherwise.
    ///
    /// [`GatewayState::managed_mints`]: crate::client::GatewayState::managed_mints
    pub router_pairs:  Option<&'a [(Pubkey, Pubkey)]>,
    /// `(pool_reward_vault, staker_token_account)` per reward token to pay out.
    pub reward_pairs:  &'a [(Pubkey, Pubkey)],
}

// ─── initialize_pool ─────────────────────────────────────────────────────────

/// Build the `initialize_pool` instruction.
///
/// `primary_vault` must be a fresh keypair; it is initialised as an SPL token
/// account owned by `pool_authority` and must sign the transaction.
/// `secondary_mint` is required for [`StakingMode::Dual`]; follow it with
/// [`open_reward_vault_ix`] for that mint to create the secondary vault.
pub fn initialize_pool_ix(
    program_id:     &Pubkey,
    creator:        &Pubkey,
    primary_mint:   &Pubkey,
    secondary_mint: Option<&Pubkey>,
    primary_vault:  &Pubkey,
    mode:           StakingMode,
) -> Instruction {
    let (pool, _)           = derive_pool(primary_mint, program_id);
    let (queue, _)          = derive_queue(&pool, program_id);
    let (pool_authority, _) = derive_pool_authority(&pool, program_id);

    let mut data = disc("initialize_pool").to_vec();
    data.push(mode as u8);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator,                true),   // mut + signer
            AccountMeta::new_readonly(*primary_mint,  false),
            AccountMeta::new_readonly(*secondary_mint.unwrap_or(program_id), false),
            AccountMeta::new(pool,                    false),  // mut PDA (init)
            AccountMeta::new(queue,                   false),  // mut PDA (init)
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(*primary_vault,          true),   // mut + signer (init)
            AccountMeta::new_readonly(SPL_TOKEN_ID,   false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data,
    }
}

// ─── set_reward_gateway ──────────────────────────────────────────────────────

/// Owner-only: set the key the pool accepts fee drops from.  For a
/// [`initialize_gateway_ix`] router pass its gateway *authority* PDA.
pub fn set_reward_gateway_ix(
    program_id:     &Pubkey,
    owner:          &Pubkey,
    pool:           &Pubkey,
    reward_gateway: &Pubkey,
) -> Instruction {
    let mut data = disc("set_reward_gateway").to_vec();
    data.extend_from_slice(reward_gateway.as_ref());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*pool,           false),
        ],
        data,
    }
}

// ─── open_reward_vault ───────────────────────────────────────────────────────

/// Create the pool's reward vault for `mint`.  Permissionless.
pub fn open_reward_vault_ix(
    program_id: &Pubkey,
    payer:      &Pubkey,
    pool:       &Pubkey,
    mint:       &Pubkey,
) -> Instruction {
    let (pool_authority, _) = derive_pool_authority(pool, program_id);
    let (vault, _)          = derive_reward_vault(pool, mint, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer,                  true),
            AccountMeta::new_readonly(*pool,          false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new_readonly(*mint,          false),
            AccountMeta::new(vault,                   false),  // mut PDA (init)
            AccountMeta::new_readonly(SPL_TOKEN_ID,   false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data: disc("open_reward_vault").to_vec(),
    }
}

// ─── increase_stake / decrease_stake / claim ─────────────────────────────────

fn stake_accounts(program_id: &Pubkey, a: &StakeAccounts<'_>) -> Vec<AccountMeta> {
    let (queue, _)          = derive_queue(a.pool, program_id);
    let (pool_authority, _) = derive_pool_authority(a.pool, program_id);
    let (position, _)       = derive_position(a.pool, a.staker, program_id);
    let (gateway, _)        = derive_gateway(a.pool, program_id);
    let (gateway_authority, _) = derive_gateway_authority(&gateway, program_id);
    let routed = a.router_pairs.is_some();
    vec![
        AccountMeta::new(*a.staker,               true),   // mut + signer
        AccountMeta::new(*a.pool,                 false),
        AccountMeta::new(queue,                   false),  // grows by one entry
        AccountMeta::new_readonly(pool_authority, false),
        AccountMeta::new(position,                false),
        AccountMeta::new(*a.primary_vault,        false),
        AccountMeta::new(*a.staker_primary,       false),
        optional(a.secondary.map(|(v, _)| v), program_id),
        optional(a.secondary.map(|(_, u)| u), program_id),
        if routed {
            AccountMeta::new_readonly(gateway, false)
        } else {
            AccountMeta::new_readonly(*program_id, false)
        },
        optional(routed.then_some(&gateway_authority), program_id),
        AccountMeta::new_readonly(SPL_TOKEN_ID,   false),
        AccountMeta::new_readonly(Pubkey::default(), false), // system program
    ]
}

/// Router pairs first, then payout pairs.
fn stake_remaining<'a>(a: &StakeAccounts<'a>) -> impl Iterator<Item = AccountMeta> + 'a {
    pairs(a.router_pairs.unwrap_or_default()).chain(pairs(a.reward_pairs))
}

/// Build the `increase_stake` instruction.  Creates the position on first use.
pub fn increase_stake_ix(
    program_id:       &Pubkey,
    accounts:         &StakeAccounts<'_>,
    primary_amount:   u64,
    secondary_amount: u64,
) -> Instruction {
    let mut data = disc("increase_stake").to_vec();
    data.extend_from_slice(&primary_amount.to_le_bytes());
    data.extend_from_slice(&secondary_amount.to_le_bytes());

    let mut metas = stake_accounts(program_id, accounts);
    metas.extend(stake_remaining(accounts));

    Instruction { program_id: *program_id, accounts: metas, data }
}

/// Build the `decrease_stake` instruction.
pub fn decrease_stake_ix(
    program_id:       &Pubkey,
    accounts:         &StakeAccounts<'_>,
    primary_amount:   u64,
    secondary_amount: u64,
) -> Instruction {
    let mut data = disc("decrease_stake").to_vec();
    data.extend_from_slice(&primary_amount.to_le_bytes());
    data.extend_from_slice(&secondary_amount.to_le_bytes());

    let mut metas = stake_accounts(program_id, accounts);
    metas.extend(stake_remaining(accounts));

    Instruction { program_id: *program_id, accounts: metas, data }
}

/// Build the `claim` instruction.  `compound` is only valid for Dual pools.
pub fn claim_ix(
    program_id: &Pubkey,
    accounts:   &StakeAccounts<'_>,
    compound:   bool,
) -> Instruction {
    let mut data = disc("claim").to_vec();
    data.push(compound as u8);

    // Claim takes no primary vault / staker primary account.
    let mut metas = stake_accounts(program_id, accounts);
    metas.drain(5..7);
    metas.extend(stake_remaining(accounts));

    Instruction { program_id: *program_id, accounts: metas, data }
}

// ─── drop_fees ───────────────────────────────────────────────────────────────

/// Build the router-only `drop_fees` instruction.  For [`NATIVE_MINT`] pass
/// `None` for both token accounts; lamports come from `router`.
pub fn drop_fees_ix(
    program_id: &Pubkey,
    router:     &Pubkey,
    pool:       &Pubkey,
    mint:       &Pubkey,
    source:     Option<&Pubkey>,
    vault:      Option<&Pubkey>,
    amount:     u64,
) -> Instruction {
    let mut data = disc("drop_fees").to_vec();
    data.extend_from_slice(mint.as_ref());
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*router, true),
            AccountMeta::new(*pool,   false),
            optional(source, program_id),
            optional(vault, program_id),
            AccountMeta::new_readonly(SPL_TOKEN_ID, false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the `initialize_gateway` instruction.  `operator` must own the pool.
pub fn initialize_gateway_ix(
    program_id:    &Pubkey,
    operator:      &Pubkey,
    pool:          &Pubkey,
    debt_mint:     &Pubkey,
    vault_manager: &Pubkey,
) -> Instruction {
    let (gateway, _)           = derive_gateway(pool, program_id);
    let (gateway_authority, _) = derive_gateway_authority(&gateway, program_id);

    let mut data = disc("initialize_gateway").to_vec();
    data.extend_from_slice(vault_manager.as_ref());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*operator,                  true),
            AccountMeta::new_readonly(*pool,             false),
            AccountMeta::new_readonly(*debt_mint,        false),
            AccountMeta::new(gateway,                    false),  // mut PDA (init)
            AccountMeta::new_readonly(gateway_authority, false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
        ],
        data,
    }
}

/// Build the operator-only `set_reward_mints` instruction.
pub fn set_reward_mints_ix(
    program_id: &Pubkey,
    operator:   &Pubkey,
    gateway:    &Pubkey,
    mints:      &[Pubkey],
) -> Instruction {
    let mut data = disc("set_reward_mints").to_vec();
    data.extend_from_slice(&(mints.len() as u32).to_le_bytes());
    for mint in mints {
        data.extend_from_slice(mint.as_ref());
    }

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*operator, true),
            AccountMeta::new(*gateway,           false),
        ],
        data,
    }
}

/// Build the permissionless `sweep_fees` instruction.
///
/// `token_pairs` holds `(router_token_account, pool_reward_vault)` per token
/// to forward; router lamports are always swept.
pub fn sweep_fees_ix(
    program_id:  &Pubkey,
    pool:        &Pubkey,
    token_pairs: &[(Pubkey, Pubkey)],
) -> Instruction {
    let (gateway, _)           = derive_gateway(pool, program_id);
    let (gateway_authority, _) = derive_gateway_authority(&gateway, program_id);

    let mut accounts = vec![
        AccountMeta::new_readonly(gateway,      false),
        AccountMeta::new(gateway_authority,     false),
        AccountMeta::new(*pool,                 false),
        AccountMeta::new_readonly(SPL_TOKEN_ID, false),
        AccountMeta::new_readonly(Pubkey::default(), false), // system program
    ];
    accounts.extend(pairs(token_pairs));

    Instruction { program_id: *program_id, accounts, data: disc("sweep_fees").to_vec() }
}

/// Build the operator-only `airdrop_token` instruction.
pub fn airdrop_token_ix(
    program_id:     &Pubkey,
    operator:       &Pubkey,
    pool:           &Pubkey,
    mint:           &Pubkey,
    operator_token: &Pubkey,
    vault:          &Pubkey,
    amount:         u64,
) -> Instruction {
    let (gateway, _) = derive_gateway(pool, program_id);

    let mut data = disc("airdrop_token").to_vec();
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*operator, true),
            AccountMeta::new_readonly(gateway,   false),
            AccountMeta::new(*pool,              false),
            AccountMeta::new_readonly(*mint,     false),
            AccountMeta::new(*operator_token,    false),
            AccountMeta::new(*vault,             false),
            AccountMeta::new_readonly(SPL_TOKEN_ID, false),
        ],
        data,
    }
}

/// Build the `liquidate_vault` instruction.  `manager_accounts` are forwarded
/// unchanged, in order, to the vault manager program.
#[allow(clippy::too_many_arguments)]
pub fn liquidate_vault_ix(
    program_id:       &Pubkey,
    liquidator:       &Pubkey,
    pool:             &Pubkey,
    debt_mint:        &Pubkey,
    liquidator_debt:  &Pubkey,
    vault_manager:    &Pubkey,
    vault_id:         u64,
    debt_amount:      u64,
    manager_accounts: &[AccountMeta],
) -> Instruction {
    let (gateway, _) = derive_gateway(pool, program_id);

    let mut data = disc("liquidate_vault").to_vec();
    data.extend_from_slice(&vault_id.to_le_bytes());
    data.extend_from_slice(&debt_amount.to_le_bytes());

    let mut accounts = vec![
        AccountMeta::new(*liquidator,             true),
        AccountMeta::new_readonly(gateway,        false),
        AccountMeta::new(*debt_mint,              false),
        AccountMeta::new(*liquidator_debt,        false),
        AccountMeta::new_readonly(*vault_manager, false),
        AccountMeta::new_readonly(SPL_TOKEN_ID,   false),
    ];
    accounts.extend_from_slice(manager_accounts);

    Instruction { program_id: *program_id, accounts, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn discriminator_is_anchor_sighash() {
        let expected = solana_sdk::hash::hash(b"global:sweep_fees").to_bytes();
        assert_eq!(disc("sweep_fees"), expected[..8]);
    }

    #[test]
    fn omitted_optional_accounts_are_the_program_id() {
        let program = key(9);
        let pool = key(2);
        let ix = drop_fees_ix(&program, &key(1), &pool, &NATIVE_MINT, None, None, 500);
        assert_eq!(ix.accounts[2].pubkey, program);
        assert_eq!(ix.accounts[3].pubkey, program);
        assert!(!ix.accounts[2].is_writable);
        assert_eq!(&ix.data[8..40], NATIVE_MINT.as_ref());
        assert_eq!(&ix.data[40..], 500u64.to_le_bytes());
    }

    #[test]
    fn stake_builders_append_reward_pairs() {
        let program = key(9);
        let rewards = [(key(5), key(6)), (key(7), key(8))];
        let accounts = StakeAccounts {
            staker:         &key(1),
            pool:           &key(2),
            primary_vault:  &key(3),
            staker_primary: &key(4),
            secondary:      None,
            router_pairs:   None,
            reward_pairs:   &rewards,
        };

        let inc = increase_stake_ix(&program, &accounts, 10, 0);
        assert_eq!(inc.accounts.len(), 13 + 4);
        assert_eq!(inc.accounts[9].pubkey, program);
        assert_eq!(inc.accounts[10].pubkey, program);
        assert_eq!(inc.accounts[13].pubkey, key(5));
        assert_eq!(inc.accounts[16].pubkey, key(8));
        assert!(inc.accounts[0].is_signer);
        assert!(inc.accounts[2].is_writable);

        let dec = decrease_stake_ix(&program, &accounts, 10, 0);
        assert_eq!(dec.accounts.len(), 13 + 4);
        assert_eq!(dec.accounts[12].pubkey, Pubkey::default());

        let claim = claim_ix(&program, &accounts, false);
        assert_eq!(claim.accounts.len(), 11 + 4);
        assert_eq!(claim.accounts[9].pubkey, SPL_TOKEN_ID);
        assert_eq!(claim.data[8], 0);
    }

    #[test]
    fn routed_stake_builders_put_router_pairs_first() {
        let program = key(9);
        let pool = key(2);
        let router = [(key(20), key(21))];
        let rewards = [(key(5), key(6))];
        let accounts = StakeAccounts {
            staker:         &key(1),
            pool:           &pool,
            primary_vault:  &key(3),
            staker_primary: &key(4),
            secondary:      None,
            router_pairs:   Some(&router),
            reward_pairs:   &rewards,
        };
        let (gateway, _) = derive_gateway(&pool, &program);
        let (authority, _) = derive_gateway_authority(&gateway, &program);

        let claim = claim_ix(&program, &accounts, false);
        assert_eq!(claim.accounts[7].pubkey, gateway);
        assert!(!claim.accounts[7].is_writable);
        assert_eq!(claim.accounts[8].pubkey, authority);
        assert!(claim.accounts[8].is_writable);
        let tail: Vec<Pubkey> = claim.accounts[11..].iter().map(|m| m.pubkey).collect();
        assert_eq!(tail, vec![key(20), key(21), key(5), key(6)]);
    }

    #[test]
    fn set_reward_mints_encodes_a_borsh_vec() {
        let ix = set_reward_mints_ix(&key(9), &key(1), &key(2), &[key(3), key(4)]);
        assert_eq!(&ix.data[8..12], 2u32.to_le_bytes());
        assert_eq!(ix.data.len(), 8 + 4 + 64);
    }
}
