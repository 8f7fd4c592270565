use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::TokenAccount;
use crate::{
    constants::*,
    error::StakingError,
    events::FeesDropped,
    state::{FeeDrop, FeeInflow, RewardGateway, StakingPool},
};
use super::payout::transfer_out;

/// The pool's custody account for `mint` fees: the secondary vault for the
/// Dual-mode primary asset, the registered vault for a known token, or the
/// canonical reward-vault PDA for a token seen for the first time.
pub fn check_fee_vault(
    pool: &StakingPool,
    pool_key: &Pubkey,
    mint: &Pubkey,
    vault: &Account<TokenAccount>,
) -> Result<()> {
    require_keys_eq!(vault.mint, *mint, StakingError::MintMismatch);
    let expected = if pool.is_primary_reward(mint) {
        pool.secondary_vault
    } else if let Some(index) = pool.reward_index(mint) {
        pool.reward_tokens[index].vault
    } else {
        reward_vault_address(pool_key, mint)
    };
    require_keys_eq!(vault.key(), expected, StakingError::VaultMismatch);
    Ok(())
}

pub fn reward_vault_address(pool_key: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[REWARD_VAULT_SEED, pool_key.as_ref(), mint.as_ref()],
        &crate::ID,
    )
    .0
}

/// Book a fee drop on the ledger and log it.
pub fn record_drop(
    pool: &mut StakingPool,
    pool_key: Pubkey,
    mint: Pubkey,
    vault: Pubkey,
    amount: u64,
) -> Result<FeeDrop> {
    let outcome = pool.drop_fees(mint, vault, amount)?;
    match outcome {
        FeeDrop::Ignored => {
            msg!("Fee drop ignored: mint={} amount={} (nothing locked)", mint, amount);
        }
        FeeDrop::PrimaryAsset => {
            emit!(FeesDropped { pool: pool_key, mint, amount });
            msg!("Fees dropped: primary asset amount={} in_pool={}", amount, pool.primary_fees_in_pool);
        }
        FeeDrop::Accrued(index) => {
            emit!(FeesDropped { pool: pool_key, mint, amount });
            msg!(
                "Fees dropped: mint={} amount={} index={} basis={}",
                mint, amount, index, pool.share_basis()
            );
        }
    }
    Ok(outcome)
}

// ─── Router pull ───────────────────────────────────────────────────────────

struct RouterTransfer<'info> {
    inflow: FeeInflow,
    /// `(router_token_account, pool_vault)`; None for lamports
    accounts: Option<(&'info AccountInfo<'info>, &'info AccountInfo<'info>)>,
}

/// Router balances read by one instruction. The caller books `inflows()` on
/// the ledger, then `execute` moves them into the pool.
pub struct RouterPull<'info> {
    gateway: Pubkey,
    authority: AccountInfo<'info>,
    authority_bump: u8,
    transfers: Vec<RouterTransfer<'info>>,
}

impl<'info> RouterPull<'info> {
    /// Read the gateway authority's lamports and each
    /// `(router_token_account, pool_vault)` pair in `pairs`.
    ///
    /// With `canonical`, pair `i` must name the authority's associated token
    /// account for managed mint `i`, and one that does not exist yet is
    /// skipped. Balances the pool would ignore stay with the router, as do
    /// first-seen tokens the registry has no room for.
    pub fn collect(
        pool: &StakingPool,
        pool_key: &Pubkey,
        gateway: &Account<'info, RewardGateway>,
        authority: AccountInfo<'info>,
        pairs: &'info [AccountInfo<'info>],
        canonical: bool,
    ) -> Result<Self> {
        require!(pairs.len() % 2 == 0, StakingError::InvalidRequest);
        let managed = gateway.managed_mints();
        if canonical {
            require!(pairs.len() == 2 * managed.len(), StakingError::RouterNotSynced);
        }

        let mut pull = Self {
            gateway: gateway.key(),
            authority,
            authority_bump: gateway.authority_bump,
            transfers: Vec::new(),
        };
        let mut registering = Vec::new();

        let lamports = FeeInflow { mint: NATIVE_MINT, vault: NATIVE_MINT, amount: pull.authority.lamports() };
        if admits(pool, &mut registering, &lamports) {
            pull.transfers.push(RouterTransfer { inflow: lamports, accounts: None });
        }

        for (i, pair) in pairs.chunks(2).enumerate() {
            let (source, vault) = (&pair[0], &pair[1]);
            if canonical {
                let expected = get_associated_token_address(pull.authority.key, &managed[i]);
                require_keys_eq!(source.key(), expected, StakingError::RouterNotSynced);
                if source.data_is_empty() {
                    continue;
                }
            }
            let router = Account::<TokenAccount>::try_from(source)?;
            require_keys_eq!(router.owner, pull.authority.key(), StakingError::Unauthorized);
            require!(gateway.manages(&router.mint), StakingError::MintNotManaged);

            let inflow = FeeInflow { mint: router.mint, vault: vault.key(), amount: router.amount };
            if !admits(pool, &mut registering, &inflow) {
                continue;
            }
            let vault_account = Account::<TokenAccount>::try_from(vault)?;
            check_fee_vault(pool, pool_key, &inflow.mint, &vault_account)?;
            pull.transfers.push(RouterTransfer { inflow, accounts: Some((source, vault)) });
        }
        Ok(pull)
    }

    pub fn inflows(&self) -> Vec<FeeInflow> {
        self.transfers.iter().map(|t| t.inflow).collect()
    }

    /// Move every collected balance into the pool, signed by the gateway
    /// authority. Returns the number of assets moved.
    pub fn execute(
        self,
        pool_key: Pubkey,
        pool: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
        system: &AccountInfo<'info>,
    ) -> Result<usize> {
        let bump = [self.authority_bump];
        let seeds: &[&[u8]] = &[GATEWAY_AUTHORITY_SEED, self.gateway.as_ref(), &bump];
        for t in &self.transfers {
            let FeeInflow { mint, amount, .. } = t.inflow;
            match t.accounts {
                Some((source, vault)) => {
                    transfer_out(token_program, source, vault, &self.authority, seeds, amount)?
                }
                None => system_program::transfer(
                    CpiContext::new_with_signer(
                        system.clone(),
                        system_program::Transfer { from: self.authority.clone(), to: pool.clone() },
                        &[seeds],
                    ),
                    amount,
                )?,
            }
            emit!(FeesDropped { pool: pool_key, mint, amount });
            msg!("Router fees pulled: mint={} amount={}", mint, amount);
        }
        Ok(self.transfers.len())
    }
}

/// Whether the pool would book `inflow`. Tracks first-seen mints so a
/// single pull never registers more tokens than the registry holds.
fn admits(pool: &StakingPool, registering: &mut Vec<Pubkey>, inflow: &FeeInflow) -> bool {
    match pool.classify_drop(&inflow.mint, inflow.amount) {
        FeeDrop::Ignored => {
            if inflow.amount > 0 {
                msg!("Router balance left: mint={} amount={} (nothing locked)", inflow.mint, inflow.amount);
            }
            false
        }
        FeeDrop::PrimaryAsset => true,
        FeeDrop::Accrued(index) if index < pool.reward_tokens.len() => true,
        FeeDrop::Accrued(_) => {
            if registering.contains(&inflow.mint) {
                return true;
            }
            if pool.reward_tokens.len() + registering.len() >= MAX_REWARD_TOKENS {
                msg!("Router balance left: mint={} (reward registry full)", inflow.mint);
                return false;
            }
            registering.push(inflow.mint);
            true
        }
    }
}

/// The pool's gateway PDA when fees route through it: the pool's
/// `reward_gateway` is that gateway's authority.
pub fn routed_gateway(pool_key: &Pubkey, pool: &StakingPool) -> Option<Pubkey> {
    let gateway = Pubkey::find_program_address(&[GATEWAY_SEED, pool_key.as_ref()], &crate::ID).0;
    let authority =
        Pubkey::find_program_address(&[GATEWAY_AUTHORITY_SEED, gateway.as_ref()], &crate::ID).0;
    (pool.reward_gateway == authority).then_some(gateway)
}

/// Collect the router pull that must precede a stake change.
///
/// On a routed pool the gateway and its authority are required and the
/// first `2 * managed mints` remaining accounts are the canonical router
/// pairs. Returns the pull and the remaining accounts left for the payout.
pub fn stake_router_pull<'info>(
    pool: &StakingPool,
    pool_key: &Pubkey,
    gateway: &Option<Box<Account<'info, RewardGateway>>>,
    gateway_authority: &Option<UncheckedAccount<'info>>,
    remaining: &'info [AccountInfo<'info>],
) -> Result<(Option<RouterPull<'info>>, &'info [AccountInfo<'info>])> {
    let Some(expected) = routed_gateway(pool_key, pool) else {
        return Ok((None, remaining));
    };
    let (Some(gateway), Some(authority)) = (gateway.as_deref(), gateway_authority.as_ref()) else {
        return err!(StakingError::RouterNotSynced);
    };
    require_keys_eq!(gateway.key(), expected, StakingError::RouterNotSynced);
    require_keys_eq!(authority.key(), pool.reward_gateway, StakingError::RouterNotSynced);

    let split = 2 * gateway.managed_mints().len();
    require!(remaining.len() >= split, StakingError::RouterNotSynced);
    let (pairs, rest) = remaining.split_at(split);
    let pull = RouterPull::collect(pool, pool_key, gateway, authority.to_account_info(), pairs, true)?;
    Ok((Some(pull), rest))
}
