use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};
use crate::{
    constants::*,
    error::StakingError,
    state::{Position, StakingMode, StakingPool, TokenAmount},
};

/// Pool authority signer seeds, bound to locals by the caller.
pub fn authority_seeds<'a>(pool_key: &'a Pubkey, bump: &'a [u8; 1]) -> [&'a [u8]; 3] {
    [POOL_AUTHORITY_SEED, pool_key.as_ref(), bump]
}

/// Staker → vault, signed by the staker.
pub fn transfer_in<'info>(
    token_program: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token::transfer(
        CpiContext::new(
            token_program.clone(),
            Transfer { from: from.clone(), to: to.clone(), authority: authority.clone() },
        ),
        amount,
    )
}

/// Vault → recipient, signed by the pool authority PDA.
pub fn transfer_out<'info>(
    token_program: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    pool_authority: &AccountInfo<'info>,
    signer_seeds: &[&[u8]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token::transfer(
        CpiContext::new_with_signer(
            token_program.clone(),
            Transfer { from: from.clone(), to: to.clone(), authority: pool_authority.clone() },
            &[signer_seeds],
        ),
        amount,
    )
}

/// Secondary vault and staker account, required and checked in Dual mode,
/// ignored in Single mode.
pub fn secondary_pair<'a, 'info>(
    pool: &StakingPool,
    staker: &Pubkey,
    vault: &'a Option<Box<Account<'info, TokenAccount>>>,
    user: &'a Option<Box<Account<'info, TokenAccount>>>,
) -> Result<Option<(&'a Account<'info, TokenAccount>, &'a Account<'info, TokenAccount>)>> {
    if pool.mode != StakingMode::Dual {
        return Ok(None);
    }
    let (Some(vault), Some(user)) = (vault.as_deref(), user.as_deref()) else {
        return err!(StakingError::InvalidRequest);
    };
    require_keys_eq!(vault.key(), pool.secondary_vault, StakingError::VaultMismatch);
    require_keys_eq!(user.mint, pool.secondary_mint, StakingError::MintMismatch);
    require_keys_eq!(user.owner, *staker, StakingError::Unauthorized);
    Ok(Some((vault, user)))
}

struct PendingTransfer<'info> {
    vault: AccountInfo<'info>,
    recipient: AccountInfo<'info>,
    mint: Pubkey,
    amount: u64,
}

/// Pay out the position's owed reward tokens.
///
/// `remaining` holds `(pool_reward_vault, staker_token_account)` pairs; a
/// token without a pair stays owed. Native SOL is always paid from the pool
/// account's lamports. All bookkeeping is committed before the first CPI and
/// lamports move last.
pub fn pay_owed<'info>(
    pool: &mut Account<'info, StakingPool>,
    position: &mut Position,
    staker: &AccountInfo<'info>,
    pool_authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    remaining: &'info [AccountInfo<'info>],
) -> Result<Vec<TokenAmount>> {
    require!(remaining.len() % 2 == 0, StakingError::InvalidRequest);

    let mut transfers: Vec<PendingTransfer<'info>> = Vec::new();
    for pair in remaining.chunks(2) {
        let vault = Account::<TokenAccount>::try_from(&pair[0])?;
        let recipient = Account::<TokenAccount>::try_from(&pair[1])?;
        let index = pool
            .reward_tokens
            .iter()
            .position(|t| t.vault == vault.key() && t.mint != NATIVE_MINT)
            .ok_or(StakingError::VaultMismatch)?;
        require_keys_eq!(recipient.mint, pool.reward_tokens[index].mint, StakingError::MintMismatch);

        let amount = position.take_owed(index);
        if amount == 0 {
            continue;
        }
        pool.release(index, amount)?;
        transfers.push(PendingTransfer {
            vault: pair[0].clone(),
            recipient: pair[1].clone(),
            mint: recipient.mint,
            amount,
        });
    }

    let native = match pool.reward_index(&NATIVE_MINT) {
        Some(index) => {
            let amount = position.take_owed(index);
            pool.release(index, amount)?;
            amount
        }
        None => 0,
    };

    let pool_key = pool.key();
    let bump = [pool.authority_bump];
    let seeds = authority_seeds(&pool_key, &bump);
    let mut paid = Vec::with_capacity(transfers.len() + 1);
    for t in transfers {
        transfer_out(token_program, &t.vault, &t.recipient, pool_authority, &seeds, t.amount)?;
        paid.push(TokenAmount { mint: t.mint, amount: t.amount });
    }

    if native > 0 {
        pool.sub_lamports(native)?;
        staker.add_lamports(native)?;
        paid.push(TokenAmount { mint: NATIVE_MINT, amount: native });
    }
    Ok(paid)
}
