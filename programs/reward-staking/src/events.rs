use anchor_lang::prelude::*;

#[event]
pub struct StakeChanged {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub primary_amount: u64,
    pub secondary_amount: u64,
    pub start: i64,
    pub pool_start: i64,
}

#[event]
pub struct RewardsClaimed {
    pub pool: Pubkey,
    pub owner: Pubkey,
    /// Primary reward asset paid (or re-locked when compounding)
    pub primary: u64,
    pub compounded: bool,
    /// Reward tokens actually transferred, in registry order
    pub rewards: Vec<crate::state::TokenAmount>,
}

#[event]
pub struct FeesDropped {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[event]
pub struct VaultLiquidated {
    pub gateway: Pubkey,
    pub liquidator: Pubkey,
    pub vault_id: u64,
    pub debt_burned: u64,
}
