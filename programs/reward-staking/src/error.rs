use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Invalid stake: at least one amount must be non-zero")]
    InvalidStake,
    #[msg("Invalid unstake: amount exceeds the locked balance")]
    InvalidUnstake,
    #[msg("Invalid request")]
    InvalidRequest,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Signer is not authorised for this instruction")]
    Unauthorized,
    #[msg("Token mint does not match pool")]
    MintMismatch,
    #[msg("Vault does not match the reward registry")]
    VaultMismatch,
    #[msg("Mint is not managed by the reward gateway")]
    MintNotManaged,
    #[msg("Position does not belong to this pool and owner")]
    PositionMismatch,
    #[msg("Reward token registry is full")]
    RewardTokenLimit,
    #[msg("Router balances must be pulled into the pool by this instruction")]
    RouterNotSynced,
    #[msg("Math overflow")]
    MathOverflow,
}
