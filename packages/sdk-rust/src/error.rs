//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Reward Staking SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Account discovery ────────────────────────────────────────────────────
    /// No staking pool exists for the given primary mint.
    #[error("Pool not found for primary mint {0}")]
    PoolNotFound(Pubkey),

    /// The owner has never staked in this pool.
    #[error("No position for {owner} in pool {pool}")]
    PositionNotFound { pool: Pubkey, owner: Pubkey },

    /// The pool has no reward gateway at its derived address.
    #[error("Reward gateway not found for pool {0}")]
    GatewayNotFound(Pubkey),

    // ── Staking rules ────────────────────────────────────────────────────────
    /// The request does not fit the pool's mode (e.g. a secondary amount for
    /// a Single pool, or compounding outside Dual).
    #[error("Stake amounts do not match the pool mode: {0}")]
    ModeMismatch(String),

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in reward math")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
