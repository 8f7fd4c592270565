//! Reward Staking Rust SDK
//!
//! Client for the staking ledger and its fee router on Solana.  Stake,
//! unstake, claim, sweep router fees and read pool state with no Anchor
//! dependency.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use reward_staking_sdk::{ClaimParams, StakeParams, StakingClient};
//! use solana_sdk::{pubkey::Pubkey, signature::{Keypair, Signer}};
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client  = StakingClient::devnet();
//!     let keypair = Keypair::new(); // use a funded keypair
//!     let tst = Pubkey::from_str("So11111111111111111111111111111111111111112")?;
//!
//!     // 1. Lock 100 primary + 50 secondary (Dual pool)
//!     let staked = client.stake(&keypair, StakeParams {
//!         primary_mint:     tst,
//!         primary_amount:   100_000_000,
//!         secondary_amount: 50_000_000,
//!     }).await?;
//!     println!("Staked! tx: {}", staked.signature);
//!
//!     // 2. Later: check what a claim would pay, then claim
//!     let info = client.position_info(tst, keypair.pubkey()).await?;
//!     println!("Projected primary reward: {}", info.earnings.primary);
//!     client.claim(&keypair, ClaimParams { primary_mint: tst, compound: false }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`StakingClient::create_pool`] | Create a Dual or Single pool |
//! | [`StakingClient::create_gateway`] | Create the fee router and point the pool at it |
//! | [`StakingClient::stake`] | Lock stake (the program pulls router fees first) |
//! | [`StakingClient::unstake`] | Withdraw stake |
//! | [`StakingClient::claim`] | Collect or compound rewards |
//! | [`StakingClient::sweep`] | Forward router fees into the pool |
//! | [`StakingClient::airdrop`] | Operator token drop |
//! | [`StakingClient::liquidate`] | Burn debt and liquidate a vault |
//! | [`StakingClient::pool_info`] | Totals, daily rate and yield, registry |
//! | [`StakingClient::position_info`] | Locked amounts and projected earnings |
//! | [`StakingClient::stakers`] | Active stakers, oldest first |

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;
pub mod types;

pub use client::StakingClient;
pub use error::{Error, Result};
pub use types::*;
