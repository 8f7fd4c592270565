#![allow(ambiguous_glob_reexports)]

pub mod fees;
pub mod payout;

pub mod initialize_pool;
pub mod set_reward_gateway;
pub mod open_reward_vault;
pub mod increase_stake;
pub mod decrease_stake;
pub mod claim;
pub mod drop_fees;
pub mod views;
pub mod initialize_gateway;
pub mod set_reward_mints;
pub mod sweep_fees;
pub mod airdrop_token;
pub mod liquidate_vault;

pub use initialize_pool::*;
pub use set_reward_gateway::*;
pub use open_reward_vault::*;
pub use increase_stake::*;
pub use decrease_stake::*;
pub use claim::*;
pub use drop_fees::*;
pub use views::*;
pub use initialize_gateway::*;
pub use set_reward_mints::*;
pub use sweep_fees::*;
pub use airdrop_token::*;
pub use liquidate_vault::*;
