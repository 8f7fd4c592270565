//! [`StakingClient`]: the main entry point for integrations.

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::{AccountMeta, Instruction},
    pubkey,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    sysvar,
    transaction::Transaction,
};

use crate::{
    error::{Error, Result},
    instructions::{
        airdrop_token_ix, claim_ix, decrease_stake_ix, derive_ata, derive_gateway,
        derive_gateway_authority, derive_pool, derive_pool_authority, derive_position,
        derive_queue, derive_reward_vault, increase_stake_ix, initialize_gateway_ix,
        initialize_pool_ix, liquidate_vault_ix, open_reward_vault_ix, set_reward_gateway_ix,
        set_reward_mints_ix, sweep_fees_ix, StakeAccounts, NATIVE_MINT,
    },
    math::{daily_rate, daily_yield, projected_earnings},
    state::{
        account_disc, parse_clock_timestamp, parse_gateway, parse_pool, parse_position,
        parse_queue, parse_token_account, GatewayState, PoolState, PositionState,
    },
    types::{
        ClaimParams, ClaimResult, CreateGatewayParams, CreateGatewayResult, CreatePoolParams,
        CreatePoolResult, PoolInfo, PositionInfo, RewardTokenInfo, StakeParams, StakeResult,
        StakerInfo, StakingMode, SweepResult,
    },
};

// ─── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("GTPuP6Rd8tijypDk6kaQ1kUMYBqy82euYeTNqay88Bze");
const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async Reward Staking client for Solana.
///
/// On a routed pool every stake-changing call (`stake`, `unstake`, `claim`)
/// passes the router's associated token accounts; the program pulls their
/// balances in before the position settles.
///
/// ```rust,no_run
/// # use reward_staking_sdk::StakingClient;
/// # use solana_sdk::pubkey::Pubkey;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StakingClient::devnet();
/// let info = client.pool_info(Pubkey::new_unique()).await?;
/// println!("pool_start: {}  stakers: {}", info.pool_start, info.stakers);
/// # Ok(())
/// # }
/// ```
pub struct StakingClient {
    rpc_url:    String,
    program_id: Pubkey,
}

impl StakingClient {
    /// Create a client pointing at any RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url:    rpc_url.into(),
            program_id: DEFAULT_PROGRAM_ID,
        }
    }

    /// Pre-configured client for Solana devnet.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    /// Pre-configured client for Solana mainnet-beta.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (useful for locally deployed programs in tests).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    // ── Setup ─────────────────────────────────────────────────────────────────

    /// Create a staking pool.  For Dual pools the secondary vault is opened in
    /// the same transaction.  A fresh keypair for the primary vault is
    /// generated internally.
    pub async fn create_pool(&self, payer: &Keypair, params: CreatePoolParams) -> Result<CreatePoolResult> {
        let secondary_mint = match (params.mode, params.secondary_mint) {
            (StakingMode::Dual, None) => {
                return Err(Error::ModeMismatch("dual pools need a secondary mint".into()))
            }
            (StakingMode::Dual, Some(m)) if m == params.primary_mint => {
                return Err(Error::InvalidArgument("secondary mint equals primary mint".into()))
            }
            (StakingMode::Dual, Some(m)) => Some(m),
            (StakingMode::Single, _) => None,
        };

        let rpc = self.rpc();
        let primary_vault = Keypair::new();
        let (pool, _)           = derive_pool(&params.primary_mint, &self.program_id);
        let (pool_authority, _) = derive_pool_authority(&pool, &self.program_id);
        let (queue, _)          = derive_queue(&pool, &self.program_id);

        let mut ixs = vec![initialize_pool_ix(
            &self.program_id,
            &payer.pubkey(),
            &params.primary_mint,
            secondary_mint.as_ref(),
            &primary_vault.pubkey(),
            params.mode,
        )];
        let secondary_vault = match secondary_mint {
            Some(mint) => {
                ixs.push(open_reward_vault_ix(&self.program_id, &payer.pubkey(), &pool, &mint));
                derive_reward_vault(&pool, &mint, &self.program_id).0
            }
            None => Pubkey::default(),
        };
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[&primary_vault]).await?;

        Ok(CreatePoolResult {
            signature:     sig.to_string(),
            pool,
            pool_authority,
            queue,
            primary_vault: primary_vault.pubkey(),
            secondary_vault,
            mode:          params.mode,
        })
    }

    /// Create the fee router for a pool and point the pool at it.  `payer`
    /// must be the pool owner; it becomes the router operator.
    pub async fn create_gateway(
        &self,
        payer:  &Keypair,
        params: CreateGatewayParams,
    ) -> Result<CreateGatewayResult> {
        let rpc = self.rpc();
        let (pool, _)              = derive_pool(&params.primary_mint, &self.program_id);
        let (gateway, _)           = derive_gateway(&pool, &self.program_id);
        let (gateway_authority, _) = derive_gateway_authority(&gateway, &self.program_id);

        let mut ixs = vec![
            initialize_gateway_ix(
                &self.program_id,
                &payer.pubkey(),
                &pool,
                &params.debt_mint,
                &params.vault_manager,
            ),
            set_reward_gateway_ix(&self.program_id, &payer.pubkey(), &pool, &gateway_authority),
        ];
        if !params.reward_mints.is_empty() {
            ixs.push(set_reward_mints_ix(
                &self.program_id,
                &payer.pubkey(),
                &gateway,
                &params.reward_mints,
            ));
        }
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[]).await?;

        Ok(CreateGatewayResult { signature: sig.to_string(), gateway, gateway_authority })
    }

    /// Owner-only: point the pool at any fee source.
    pub async fn set_reward_gateway(
        &self,
        payer:          &Keypair,
        primary_mint:   Pubkey,
        reward_gateway: Pubkey,
    ) -> Result<Signature> {
        let rpc = self.rpc();
        let (pool, _) = derive_pool(&primary_mint, &self.program_id);
        let ix = set_reward_gateway_ix(&self.program_id, &payer.pubkey(), &pool, &reward_gateway);
        self.sign_and_send(&rpc, &[ix], payer, &[]).await
    }

    /// Operator-only: replace the router's reward-mint set.
    pub async fn set_reward_mints(
        &self,
        payer:        &Keypair,
        primary_mint: Pubkey,
        mints:        &[Pubkey],
    ) -> Result<Signature> {
        let rpc = self.rpc();
        let (pool, _)    = derive_pool(&primary_mint, &self.program_id);
        let (gateway, _) = derive_gateway(&pool, &self.program_id);
        let ix = set_reward_mints_ix(&self.program_id, &payer.pubkey(), &gateway, mints);
        self.sign_and_send(&rpc, &[ix], payer, &[]).await
    }

    // ── Staking ───────────────────────────────────────────────────────────────

    /// Lock more stake.  Reward tokens owed on settlement are paid to the
    /// payer's existing associated token accounts; tokens without one stay
    /// owed on the position.
    pub async fn stake(&self, payer: &Keypair, params: StakeParams) -> Result<StakeResult> {
        self.change_stake(payer, params, true).await
    }

    /// Withdraw stake.  Same payout rules as [`StakingClient::stake`].
    pub async fn unstake(&self, payer: &Keypair, params: StakeParams) -> Result<StakeResult> {
        self.change_stake(payer, params, false).await
    }

    /// Collect (or compound) everything the position has earned.
    pub async fn claim(&self, payer: &Keypair, params: ClaimParams) -> Result<ClaimResult> {
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &params.primary_mint).await?;
        if params.compound && state.mode != StakingMode::Dual {
            return Err(Error::ModeMismatch("compounding needs a dual pool".into()));
        }
        let owner = payer.pubkey();
        let (position, _) = derive_position(&pool, &owner, &self.program_id);
        let pos = self
            .fetch_position(&rpc, &pool, &owner)
            .await?
            .ok_or(Error::PositionNotFound { pool, owner })?;
        let now = self.cluster_time(&rpc).await?;
        let expected = projected_earnings(&state, &pos, now)?;

        let (mut ixs, router) = self.stake_router(&rpc, &pool, &state, &owner).await?;
        let rewards = self.payout_pairs(&rpc, &state, &owner).await?;
        let secondary = self.secondary_accounts(&state, &owner);
        let accounts = StakeAccounts {
            staker:         &owner,
            pool:           &pool,
            primary_vault:  &state.primary_vault,
            staker_primary: &derive_ata(&owner, &state.primary_mint),
            secondary:      secondary.as_ref().map(|(v, u)| (v, u)),
            router_pairs:   router.as_deref(),
            reward_pairs:   &rewards,
        };
        ixs.push(claim_ix(&self.program_id, &accounts, params.compound));
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[]).await?;

        Ok(ClaimResult {
            signature: sig.to_string(),
            pool,
            position,
            compound: params.compound,
            expected,
        })
    }

    // ── Router ────────────────────────────────────────────────────────────────

    /// Forward every fee asset the router holds into the pool.  Opens any
    /// reward vault a first-seen mint needs.  Permissionless.
    pub async fn sweep(&self, payer: &Keypair, primary_mint: Pubkey) -> Result<SweepResult> {
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &primary_mint).await?;
        let gateway = self
            .fetch_gateway(&rpc, &pool)
            .await?
            .ok_or(Error::GatewayNotFound(pool))?;
        if state.reward_gateway != gateway.authority {
            return Err(Error::InvalidArgument(format!(
                "pool {pool} does not accept fees from gateway authority {}",
                gateway.authority
            )));
        }
        let (mut ixs, pairs) =
            self.router_pairs(&rpc, &pool, &state, &gateway, &payer.pubkey(), false).await?;
        ixs.push(sweep_fees_ix(&self.program_id, &pool, &pairs));
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[]).await?;

        Ok(SweepResult { signature: sig.to_string(), pool, token_accounts: pairs.len() })
    }

    /// Operator-only: drop `amount` of `mint` from the payer's associated
    /// token account straight into the pool.
    pub async fn airdrop(
        &self,
        payer:        &Keypair,
        primary_mint: Pubkey,
        mint:         Pubkey,
        amount:       u64,
    ) -> Result<Signature> {
        if amount == 0 {
            return Err(Error::InvalidArgument("amount must be > 0".into()));
        }
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &primary_mint).await?;
        let (vault, open) = self.fee_vault(&rpc, &pool, &state, &mint, &payer.pubkey()).await?;

        let mut ixs: Vec<Instruction> = open.into_iter().collect();
        ixs.push(airdrop_token_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool,
            &mint,
            &derive_ata(&payer.pubkey(), &mint),
            &vault,
            amount,
        ));
        self.sign_and_send(&rpc, &ixs, payer, &[]).await
    }

    /// Burn `debt_amount` of the router's debt mint from the payer's
    /// associated token account and liquidate `vault_id`.
    /// `manager_accounts` are forwarded to the vault manager program.
    pub async fn liquidate(
        &self,
        payer:            &Keypair,
        primary_mint:     Pubkey,
        vault_id:         u64,
        debt_amount:      u64,
        manager_accounts: &[AccountMeta],
    ) -> Result<Signature> {
        if debt_amount == 0 {
            return Err(Error::InvalidArgument("debt amount must be > 0".into()));
        }
        let rpc = self.rpc();
        let (pool, _) = derive_pool(&primary_mint, &self.program_id);
        let gateway = self
            .fetch_gateway(&rpc, &pool)
            .await?
            .ok_or(Error::GatewayNotFound(pool))?;

        let ix = liquidate_vault_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool,
            &gateway.debt_mint,
            &derive_ata(&payer.pubkey(), &gateway.debt_mint),
            &gateway.vault_manager,
            vault_id,
            debt_amount,
            manager_accounts,
        );
        self.sign_and_send(&rpc, &[ix], payer, &[]).await
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Pool totals, registry and the view values at the cluster's clock.
    pub async fn pool_info(&self, primary_mint: Pubkey) -> Result<PoolInfo> {
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &primary_mint).await?;
        let now = self.cluster_time(&rpc).await?;
        let stakers = match fetch_optional(&rpc, &state.queue).await? {
            Some(data) => parse_queue(&data)?.live().count(),
            None => 0,
        };

        Ok(PoolInfo {
            pool,
            mode:                 state.mode,
            owner:                state.owner,
            reward_gateway:       state.reward_gateway,
            primary_mint:         state.primary_mint,
            secondary_mint:       state.secondary_mint,
            total_primary:        state.total_primary,
            total_secondary:      state.total_secondary,
            pool_start:           state.pool_start,
            primary_fees_in_pool: state.primary_fees_in_pool,
            daily_rate:           daily_rate(&state, now)?,
            daily_yield:          daily_yield(&state, now)?,
            reward_tokens:        state
                .reward_tokens
                .iter()
                .map(|t| RewardTokenInfo { mint: t.mint, vault: t.vault, resident: t.resident })
                .collect(),
            stakers,
        })
    }

    /// A staker's locked amounts and projected earnings.
    pub async fn position_info(&self, primary_mint: Pubkey, owner: Pubkey) -> Result<PositionInfo> {
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &primary_mint).await?;
        let (address, _) = derive_position(&pool, &owner, &self.program_id);
        let pos = self
            .fetch_position(&rpc, &pool, &owner)
            .await?
            .ok_or(Error::PositionNotFound { pool, owner })?;
        let now = self.cluster_time(&rpc).await?;

        Ok(PositionInfo {
            address,
            pool,
            owner,
            primary_amount:   pos.primary_amount,
            secondary_amount: pos.secondary_amount,
            start:            pos.start,
            earnings:         projected_earnings(&state, &pos, now)?,
        })
    }

    /// Active stakers, oldest start first.
    pub async fn stakers(&self, primary_mint: Pubkey) -> Result<Vec<StakerInfo>> {
        let rpc = self.rpc();
        let (_, state) = self.fetch_pool(&rpc, &primary_mint).await?;
        let Some(data) = fetch_optional(&rpc, &state.queue).await? else {
            return Ok(vec![]);
        };
        Ok(parse_queue(&data)?
            .live()
            .map(|e| StakerInfo { owner: e.owner, start: e.start })
            .collect())
    }

    /// Every position ever opened in the pool, via `getProgramAccounts`.
    pub async fn positions(&self, primary_mint: Pubkey) -> Result<Vec<(Pubkey, PositionState)>> {
        let rpc = self.rpc();
        let (pool, _) = derive_pool(&primary_mint, &self.program_id);
        let disc = account_disc("Position");

        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::Memcmp(Memcmp::new(
                    0,
                    MemcmpEncodedBytes::Bytes(disc.to_vec()),
                )),
                RpcFilterType::Memcmp(Memcmp::new(
                    40,
                    MemcmpEncodedBytes::Bytes(pool.to_bytes().to_vec()),
                )),
            ]),
            account_config: RpcAccountInfoConfig { ..Default::default() },
            ..Default::default()
        };

        let raw = rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|(pk, acc)| parse_position(&acc.data).ok().map(|p| (pk, p)))
            .collect())
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    async fn sign_and_send(
        &self,
        rpc:          &RpcClient,
        instructions: &[Instruction],
        payer:        &Keypair,
        extra:        &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = rpc.get_latest_blockhash().await?;
        let mut signers: Vec<&dyn Signer> = vec![payer];
        signers.extend(extra.iter().map(|k| k as &dyn Signer));
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &signers,
            blockhash,
        );
        Ok(rpc.send_and_confirm_transaction(&tx).await?)
    }

    async fn change_stake(&self, payer: &Keypair, params: StakeParams, increase: bool) -> Result<StakeResult> {
        let rpc = self.rpc();
        let (pool, state) = self.fetch_pool(&rpc, &params.primary_mint).await?;
        if state.mode == StakingMode::Single && params.secondary_amount > 0 {
            return Err(Error::ModeMismatch("single pools take no secondary amount".into()));
        }
        if params.primary_amount == 0 && params.secondary_amount == 0 {
            return Err(Error::InvalidArgument("nothing to stake or unstake".into()));
        }

        let owner = payer.pubkey();
        let (position, _) = derive_position(&pool, &owner, &self.program_id);
        let (mut ixs, router) = self.stake_router(&rpc, &pool, &state, &owner).await?;
        let rewards = self.payout_pairs(&rpc, &state, &owner).await?;
        let secondary = self.secondary_accounts(&state, &owner);
        let staker_primary = derive_ata(&owner, &state.primary_mint);
        let accounts = StakeAccounts {
            staker:         &owner,
            pool:           &pool,
            primary_vault:  &state.primary_vault,
            staker_primary: &staker_primary,
            secondary:      secondary.as_ref().map(|(v, u)| (v, u)),
            router_pairs:   router.as_deref(),
            reward_pairs:   &rewards,
        };
        ixs.push(if increase {
            increase_stake_ix(&self.program_id, &accounts, params.primary_amount, params.secondary_amount)
        } else {
            decrease_stake_ix(&self.program_id, &accounts, params.primary_amount, params.secondary_amount)
        });
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[]).await?;

        Ok(StakeResult {
            signature:        sig.to_string(),
            pool,
            position,
            primary_amount:   params.primary_amount,
            secondary_amount: params.secondary_amount,
        })
    }

    async fn fetch_pool(&self, rpc: &RpcClient, primary_mint: &Pubkey) -> Result<(Pubkey, PoolState)> {
        let (pool, _) = derive_pool(primary_mint, &self.program_id);
        let data = fetch_optional(rpc, &pool)
            .await?
            .ok_or(Error::PoolNotFound(*primary_mint))?;
        Ok((pool, parse_pool(&data)?))
    }

    async fn fetch_position(
        &self,
        rpc:   &RpcClient,
        pool:  &Pubkey,
        owner: &Pubkey,
    ) -> Result<Option<PositionState>> {
        let (position, _) = derive_position(pool, owner, &self.program_id);
        fetch_optional(rpc, &position)
            .await?
            .map(|data| parse_position(&data))
            .transpose()
    }

    async fn fetch_gateway(&self, rpc: &RpcClient, pool: &Pubkey) -> Result<Option<GatewayState>> {
        let (gateway, _) = derive_gateway(pool, &self.program_id);
        fetch_optional(rpc, &gateway)
            .await?
            .map(|data| parse_gateway(&data))
            .transpose()
    }

    async fn cluster_time(&self, rpc: &RpcClient) -> Result<i64> {
        let data = rpc.get_account_data(&sysvar::clock::ID).await?;
        parse_clock_timestamp(&data)
    }

    fn secondary_accounts(&self, state: &PoolState, owner: &Pubkey) -> Option<(Pubkey, Pubkey)> {
        (state.mode == StakingMode::Dual)
            .then(|| (state.secondary_vault, derive_ata(owner, &state.secondary_mint)))
    }

    /// `(pool_reward_vault, owner_ata)` for every SPL reward token whose
    /// associated token account exists.
    async fn payout_pairs(
        &self,
        rpc:   &RpcClient,
        state: &PoolState,
        owner: &Pubkey,
    ) -> Result<Vec<(Pubkey, Pubkey)>> {
        let candidates: Vec<(Pubkey, Pubkey)> = state
            .reward_tokens
            .iter()
            .filter(|t| t.mint != NATIVE_MINT)
            .map(|t| (t.vault, derive_ata(owner, &t.mint)))
            .collect();
        if candidates.is_empty() {
            return Ok(vec![]);
        }
        let atas: Vec<Pubkey> = candidates.iter().map(|(_, ata)| *ata).collect();
        let accounts = rpc.get_multiple_accounts(&atas).await?;
        Ok(candidates
            .into_iter()
            .zip(accounts)
            .filter_map(|(pair, acc)| acc.map(|_| pair))
            .collect())
    }

    /// Setup plus the canonical router pairs a stake change must carry when
    /// the pool's configured fee source is its gateway; `None` otherwise.
    async fn stake_router(
        &self,
        rpc:   &RpcClient,
        pool:  &Pubkey,
        state: &PoolState,
        payer: &Pubkey,
    ) -> Result<(Vec<Instruction>, Option<Vec<(Pubkey, Pubkey)>>)> {
        let Some(gateway) = self.fetch_gateway(rpc, pool).await? else {
            return Ok((vec![], None));
        };
        if state.reward_gateway != gateway.authority {
            return Ok((vec![], None));
        }
        let (setup, pairs) = self.router_pairs(rpc, pool, state, &gateway, payer, true).await?;
        Ok((setup, Some(pairs)))
    }

    /// `(router_ata, pool_vault)` per managed mint, plus `open_reward_vault`
    /// for vaults a non-zero balance needs that do not exist yet.
    ///
    /// With `idle`, mints the router holds nothing of (or has no account for)
    /// keep their slot, as stake changes expect one pair per managed mint;
    /// otherwise they are left out.
    async fn router_pairs(
        &self,
        rpc:     &RpcClient,
        pool:    &Pubkey,
        state:   &PoolState,
        gateway: &GatewayState,
        payer:   &Pubkey,
        idle:    bool,
    ) -> Result<(Vec<Instruction>, Vec<(Pubkey, Pubkey)>)> {
        let mints = gateway.managed_mints();
        let router_atas: Vec<Pubkey> = mints.iter().map(|m| derive_ata(&gateway.authority, m)).collect();
        let balances = rpc.get_multiple_accounts(&router_atas).await?;

        let mut setup = Vec::new();
        let mut pairs = Vec::new();
        for ((mint, ata), acc) in mints.iter().zip(router_atas).zip(balances) {
            let held = match acc {
                Some(acc) => parse_token_account(&acc.data)?.amount > 0,
                None => false,
            };
            if held {
                let (vault, open) = self.fee_vault(rpc, pool, state, mint, payer).await?;
                setup.extend(open);
                pairs.push((ata, vault));
            } else if idle {
                pairs.push((ata, self.fee_vault_address(pool, state, mint).0));
            }
        }
        Ok((setup, pairs))
    }

    /// The pool account that receives `mint` fees, and whether it is the
    /// reward-vault PDA of a mint the pool has not registered yet.
    fn fee_vault_address(&self, pool: &Pubkey, state: &PoolState, mint: &Pubkey) -> (Pubkey, bool) {
        if state.mode == StakingMode::Dual && *mint == state.secondary_mint {
            return (state.secondary_vault, false);
        }
        if let Some(token) = state.reward_tokens.iter().find(|t| t.mint == *mint) {
            return (token.vault, false);
        }
        (derive_reward_vault(pool, mint, &self.program_id).0, true)
    }

    /// [`Self::fee_vault_address`], and the instruction that creates the
    /// vault when it does not exist yet.
    async fn fee_vault(
        &self,
        rpc:   &RpcClient,
        pool:  &Pubkey,
        state: &PoolState,
        mint:  &Pubkey,
        payer: &Pubkey,
    ) -> Result<(Pubkey, Option<Instruction>)> {
        let (vault, unregistered) = self.fee_vault_address(pool, state, mint);
        if !unregistered {
            return Ok((vault, None));
        }
        let open = fetch_optional(rpc, &vault)
            .await?
            .is_none()
            .then(|| open_reward_vault_ix(&self.program_id, payer, pool, mint));
        Ok((vault, open))
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

/// Account data, or `None` when the account does not exist.
async fn fetch_optional(rpc: &RpcClient, key: &Pubkey) -> Result<Option<Vec<u8>>> {
    let mut accounts = rpc.get_multiple_accounts(std::slice::from_ref(key)).await?;
    Ok(accounts.pop().flatten().map(|acc| acc.data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_program_id() {
        let custom = Pubkey::new_unique();
        let client = StakingClient::new("http://localhost:8899").with_program_id(custom);
        assert_eq!(client.program_id(), &custom);
        assert_eq!(StakingClient::devnet().program_id(), &DEFAULT_PROGRAM_ID);
    }

    #[tokio::test]
    async fn dual_pool_without_secondary_mint_is_rejected_before_rpc() {
        // Port 9 is never listening; reaching the network would surface Error::Rpc.
        let client = StakingClient::new("http://127.0.0.1:9");
        let err = client
            .create_pool(
                &Keypair::new(),
                CreatePoolParams {
                    primary_mint:   Pubkey::new_unique(),
                    secondary_mint: None,
                    mode:           StakingMode::Dual,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ModeMismatch(_)));
    }

    #[tokio::test]
    async fn unreachable_rpc_surfaces_as_rpc_error() {
        let client = StakingClient::new("http://127.0.0.1:9");
        let err = client.pool_info(Pubkey::new_unique()).await.unwrap_err();
        assert!(matches!(err, Error::Rpc(_)));
    }
}
