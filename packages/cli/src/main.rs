use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use reward_staking_sdk::{
    client::DEFAULT_PROGRAM_ID,
    math::RATE_PRECISION,
    ClaimParams, CreateGatewayParams, CreatePoolParams, StakeParams, StakingClient, StakingMode,
};
use serde_json::{json, Value};
use solana_sdk::{
    instruction::AccountMeta,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::str::FromStr;

const NATIVE_LABEL: &str = "SOL (native)";

/// Expand `~/` to `$HOME/` in keypair paths.
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{}", std::env::var("HOME").unwrap_or_default(), rest)
    } else {
        path.to_string()
    }
}

fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded = expand_home(path);
    read_keypair_file(&expanded)
        .map_err(|e| anyhow!(
            "Cannot load keypair from '{}': {}\n  \
             Set STAKING_KEYPAIR or pass --keypair to specify a different path.",
            expanded, e
        ))
}

/// `PUBKEY[:w][:s]` → AccountMeta (writable / signer flags).
fn parse_account_meta(s: &str) -> std::result::Result<AccountMeta, String> {
    let mut parts = s.split(':');
    let key = parts.next().unwrap_or_default();
    let pubkey = Pubkey::from_str(key).map_err(|e| format!("bad pubkey '{key}': {e}"))?;
    let (mut writable, mut signer) = (false, false);
    for flag in parts {
        match flag {
            "w" => writable = true,
            "s" => signer = true,
            other => return Err(format!("unknown account flag '{other}' (use :w and/or :s)")),
        }
    }
    Ok(AccountMeta { pubkey, is_signer: signer, is_writable: writable })
}

/// Render a rate scaled by RATE_PRECISION as a decimal.
fn format_rate(rate: u128) -> String {
    format!("{}.{:012}", rate / RATE_PRECISION, rate % RATE_PRECISION)
}

fn mint_label(mint: &Pubkey) -> String {
    if *mint == Pubkey::default() {
        NATIVE_LABEL.to_string()
    } else {
        mint.to_string()
    }
}

/// Print an SDK result as `{"status":"ok","command":…, …fields}`.
fn print_json(command: &str, result: &impl serde::Serialize) -> Result<()> {
    let mut value = serde_json::to_value(result).context("serializing result")?;
    if let Value::Object(map) = &mut value {
        map.insert("status".into(), json!("ok"));
        map.insert("command".into(), json!(command));
    }
    println!("{value}");
    Ok(())
}

// ─── Version banner ───────────────────────────────────────────────────────────

fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  Reward Staking  v{ver}  ·  staking ledger + fee router on Solana");
    println!("  {}", "─".repeat(62));
    println!("  Program   {DEFAULT_PROGRAM_ID}");
    println!("  Modes     dual (primary + secondary)  ·  single (primary only)");
    println!("  Rewards   any SPL token or native SOL, pro-rata to locked stake");
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// Reward Staking: stake, claim, and route protocol fees on Solana.
///
/// Every command supports --json for machine-readable output.
/// Global options can also be set via environment variables:
///   STAKING_RPC_URL     Solana JSON-RPC endpoint
///   STAKING_KEYPAIR     path to Ed25519 keypair JSON
///   STAKING_PROGRAM_ID  deployed program id
#[derive(Parser)]
#[command(
    name    = "reward-staking",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Staking ledger with multi-token fee distribution and a fee router on Solana.",
    after_help = "\
ENVIRONMENT:
  STAKING_RPC_URL     Solana JSON-RPC endpoint  [default: https://api.mainnet-beta.solana.com]
  STAKING_KEYPAIR     Path to Ed25519 keypair JSON  [default: ~/.config/solana/id.json]
  STAKING_PROGRAM_ID  Program id  [default: GTPuP6Rd8tijypDk6kaQ1kUMYBqy82euYeTNqay88Bze]

QUICK START:
  reward-staking pool-info --primary-mint <MINT>
  reward-staking stake     --primary-mint <MINT> --amount 100000000 --secondary-amount 50000000
  reward-staking position  --primary-mint <MINT>
  reward-staking claim     --primary-mint <MINT>
  reward-staking unstake   --primary-mint <MINT> --amount 100000000 --secondary-amount 50000000"
)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(
        long,
        global     = true,
        value_name = "URL",
        default_value = "https://api.mainnet-beta.solana.com",
        env = "STAKING_RPC_URL"
    )]
    rpc_url: String,

    /// Path to the Ed25519 keypair JSON file
    #[arg(
        long,
        global     = true,
        value_name = "PATH",
        default_value = "~/.config/solana/id.json",
        env = "STAKING_KEYPAIR"
    )]
    keypair: String,

    /// Program id of the deployed staking program
    #[arg(long, global = true, value_name = "PUBKEY", env = "STAKING_PROGRAM_ID")]
    program_id: Option<Pubkey>,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Dual,
    Single,
}

impl From<ModeArg> for StakingMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Dual   => StakingMode::Dual,
            ModeArg::Single => StakingMode::Single,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a staking pool for a primary mint
    #[command(
        after_help = "\
EXAMPLES:
  # Dual pool: primary + secondary locked, secondary-mint fees paid by the daily rate
  reward-staking init-pool --primary-mint <TST> --secondary-mint <EUROS> --mode dual

  # Single pool: primary only
  reward-staking init-pool --primary-mint <TST> --mode single

NOTES:
  The creator owns the pool and is its fee source until `init-gateway` or
  `set-gateway` runs."
    )]
    InitPool {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// Required for --mode dual
        #[arg(long, value_name = "MINT")]
        secondary_mint: Option<Pubkey>,

        #[arg(long, value_enum, default_value = "dual")]
        mode: ModeArg,
    },

    /// Create the fee router for a pool and point the pool at it (owner only)
    #[command(
        after_help = "\
EXAMPLES:
  reward-staking init-gateway --primary-mint <TST> --debt-mint <EUROS> \\
    --vault-manager <PROGRAM> --reward-mint <WBTC> --reward-mint <ARB>

NOTES:
  Send fees to the printed gateway authority: lamports directly, tokens to its
  associated token accounts. `sweep` forwards them to stakers."
    )]
    InitGateway {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// Debt token burned by `liquidate`; always swept
        #[arg(long, value_name = "MINT")]
        debt_mint: Pubkey,

        /// Program implementing `liquidate_vault`
        #[arg(long, value_name = "PROGRAM")]
        vault_manager: Pubkey,

        /// Additional mints the router sweeps (repeatable)
        #[arg(long = "reward-mint", value_name = "MINT")]
        reward_mints: Vec<Pubkey>,
    },

    /// Change the key the pool accepts fee drops from (owner only)
    SetGateway {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// New fee source (a gateway authority PDA or any signer)
        #[arg(long, value_name = "PUBKEY")]
        gateway: Pubkey,
    },

    /// Replace the router's reward-mint set (operator only)
    SetRewardMints {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        #[arg(long = "mint", value_name = "MINT", required = true)]
        mints: Vec<Pubkey>,
    },

    /// Lock primary (and, in dual pools, secondary) stake
    #[command(
        after_help = "\
EXAMPLES:
  reward-staking stake --primary-mint <TST> --amount 100000000 --secondary-amount 50000000

NOTES:
  Router fees are swept into the pool first, in the same transaction.
  Rewards owed so far are paid out and the position's start resets to now."
    )]
    Stake {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// Primary amount (atomic units)
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        amount: u64,

        /// Secondary amount (atomic units, dual pools only)
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        secondary_amount: u64,
    },

    /// Withdraw stake
    Unstake {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        amount: u64,

        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        secondary_amount: u64,
    },

    /// Collect earned rewards
    #[command(
        after_help = "\
EXAMPLES:
  reward-staking claim --primary-mint <TST>
  reward-staking claim --primary-mint <TST> --compound

NOTES:
  --compound re-locks the secondary-mint reward as stake (dual pools only)."
    )]
    Claim {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        #[arg(long, default_value_t = false)]
        compound: bool,
    },

    /// Forward every fee the router holds into the pool (anyone may call)
    Sweep {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,
    },

    /// Drop tokens from your own account straight into the pool (operator only)
    Airdrop {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// Token to drop
        #[arg(long, value_name = "MINT")]
        mint: Pubkey,

        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
    },

    /// Burn debt tokens and liquidate a vault through the vault manager
    #[command(
        after_help = "\
EXAMPLES:
  reward-staking liquidate --primary-mint <TST> --vault-id 42 --debt-amount 1000000 \\
    --account <VAULT>:w --account <COLLATERAL_ATA>:w --account <ME>:s

NOTES:
  --account entries are forwarded in order to the vault manager.
  Flags: :w writable, :s signer."
    )]
    Liquidate {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        #[arg(long, value_name = "ID")]
        vault_id: u64,

        #[arg(long, value_name = "AMOUNT")]
        debt_amount: u64,

        #[arg(long = "account", value_name = "PUBKEY[:w][:s]", value_parser = parse_account_meta)]
        accounts: Vec<AccountMeta>,
    },

    /// Pool totals, daily rate and yield, and the reward registry
    PoolInfo {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,
    },

    /// A position's stake and projected earnings
    Position {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,

        /// Defaults to the keypair's public key
        #[arg(long, value_name = "PUBKEY")]
        owner: Option<Pubkey>,
    },

    /// Active stakers, oldest first
    Stakers {
        #[arg(long, value_name = "MINT")]
        primary_mint: Pubkey,
    },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return Ok(());
    }

    let cli = Cli::parse();
    let client = StakingClient::new(cli.rpc_url.clone())
        .with_program_id(cli.program_id.unwrap_or(DEFAULT_PROGRAM_ID));

    match cli.command {
        Commands::InitPool { primary_mint, secondary_mint, mode } => {
            cmd_init_pool(&client, &cli.keypair, primary_mint, secondary_mint, mode.into(), cli.json).await
        }
        Commands::InitGateway { primary_mint, debt_mint, vault_manager, reward_mints } => {
            let params = CreateGatewayParams { primary_mint, debt_mint, vault_manager, reward_mints };
            cmd_init_gateway(&client, &cli.keypair, params, cli.json).await
        }
        Commands::SetGateway { primary_mint, gateway } => {
            let payer = load_keypair(&cli.keypair)?;
            let sig = client
                .set_reward_gateway(&payer, primary_mint, gateway)
                .await
                .context("set_reward_gateway transaction failed (are you the pool owner?)")?;
            report_tx("set-gateway", "Reward Gateway Set", &sig.to_string(), cli.json)
        }
        Commands::SetRewardMints { primary_mint, mints } => {
            let payer = load_keypair(&cli.keypair)?;
            let sig = client
                .set_reward_mints(&payer, primary_mint, &mints)
                .await
                .context("set_reward_mints transaction failed (are you the gateway operator?)")?;
            report_tx("set-reward-mints", "Reward Mints Set", &sig.to_string(), cli.json)
        }
        Commands::Stake { primary_mint, amount, secondary_amount } => {
            cmd_stake(&client, &cli.keypair, primary_mint, amount, secondary_amount, true, cli.json).await
        }
        Commands::Unstake { primary_mint, amount, secondary_amount } => {
            cmd_stake(&client, &cli.keypair, primary_mint, amount, secondary_amount, false, cli.json).await
        }
        Commands::Claim { primary_mint, compound } => {
            cmd_claim(&client, &cli.keypair, primary_mint, compound, cli.json).await
        }
        Commands::Sweep { primary_mint } => {
            let payer = load_keypair(&cli.keypair)?;
            let res = client.sweep(&payer, primary_mint).await.context("sweep_fees transaction failed")?;
            if cli.json {
                return print_json("sweep", &res);
            }
            println!("─── Fees Swept ───────────────────────────────────────────────────");
            println!("  Pool             {}", res.pool);
            println!("  Token accounts   {}", res.token_accounts);
            println!("  Transaction      {}", res.signature);
            Ok(())
        }
        Commands::Airdrop { primary_mint, mint, amount } => {
            let payer = load_keypair(&cli.keypair)?;
            let sig = client
                .airdrop(&payer, primary_mint, mint, amount)
                .await
                .context("airdrop_token transaction failed (are you the gateway operator?)")?;
            report_tx("airdrop", "Airdrop Sent", &sig.to_string(), cli.json)
        }
        Commands::Liquidate { primary_mint, vault_id, debt_amount, accounts } => {
            let payer = load_keypair(&cli.keypair)?;
            let sig = client
                .liquidate(&payer, primary_mint, vault_id, debt_amount, &accounts)
                .await
                .with_context(|| format!("liquidate_vault {vault_id} failed"))?;
            report_tx("liquidate", "Vault Liquidated", &sig.to_string(), cli.json)
        }
        Commands::PoolInfo { primary_mint } => cmd_pool_info(&client, primary_mint, cli.json).await,
        Commands::Position { primary_mint, owner } => {
            let owner = match owner {
                Some(o) => o,
                None => load_keypair(&cli.keypair)?.pubkey(),
            };
            cmd_position(&client, primary_mint, owner, cli.json).await
        }
        Commands::Stakers { primary_mint } => cmd_stakers(&client, primary_mint, cli.json).await,
    }
}

fn report_tx(command: &str, title: &str, signature: &str, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", json!({ "status": "ok", "command": command, "tx": signature }));
    } else {
        println!("─── {title} {}", "─".repeat(60usize.saturating_sub(title.len())));
        println!("  Transaction      {signature}");
    }
    Ok(())
}

// ─── init-pool / init-gateway ────────────────────────────────────────────────

async fn cmd_init_pool(
    client:         &StakingClient,
    keypair_path:   &str,
    primary_mint:   Pubkey,
    secondary_mint: Option<Pubkey>,
    mode:           StakingMode,
    json_output:    bool,
) -> Result<()> {
    if mode == StakingMode::Dual && secondary_mint.is_none() {
        return Err(anyhow!("--mode dual needs --secondary-mint <MINT>."));
    }
    let payer = load_keypair(keypair_path)?;
    let res = client
        .create_pool(&payer, CreatePoolParams { primary_mint, secondary_mint, mode })
        .await
        .context("initialize_pool transaction failed")?;

    if json_output {
        return print_json("init-pool", &res);
    }
    println!("─── Pool Created ─────────────────────────────────────────────────");
    println!("  Mode             {:?}", res.mode);
    println!("  Pool PDA         {}", res.pool);
    println!("  Pool authority   {}", res.pool_authority);
    println!("  Staker queue     {}", res.queue);
    println!("  Primary vault    {}", res.primary_vault);
    if res.mode == StakingMode::Dual {
        println!("  Secondary vault  {}", res.secondary_vault);
    }
    println!("  Transaction      {}", res.signature);
    println!();
    println!("  Next: `reward-staking init-gateway --primary-mint {primary_mint} ...`");
    Ok(())
}

async fn cmd_init_gateway(
    client:       &StakingClient,
    keypair_path: &str,
    params:       CreateGatewayParams,
    json_output:  bool,
) -> Result<()> {
    let payer = load_keypair(keypair_path)?;
    let res = client
        .create_gateway(&payer, params)
        .await
        .context("initialize_gateway transaction failed (are you the pool owner?)")?;

    if json_output {
        return print_json("init-gateway", &res);
    }
    println!("─── Gateway Created ──────────────────────────────────────────────");
    println!("  Gateway          {}", res.gateway);
    println!("  Fee address      {}", res.gateway_authority);
    println!("  Transaction      {}", res.signature);
    println!();
    println!("  Send fees to the fee address; `sweep` forwards them to stakers.");
    Ok(())
}

// ─── stake / unstake / claim ─────────────────────────────────────────────────

async fn cmd_stake(
    client:           &StakingClient,
    keypair_path:     &str,
    primary_mint:     Pubkey,
    primary_amount:   u64,
    secondary_amount: u64,
    increase:         bool,
    json_output:      bool,
) -> Result<()> {
    if primary_amount == 0 && secondary_amount == 0 {
        return Err(anyhow!("Pass --amount and/or --secondary-amount (atomic units, > 0)."));
    }
    let payer = load_keypair(keypair_path)?;
    let params = StakeParams { primary_mint, primary_amount, secondary_amount };
    let (command, title) = if increase { ("stake", "Staked") } else { ("unstake", "Unstaked") };
    let res = if increase {
        client.stake(&payer, params).await
    } else {
        client.unstake(&payer, params).await
    }
    .with_context(|| format!("{command} transaction failed"))?;

    if json_output {
        return print_json(command, &res);
    }
    println!("─── {title} {}", "─".repeat(60 - title.len()));
    println!("  Pool             {}", res.pool);
    println!("  Position         {}", res.position);
    println!("  Primary          {}", res.primary_amount);
    println!("  Secondary        {}", res.secondary_amount);
    println!("  Transaction      {}", res.signature);
    Ok(())
}

async fn cmd_claim(
    client:       &StakingClient,
    keypair_path: &str,
    primary_mint: Pubkey,
    compound:     bool,
    json_output:  bool,
) -> Result<()> {
    let payer = load_keypair(keypair_path)?;
    let res = client
        .claim(&payer, ClaimParams { primary_mint, compound })
        .await
        .context("claim transaction failed")?;

    if json_output {
        return print_json("claim", &res);
    }
    println!("─── Rewards Claimed ──────────────────────────────────────────────");
    println!("  Position         {}", res.position);
    let verb = if res.compound { "Compounded" } else { "Primary asset" };
    println!("  {verb:<16} {}", res.expected.primary);
    for r in &res.expected.rewards {
        println!("  {:<16} {}", r.amount, mint_label(&r.mint));
    }
    println!("  Transaction      {}", res.signature);
    println!();
    println!("  Amounts are projections at send time; the on-chain payout may include");
    println!("  fees swept in the same transaction.");
    Ok(())
}

// ─── read commands ───────────────────────────────────────────────────────────

async fn cmd_pool_info(client: &StakingClient, primary_mint: Pubkey, json_output: bool) -> Result<()> {
    let info = client
        .pool_info(primary_mint)
        .await
        .with_context(|| format!("No pool for primary mint {primary_mint}"))?;

    if json_output {
        return print_json("pool-info", &info);
    }
    println!("─── Pool Info ────────────────────────────────────────────────────");
    println!("  Pool             {}", info.pool);
    println!("  Mode             {:?}", info.mode);
    println!("  Owner            {}", info.owner);
    println!("  Fee source       {}", info.reward_gateway);
    println!("  Primary mint     {}", info.primary_mint);
    if info.mode == StakingMode::Dual {
        println!("  Secondary mint   {}", info.secondary_mint);
    }
    println!("  Total primary    {}", info.total_primary);
    println!("  Total secondary  {}", info.total_secondary);
    println!("  Stakers          {}", info.stakers);
    println!("  Pool start       {}", info.pool_start);
    if info.mode == StakingMode::Dual {
        println!("  Fees in pool     {}", info.primary_fees_in_pool);
        println!("  Daily rate       {}  (per primary unit)", format_rate(info.daily_rate));
    }
    if !info.reward_tokens.is_empty() {
        println!();
        println!("  ─── Reward tokens ───────────────────────────────");
        for (t, y) in info.reward_tokens.iter().zip(&info.daily_yield) {
            println!("  {}", mint_label(&t.mint));
            println!("        Resident   {}", t.resident);
            println!("        Daily      {}", format_rate(y.rate));
        }
    }
    Ok(())
}

async fn cmd_position(
    client:       &StakingClient,
    primary_mint: Pubkey,
    owner:        Pubkey,
    json_output:  bool,
) -> Result<()> {
    let info = client.position_info(primary_mint, owner).await.with_context(|| {
        format!("No position for {owner}.\n  Run `reward-staking stake` to open one.")
    })?;

    if json_output {
        return print_json("position", &info);
    }
    println!("─── Position ─────────────────────────────────────────────────────");
    println!("  Address          {}", info.address);
    println!("  Owner            {}", info.owner);
    println!("  Primary          {}", info.primary_amount);
    println!("  Secondary        {}", info.secondary_amount);
    println!("  Start            {}", info.start);
    println!();
    println!("  ─── Claimable now ───────────────────────────────");
    println!("  Primary asset    {}", info.earnings.primary);
    for r in &info.earnings.rewards {
        println!("  {:<16} {}", r.amount, mint_label(&r.mint));
    }
    Ok(())
}

async fn cmd_stakers(client: &StakingClient, primary_mint: Pubkey, json_output: bool) -> Result<()> {
    let stakers = client.stakers(primary_mint).await.context("reading staker queue")?;

    if json_output {
        let items: Vec<_> = stakers
            .iter()
            .map(|s| json!({ "owner": s.owner.to_string(), "start": s.start }))
            .collect();
        println!("{}", json!({ "status": "ok", "command": "stakers", "stakers": items }));
        return Ok(());
    }
    println!("─── Stakers ({}) ──────────────────────────────────────────────────", stakers.len());
    for (i, s) in stakers.iter().enumerate() {
        println!("  [{:>3}]  {}  start={}", i + 1, s.owner, s.start);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_flags_parse() {
        let key = Pubkey::new_unique();
        let meta = parse_account_meta(&format!("{key}:w:s")).unwrap();
        assert_eq!(meta.pubkey, key);
        assert!(meta.is_writable && meta.is_signer);

        let ro = parse_account_meta(&key.to_string()).unwrap();
        assert!(!ro.is_writable && !ro.is_signer);

        assert!(parse_account_meta(&format!("{key}:x")).is_err());
        assert!(parse_account_meta("not-a-key").is_err());
    }

    #[test]
    fn rates_render_with_twelve_decimals() {
        assert_eq!(format_rate(RATE_PRECISION / 10), "0.100000000000");
        assert_eq!(format_rate(2 * RATE_PRECISION + 5), "2.000000000005");
    }

    #[test]
    fn home_is_expanded() {
        std::env::set_var("HOME", "/home/staker");
        assert_eq!(expand_home("~/id.json"), "/home/staker/id.json");
        assert_eq!(expand_home("/abs/id.json"), "/abs/id.json");
    }
}
