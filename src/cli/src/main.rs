//! Deployment and operator CLI for the Silver Phoenix token ledger.

use anyhow::Result;
use colored::Colorize;
use spx_cli::commands::{admin, deploy, query, transfer};
use spx_cli::units::{format_units, parse_address};
use spx_cli::{CliConfig, CliError, LedgerStore};
use spx_core::types::address_to_hex;
use spx_core::{Address, GenesisConfig};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the CLI.
#[derive(Debug, StructOpt)]
#[structopt(name = "spx", about = "Silver Phoenix token ledger")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the ledger state file
    #[structopt(short, long, parse(from_os_str))]
    state: Option<PathBuf>,

    /// Account issuing the call (hex)
    #[structopt(long)]
    caller: Option<String>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the CLI.
#[derive(Debug, StructOpt)]
enum Command {
    /// Deploy a new ledger owned by the caller
    #[structopt(name = "deploy")]
    Deploy {
        /// Genesis configuration file (JSON)
        #[structopt(long, parse(from_os_str))]
        genesis: Option<PathBuf>,

        /// Deployment nonce, selects the contract address
        #[structopt(long, default_value = "0")]
        nonce: u64,

        /// Replace an existing ledger
        #[structopt(long)]
        force: bool,
    },

    /// Show token metadata and configuration
    #[structopt(name = "info")]
    Info,

    /// Get the balance of an account
    #[structopt(name = "balance")]
    Balance {
        /// Account address
        address: String,
    },

    /// Get the remaining allowance of a spender
    #[structopt(name = "allowance")]
    Allowance {
        /// Token holder
        #[structopt(long)]
        owner: String,

        /// Approved spender
        #[structopt(long)]
        spender: String,
    },

    /// Check whether an account is exempt from the transfer fee
    #[structopt(name = "is-excluded")]
    IsExcluded {
        /// Account address
        address: String,
    },

    /// Print recorded events. The log is kept in the state file until drained
    #[structopt(name = "events")]
    Events {
        /// Clear the log after printing, shrinking the state file
        #[structopt(long)]
        drain: bool,
    },

    /// Send tokens from the caller
    #[structopt(name = "transfer")]
    Transfer {
        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount in whole tokens, e.g. 1000 or 12.5
        #[structopt(long)]
        amount: String,
    },

    /// Allow a spender to move the caller's tokens
    #[structopt(name = "approve")]
    Approve {
        /// Spender address
        #[structopt(long)]
        spender: String,

        /// Amount in whole tokens
        #[structopt(long)]
        amount: String,
    },

    /// Spend an allowance granted by another account
    #[structopt(name = "transfer-from")]
    TransferFrom {
        /// Account whose tokens are moved
        #[structopt(long)]
        from: String,

        /// Recipient address
        #[structopt(long)]
        to: String,

        /// Amount in whole tokens
        #[structopt(long)]
        amount: String,
    },

    /// Open trading to everyone (owner only)
    #[structopt(name = "enable-trading")]
    EnableTrading,

    /// Set an account's fee exemption (owner only)
    #[structopt(name = "exclude-from-fees")]
    ExcludeFromFees {
        /// Account address
        #[structopt(long)]
        account: String,

        /// true to exempt, false to charge fees again
        #[structopt(long, parse(try_from_str))]
        excluded: bool,
    },

    /// Replace the fee receiver (owner only)
    #[structopt(name = "change-fee-receiver")]
    ChangeFeeReceiver {
        /// New receiver address
        receiver: String,
    },

    /// Set the fee swap threshold (owner only)
    #[structopt(name = "set-swap-token-amount")]
    SetSwapTokenAmount {
        /// Threshold in whole tokens
        #[structopt(long)]
        amount: String,

        /// Whether the automatic swap runs
        #[structopt(long, parse(try_from_str))]
        enabled: bool,
    },

    /// Recover tokens held by the ledger itself (owner only)
    #[structopt(name = "claim-stuck-tokens")]
    ClaimStuckTokens {
        /// Token address; the ledger's own address recovers SPX
        token: String,
    },

    /// Record a foreign token arriving at the ledger's address
    #[structopt(name = "deposit-foreign")]
    DepositForeign {
        /// Token address; zero for the native coin
        #[structopt(long)]
        token: String,

        /// Amount in the token's base units
        #[structopt(long)]
        amount: u128,
    },

    /// Hand ownership to another account (owner only)
    #[structopt(name = "transfer-ownership")]
    TransferOwnership {
        /// New owner address
        new_owner: String,
    },

    /// Give up ownership for good (owner only)
    #[structopt(name = "renounce-ownership")]
    RenounceOwnership,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    // Override state file if specified
    if let Some(state) = opt.state {
        config.state_file = state;
    }
    if let Some(caller) = opt.caller {
        config.default_caller = Some(caller);
    }
    debug!("Using state file {}", config.state_file.display());

    let store = LedgerStore::new(&config.state_file);

    // Run the appropriate command
    run(opt.cmd, &config, &store).await.map_err(|e| {
        error!("{}", e);
        anyhow::Error::from(e)
    })
}

fn caller(config: &CliConfig) -> Result<Address, CliError> {
    let hex = config.default_caller.as_deref().ok_or(CliError::MissingCaller)?;
    parse_address(hex)
}

async fn run(cmd: Command, config: &CliConfig, store: &LedgerStore) -> Result<(), CliError> {
    match cmd {
        Command::Deploy { genesis, nonce, force } => {
            let deployer = caller(config)?;
            let genesis = match genesis.or_else(|| config.genesis_file.clone()) {
                Some(path) => GenesisConfig::from_file(path)?,
                None => GenesisConfig::default(),
            };
            println!(
                "{} {}",
                "Deploying contracts with the account:".green(),
                address_to_hex(&deployer)
            );
            let deployment = deploy::run(store, &deployer, &genesis, nonce, force).await?;
            println!(
                "{} {}",
                format!("{} deployed to:", genesis.name).as_str().green(),
                address_to_hex(&deployment.contract)
            );
            println!(
                "{} {} {}",
                "Minted:".green(),
                format_units(deployment.total_supply, genesis.decimals),
                genesis.symbol
            );
        }
        Command::Info => {
            let info = query::info(store).await?;
            for line in info.lines() {
                println!("{}", line);
            }
        }
        Command::Balance { address } => {
            let balance = query::balance(store, &parse_address(&address)?).await?;
            println!("{} {}", "Balance:".green(), balance);
        }
        Command::Allowance { owner, spender } => {
            let allowance =
                query::allowance(store, &parse_address(&owner)?, &parse_address(&spender)?)
                    .await?;
            println!("{} {}", "Allowance:".green(), allowance);
        }
        Command::IsExcluded { address } => {
            let excluded = query::is_excluded(store, &parse_address(&address)?).await?;
            println!("{} {}", "Excluded from fees:".green(), excluded);
        }
        Command::Events { drain } => {
            for event in query::events(store, drain).await? {
                println!("{}", event);
            }
        }
        Command::Transfer { to, amount } => {
            let msg = transfer::transfer(store, &caller(config)?, &parse_address(&to)?, &amount)
                .await?;
            println!("{} {}", "Transaction applied:".green(), msg);
        }
        Command::Approve { spender, amount } => {
            let msg =
                transfer::approve(store, &caller(config)?, &parse_address(&spender)?, &amount)
                    .await?;
            println!("{} {}", "Transaction applied:".green(), msg);
        }
        Command::TransferFrom { from, to, amount } => {
            let msg = transfer::transfer_from(
                store,
                &caller(config)?,
                &parse_address(&from)?,
                &parse_address(&to)?,
                &amount,
            )
            .await?;
            println!("{} {}", "Transaction applied:".green(), msg);
        }
        Command::EnableTrading => {
            admin::enable_trading(store, &caller(config)?).await?;
            println!("{}", "Trading enabled".green());
        }
        Command::ExcludeFromFees { account, excluded } => {
            let account = parse_address(&account)?;
            admin::exclude_from_fees(store, &caller(config)?, &account, excluded).await?;
            println!(
                "{} {} -> {}",
                "Fee exemption set:".green(),
                address_to_hex(&account),
                excluded
            );
        }
        Command::ChangeFeeReceiver { receiver } => {
            let receiver = parse_address(&receiver)?;
            admin::change_fee_receiver(store, &caller(config)?, &receiver).await?;
            println!(
                "{} {}",
                "Fee receiver changed:".green(),
                address_to_hex(&receiver)
            );
        }
        Command::SetSwapTokenAmount { amount, enabled } => {
            let raw =
                admin::set_swap_token_amount(store, &caller(config)?, &amount, enabled).await?;
            println!(
                "{} {} base units (enabled: {})",
                "Swap threshold set:".green(),
                raw,
                enabled
            );
        }
        Command::ClaimStuckTokens { token } => {
            let recovery =
                admin::claim_stuck_tokens(store, &caller(config)?, &parse_address(&token)?)
                    .await?;
            println!("{} {}", "Recovered:".green(), recovery);
        }
        Command::DepositForeign { token, amount } => {
            admin::deposit_foreign(store, &parse_address(&token)?, amount).await?;
            println!("{} {}", "Deposit recorded:".green(), amount);
        }
        Command::TransferOwnership { new_owner } => {
            let new_owner = parse_address(&new_owner)?;
            admin::transfer_ownership(store, &caller(config)?, &new_owner).await?;
            println!(
                "{} {}",
                "Ownership transferred to".green(),
                address_to_hex(&new_owner)
            );
        }
        Command::RenounceOwnership => {
            admin::renounce_ownership(store, &caller(config)?).await?;
            println!("{}", "Ownership renounced".yellow());
        }
    }

    Ok(())
}
