//! Deploy command: creates a fresh ledger owned by the deployer.

use crate::errors::CliError;
use crate::store::LedgerStore;
use spx_core::types::address_to_hex;
use spx_core::{Address, GenesisConfig, TokenLedger};
use tracing::{info, warn};

/// Identity of a freshly deployed ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// The account that deployed and owns the ledger
    pub deployer: Address,
    /// The ledger's own address
    pub contract: Address,
    /// Total supply minted to the deployer
    pub total_supply: u128,
}

/// Runs the deploy command.
pub async fn run(
    store: &LedgerStore,
    deployer: &Address,
    genesis: &GenesisConfig,
    deploy_nonce: u64,
    force: bool,
) -> Result<Deployment, CliError> {
    if store.exists() {
        if !force {
            return Err(CliError::StateExists(store.path().display().to_string()));
        }
        warn!("Replacing ledger at {}", store.path().display());
    }

    info!("Deploying contracts with the account: {}", address_to_hex(deployer));
    let ledger = TokenLedger::with_config(genesis, *deployer, deploy_nonce)?;
    store.save(&ledger)?;

    let contract = ledger.contract_address();
    info!("{} deployed to: {}", ledger.name(), address_to_hex(&contract));

    Ok(Deployment {
        deployer: *deployer,
        contract,
        total_supply: ledger.total_supply(),
    })
}
