//! Read-only commands.

use crate::errors::CliError;
use crate::store::LedgerStore;
use crate::units::format_units;
use spx_core::types::address_to_hex;
use spx_core::{Address, LedgerEvent};
use tracing::debug;

/// A summary of the ledger's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerInfo {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places in one whole token
    pub decimals: u8,
    /// Total supply in base units
    pub total_supply: u128,
    /// Current owner; zero once renounced
    pub owner: Address,
    /// Address of the ledger itself
    pub contract: Address,
    /// Whether ordinary holders may trade
    pub trading_enabled: bool,
    /// Transfer fee in percent
    pub fee_percent: u8,
    /// Account paid when accumulated fees are swapped out
    pub fee_receiver: Address,
    /// Swap threshold in base units
    pub swap_tokens_at_amount: u128,
    /// Whether the automatic swap runs
    pub swap_enabled: bool,
}

impl LedgerInfo {
    /// Renders the summary one field per line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Name:            {}", self.name),
            format!("Symbol:          {}", self.symbol),
            format!("Decimals:        {}", self.decimals),
            format!(
                "Total supply:    {}",
                format_units(self.total_supply, self.decimals)
            ),
            format!("Owner:           {}", address_to_hex(&self.owner)),
            format!("Contract:        {}", address_to_hex(&self.contract)),
            format!("Trading enabled: {}", self.trading_enabled),
            format!("Transfer fee:    {}%", self.fee_percent),
            format!("Fee receiver:    {}", address_to_hex(&self.fee_receiver)),
            format!(
                "Swap threshold:  {} (enabled: {})",
                format_units(self.swap_tokens_at_amount, self.decimals),
                self.swap_enabled
            ),
        ]
    }
}

/// Runs the info command.
pub async fn info(store: &LedgerStore) -> Result<LedgerInfo, CliError> {
    let ledger = store.load()?;
    Ok(LedgerInfo {
        name: ledger.name().to_string(),
        symbol: ledger.symbol().to_string(),
        decimals: ledger.decimals(),
        total_supply: ledger.total_supply(),
        owner: ledger.owner(),
        contract: ledger.contract_address(),
        trading_enabled: ledger.trading_enabled(),
        fee_percent: ledger.fee_percent(),
        fee_receiver: ledger.fee_receiver(),
        swap_tokens_at_amount: ledger.swap_tokens_at_amount(),
        swap_enabled: ledger.swap_enabled(),
    })
}

/// Runs the balance command, returning the formatted balance.
pub async fn balance(store: &LedgerStore, account: &Address) -> Result<String, CliError> {
    let ledger = store.load()?;
    let balance = ledger.balance_of(account);
    debug!("Balance of {}: {}", address_to_hex(account), balance);
    Ok(format!(
        "{} {}",
        format_units(balance, ledger.decimals()),
        ledger.symbol()
    ))
}

/// Runs the allowance command, returning the formatted allowance.
pub async fn allowance(
    store: &LedgerStore,
    owner: &Address,
    spender: &Address,
) -> Result<String, CliError> {
    let ledger = store.load()?;
    let allowance = ledger.allowance(owner, spender);
    Ok(format!(
        "{} {}",
        format_units(allowance, ledger.decimals()),
        ledger.symbol()
    ))
}

/// Runs the is-excluded command.
pub async fn is_excluded(store: &LedgerStore, account: &Address) -> Result<bool, CliError> {
    Ok(store.load()?.is_excluded_from_fees(account))
}

/// Runs the events command. With `drain`, the log is cleared afterwards.
///
/// The log is part of the saved state, so it grows with every command until drained.
pub async fn events(store: &LedgerStore, drain: bool) -> Result<Vec<LedgerEvent>, CliError> {
    if drain {
        return store.update(|ledger| Ok::<_, CliError>(ledger.drain_events()));
    }
    Ok(store.load()?.events().to_vec())
}
