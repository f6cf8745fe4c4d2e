//! Token movement commands.

use crate::errors::CliError;
use crate::store::LedgerStore;
use crate::units::parse_units;
use spx_core::types::address_to_hex;
use spx_core::Address;
use tracing::info;

/// Runs the transfer command. `amount` is a decimal token amount.
pub async fn transfer(
    store: &LedgerStore,
    caller: &Address,
    to: &Address,
    amount: &str,
) -> Result<String, CliError> {
    store.update(|ledger| -> Result<String, CliError> {
        let raw = parse_units(amount, ledger.decimals())?;
        ledger.transfer(caller, to, raw)?;
        info!(
            "Transferred {} from {} to {}",
            raw,
            address_to_hex(caller),
            address_to_hex(to)
        );
        Ok(format!(
            "Sent {} {} to {}",
            amount,
            ledger.symbol(),
            address_to_hex(to)
        ))
    })
}

/// Runs the approve command.
pub async fn approve(
    store: &LedgerStore,
    caller: &Address,
    spender: &Address,
    amount: &str,
) -> Result<String, CliError> {
    store.update(|ledger| -> Result<String, CliError> {
        let raw = parse_units(amount, ledger.decimals())?;
        ledger.approve(caller, spender, raw)?;
        Ok(format!(
            "Approved {} to spend {} {}",
            address_to_hex(spender),
            amount,
            ledger.symbol()
        ))
    })
}

/// Runs the transfer-from command.
pub async fn transfer_from(
    store: &LedgerStore,
    caller: &Address,
    from: &Address,
    to: &Address,
    amount: &str,
) -> Result<String, CliError> {
    store.update(|ledger| -> Result<String, CliError> {
        let raw = parse_units(amount, ledger.decimals())?;
        ledger.transfer_from(caller, from, to, raw)?;
        info!(
            "{} moved {} from {} to {}",
            address_to_hex(caller),
            raw,
            address_to_hex(from),
            address_to_hex(to)
        );
        Ok(format!(
            "Sent {} {} from {} to {}",
            amount,
            ledger.symbol(),
            address_to_hex(from),
            address_to_hex(to)
        ))
    })
}
