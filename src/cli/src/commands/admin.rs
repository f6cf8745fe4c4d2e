//! Owner-only commands.

use crate::errors::CliError;
use crate::store::LedgerStore;
use crate::units::parse_units;
use spx_core::types::address_to_hex;
use spx_core::{Address, Recovery};
use tracing::info;

/// Runs the enable-trading command.
pub async fn enable_trading(store: &LedgerStore, caller: &Address) -> Result<(), CliError> {
    store.update(|ledger| ledger.enable_trading(caller))
}

/// Runs the exclude-from-fees command.
pub async fn exclude_from_fees(
    store: &LedgerStore,
    caller: &Address,
    account: &Address,
    excluded: bool,
) -> Result<(), CliError> {
    store.update(|ledger| ledger.exclude_from_fees(caller, account, excluded))
}

/// Runs the change-fee-receiver command.
pub async fn change_fee_receiver(
    store: &LedgerStore,
    caller: &Address,
    fee_receiver: &Address,
) -> Result<(), CliError> {
    store.update(|ledger| ledger.change_fee_receiver(caller, fee_receiver))
}

/// Runs the set-swap-token-amount command. `amount` is a decimal token amount.
pub async fn set_swap_token_amount(
    store: &LedgerStore,
    caller: &Address,
    amount: &str,
    enabled: bool,
) -> Result<u128, CliError> {
    store.update(|ledger| -> Result<u128, CliError> {
        let raw = parse_units(amount, ledger.decimals())?;
        ledger.set_swap_token_amount(caller, raw, enabled)?;
        Ok(raw)
    })
}

/// Runs the claim-stuck-tokens command.
pub async fn claim_stuck_tokens(
    store: &LedgerStore,
    caller: &Address,
    token: &Address,
) -> Result<Recovery, CliError> {
    let recovery = store.update(|ledger| ledger.claim_stuck_tokens(caller, token))?;
    info!("{}", recovery);
    Ok(recovery)
}

/// Runs the deposit-foreign command: records another token (or native coin,
/// for the zero address) arriving at the ledger's address. `amount` is in base units.
pub async fn deposit_foreign(
    store: &LedgerStore,
    token: &Address,
    amount: u128,
) -> Result<(), CliError> {
    store.update(|ledger| ledger.deposit_foreign(token, amount))?;
    info!("Recorded {} of {} held by the ledger", amount, address_to_hex(token));
    Ok(())
}

/// Runs the transfer-ownership command.
pub async fn transfer_ownership(
    store: &LedgerStore,
    caller: &Address,
    new_owner: &Address,
) -> Result<(), CliError> {
    store.update(|ledger| ledger.transfer_ownership(caller, new_owner))
}

/// Runs the renounce-ownership command.
pub async fn renounce_ownership(store: &LedgerStore, caller: &Address) -> Result<(), CliError> {
    store.update(|ledger| ledger.renounce_ownership(caller))
}
