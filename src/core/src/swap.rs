//! Hook invoked when accumulated fees reach the swap threshold.

use crate::errors::LedgerError;
use crate::ledger::TokenLedger;
use crate::types::{address_to_hex, Address, Balance};
use tracing::info;

/// External side of the automatic fee swap.
///
/// Called after the ledger has already credited `amount` to `fee_receiver`.
/// The ledger is passed back so an implementation can read it, but any
/// transfer attempted through it while the hook runs fails with
/// [`LedgerError::Reentrancy`]. Returning an error rolls back the transfer
/// that triggered the swap.
pub trait SwapExecutor: Send {
    /// Performs the payout side effect.
    fn swap_and_send(
        &mut self,
        ledger: &mut TokenLedger,
        fee_receiver: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError>;
}

/// Default executor: the ledger credit is the whole payout, so this only logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendToReceiver;

impl SwapExecutor for SendToReceiver {
    fn swap_and_send(
        &mut self,
        ledger: &mut TokenLedger,
        fee_receiver: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        info!(
            "Sent {} {} of accumulated fees to {}",
            amount,
            ledger.symbol(),
            address_to_hex(fee_receiver)
        );
        Ok(())
    }
}
