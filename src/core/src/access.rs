//! Owner authorization guard shared by every privileged operation.

use crate::errors::LedgerError;
use crate::types::{address_to_hex, is_zero, Address};
use tracing::warn;

/// Fails with [`LedgerError::Unauthorized`] unless `caller` is `owner`.
///
/// A renounced ledger (zero owner) rejects everyone.
pub fn ensure_owner(owner: &Address, caller: &Address, operation: &str) -> Result<(), LedgerError> {
    if is_zero(owner) || owner != caller {
        warn!(
            "Rejected {} from {}: caller is not the owner",
            operation,
            address_to_hex(caller)
        );
        return Err(LedgerError::Unauthorized(format!(
            "{} is restricted to the owner, called by {}",
            operation,
            address_to_hex(caller)
        )));
    }
    Ok(())
}

/// Fails with [`LedgerError::InvalidAddress`] if `addr` is the zero address.
pub fn ensure_non_zero(addr: &Address, what: &str) -> Result<(), LedgerError> {
    if is_zero(addr) {
        return Err(LedgerError::InvalidAddress(format!(
            "{} cannot be the zero address",
            what
        )));
    }
    Ok(())
}
