//! Error types for the ledger crate.

use crate::types::Balance;
use thiserror::Error;

/// Errors that can occur while operating on the ledger.
///
/// Any operation returning one of these has left the ledger state exactly as
/// it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Error when a privileged operation is called by someone other than the owner.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Error when a non-exempt transfer is attempted before trading is enabled.
    #[error("Trading is not enabled yet")]
    TradingDisabled,

    /// Error when trying to move more tokens than an account holds.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// The required balance
        required: Balance,
        /// The available balance
        available: Balance,
    },

    /// Error when a spender tries to use more than it was approved for.
    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        /// The required allowance
        required: Balance,
        /// The available allowance
        available: Balance,
    },

    /// Error when the zero address is supplied where a real account is required.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when a transfer is re-entered while the swap hook is running.
    #[error("Reentrant call rejected while a swap is in progress")]
    Reentrancy,

    /// Error when an amount computation overflows.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Error when the swap hook reports a failure.
    #[error("Swap failed: {0}")]
    SwapFailed(String),

    /// Error when serialization or deserialization fails.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error when a decoded state breaks a ledger invariant.
    #[error("Corrupt ledger state: {0}")]
    CorruptState(String),

    /// Error when a genesis configuration is invalid or cannot be read.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<bincode::Error> for LedgerError {
    fn from(error: bincode::Error) -> Self {
        LedgerError::SerializationError(error.to_string())
    }
}
