//! Transfer fee arithmetic.

use crate::types::Balance;

/// How a transferred amount is divided between recipient and fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    /// Credited to the recipient
    pub net: Balance,
    /// Credited to the ledger's fee balance
    pub fee: Balance,
}

impl FeeSplit {
    /// A split that moves the whole amount.
    pub fn exempt(amount: Balance) -> Self {
        Self { net: amount, fee: 0 }
    }
}

/// Splits `amount` for a `fee_percent` fee, rounding the fee down.
///
/// `fee_percent` must be at most 100. Computed as `q * p + r * p / 100` with
/// `amount = 100q + r` so it cannot overflow for any `amount`.
pub fn split(amount: Balance, fee_percent: u8) -> FeeSplit {
    let pct = fee_percent.min(100) as Balance;
    let fee = (amount / 100) * pct + (amount % 100) * pct / 100;
    FeeSplit {
        net: amount - fee,
        fee,
    }
}
