//! Conversion between decimal token amounts and base units.

use crate::errors::CliError;
use spx_core::types::{address_from_hex, Address, Balance};

/// Parses a decimal amount such as `1000` or `12.5` into base units.
pub fn parse_units(input: &str, decimals: u8) -> Result<Balance, CliError> {
    let input = input.trim();
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(CliError::InvalidAmount(format!("'{}' is empty", input)));
    }
    if fraction.len() > decimals as usize {
        return Err(CliError::InvalidAmount(format!(
            "'{}' has more than {} decimal places",
            input, decimals
        )));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(CliError::InvalidAmount(format!("'{}' is not a number", input)));
    }

    let overflow = || CliError::InvalidAmount(format!("'{}' is too large", input));
    let unit = 10u128.pow(decimals as u32);

    let whole: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction: Balance = if padded.is_empty() {
        0
    } else {
        padded.parse().map_err(|_| overflow())?
    };

    whole
        .checked_mul(unit)
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(overflow)
}

/// Formats base units as a decimal amount, trimming trailing zeros.
pub fn format_units(amount: Balance, decimals: u8) -> String {
    let unit = 10u128.pow(decimals as u32);
    let whole = amount / unit;
    let fraction = amount % unit;

    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Parses a hex address argument.
pub fn parse_address(input: &str) -> Result<Address, CliError> {
    address_from_hex(input).map_err(|e| CliError::InvalidAddress(e.to_string()))
}
