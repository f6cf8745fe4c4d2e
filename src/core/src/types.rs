//! Core types for the Silver Phoenix token ledger.

use crate::errors::LedgerError;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte account address.
pub type Address = [u8; 32];

/// Token amount in base units (10^-decimals of a whole token).
pub type Balance = u128;

/// The null address. Holds nothing and cannot receive tokens.
pub const ZERO_ADDRESS: Address = [0u8; 32];

const CONTRACT_ADDRESS_DOMAIN: &[u8] = b"spx-contract";

/// Returns true if `addr` is the null address.
pub fn is_zero(addr: &Address) -> bool {
    addr == &ZERO_ADDRESS
}

/// Encodes an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}

/// Parses a hex address, with or without a `0x` prefix.
pub fn address_from_hex(s: &str) -> Result<Address, LedgerError> {
    let raw = hex::decode(s.trim().trim_start_matches("0x"))
        .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", s, e)))?;

    if raw.len() != 32 {
        return Err(LedgerError::InvalidAddress(format!(
            "{}: expected 32 bytes, got {}",
            s,
            raw.len()
        )));
    }

    let mut addr = [0u8; 32];
    addr.copy_from_slice(&raw);
    Ok(addr)
}

/// Derives the address a ledger deployed by `deployer` at `deploy_nonce` lives at.
pub fn derive_contract_address(deployer: &Address, deploy_nonce: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(CONTRACT_ADDRESS_DOMAIN);
    hasher.update(deployer);

    let mut nonce_bytes = [0u8; 8];
    LittleEndian::write_u64(&mut nonce_bytes, deploy_nonce);
    hasher.update(nonce_bytes);

    let result = hasher.finalize();
    let mut addr = [0u8; 32];
    addr.copy_from_slice(&result);
    addr
}

/// Static token metadata fixed at genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human readable token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Number of decimal places in one whole token
    pub decimals: u8,
}

/// A record of a committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Tokens moved between two accounts. Mint-at-genesis uses the zero address as `from`.
    Transfer {
        /// The debited account
        from: Address,
        /// The credited account
        to: Address,
        /// The amount credited to `to`
        amount: Balance,
    },

    /// An allowance was set.
    Approval {
        /// The account whose tokens may be spent
        owner: Address,
        /// The account allowed to spend them
        spender: Address,
        /// The new allowance
        amount: Balance,
    },

    /// Trading was opened to everyone.
    TradingEnabled,

    /// An account's fee exemption changed.
    ExcludeFromFees {
        /// The affected account
        account: Address,
        /// Whether the account is now exempt
        excluded: bool,
    },

    /// The fee receiver was replaced.
    FeeReceiverChanged {
        /// The new receiver
        fee_receiver: Address,
    },

    /// The swap threshold or its enable flag changed.
    SwapTokensAtAmountUpdated {
        /// The new threshold
        amount: Balance,
        /// Whether the automatic swap is enabled
        enabled: bool,
    },

    /// The accumulated fee balance was paid out to the fee receiver.
    SwapAndSendFee {
        /// The amount paid out
        amount: Balance,
        /// The receiver that was paid
        fee_receiver: Address,
    },

    /// Ownership moved to a new account.
    OwnershipTransferred {
        /// The previous owner
        previous_owner: Address,
        /// The new owner (zero when renounced)
        new_owner: Address,
    },

    /// Tokens held by the ledger itself were recovered by the owner.
    StuckTokensClaimed {
        /// The token that was recovered
        token: Address,
        /// The amount recovered
        amount: Balance,
    },
}

/// Result of an emergency recovery of tokens held by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recovery {
    /// The token that was recovered (zero address for the native coin)
    pub token: Address,
    /// The recipient of the recovered amount
    pub to: Address,
    /// The recovered amount
    pub amount: Balance,
}

impl fmt::Display for TokenMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} decimals)", self.name, self.symbol, self.decimals)
    }
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recovery {{ token: {}, to: {}, amount: {} }}",
            address_to_hex(&self.token),
            address_to_hex(&self.to),
            self.amount
        )
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Transfer { from, to, amount } => write!(
                f,
                "Transfer {{ from: {}, to: {}, amount: {} }}",
                address_to_hex(from),
                address_to_hex(to),
                amount
            ),
            LedgerEvent::Approval { owner, spender, amount } => write!(
                f,
                "Approval {{ owner: {}, spender: {}, amount: {} }}",
                address_to_hex(owner),
                address_to_hex(spender),
                amount
            ),
            LedgerEvent::TradingEnabled => write!(f, "TradingEnabled"),
            LedgerEvent::ExcludeFromFees { account, excluded } => write!(
                f,
                "ExcludeFromFees {{ account: {}, excluded: {} }}",
                address_to_hex(account),
                excluded
            ),
            LedgerEvent::FeeReceiverChanged { fee_receiver } => write!(
                f,
                "FeeReceiverChanged {{ fee_receiver: {} }}",
                address_to_hex(fee_receiver)
            ),
            LedgerEvent::SwapTokensAtAmountUpdated { amount, enabled } => write!(
                f,
                "SwapTokensAtAmountUpdated {{ amount: {}, enabled: {} }}",
                amount, enabled
            ),
            LedgerEvent::SwapAndSendFee { amount, fee_receiver } => write!(
                f,
                "SwapAndSendFee {{ amount: {}, fee_receiver: {} }}",
                amount,
                address_to_hex(fee_receiver)
            ),
            LedgerEvent::OwnershipTransferred { previous_owner, new_owner } => write!(
                f,
                "OwnershipTransferred {{ previous_owner: {}, new_owner: {} }}",
                address_to_hex(previous_owner),
                address_to_hex(new_owner)
            ),
            LedgerEvent::StuckTokensClaimed { token, amount } => write!(
                f,
                "StuckTokensClaimed {{ token: {}, amount: {} }}",
                address_to_hex(token),
                amount
            ),
        }
    }
}
