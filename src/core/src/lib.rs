//! Core ledger for the Silver Phoenix (SPX) token.
//!
//! This crate provides a fee-bearing fungible token ledger: a fixed supply minted
//! to the deployer at genesis, an owner-controlled trading gate, a percentage
//! transfer fee with an exemption list, fee accumulation with a threshold
//! triggered payout, and emergency recovery of tokens held by the ledger.

pub mod access;
pub mod config;
pub mod errors;
pub mod fees;
pub mod ledger;
pub mod state;
pub mod swap;
pub mod types;

// Re-export commonly used types
pub use config::GenesisConfig;
pub use errors::LedgerError;
pub use ledger::TokenLedger;
pub use state::LedgerState;
pub use swap::{SendToReceiver, SwapExecutor};
pub use types::{Address, Balance, LedgerEvent, Recovery, ZERO_ADDRESS};
