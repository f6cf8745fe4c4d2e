//! Deployment and operator CLI for the Silver Phoenix token ledger.

pub mod commands;
pub mod config;
pub mod errors;
pub mod store;
pub mod units;

// Re-export commonly used types and functions
pub use commands::{admin, deploy, query, transfer};
pub use config::CliConfig;
pub use errors::CliError;
pub use store::LedgerStore;
