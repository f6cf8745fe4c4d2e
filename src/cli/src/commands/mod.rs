//! Commands for the CLI.

pub mod admin;
pub mod deploy;
pub mod query;
pub mod transfer;
