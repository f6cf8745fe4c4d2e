//! Integration tests for the Silver Phoenix token ledger.

pub mod cli_tests;
pub mod invariant_tests;
pub mod ledger_tests;
