//! Tests for the CLI commands against a state file.

use serial_test::serial;
use spx_cli::commands::{admin, deploy, query, transfer};
use spx_cli::config::{CliConfig, DATA_DIR_ENV};
use spx_cli::{CliError, LedgerStore};
use spx_core::{GenesisConfig, LedgerError};
use tempfile::tempdir;

const OWNER: [u8; 32] = [0x11; 32];
const ALICE: [u8; 32] = [0x22; 32];
const BOB: [u8; 32] = [0x33; 32];

/// Tests deploying a ledger and refusing to overwrite it.
#[tokio::test]
async fn test_deploy() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("ledger.bin"));
    let genesis = GenesisConfig::default();

    let deployment = deploy::run(&store, &OWNER, &genesis, 0, false).await.unwrap();
    assert_eq!(deployment.deployer, OWNER);
    assert_eq!(deployment.total_supply, genesis.total_supply().unwrap());

    let info = query::info(&store).await.unwrap();
    assert_eq!(info.name, "Silver Phoenix");
    assert_eq!(info.symbol, "SPX");
    assert_eq!(info.decimals, 8);
    assert_eq!(info.owner, OWNER);
    assert_eq!(info.contract, deployment.contract);
    assert!(!info.trading_enabled);

    let result = deploy::run(&store, &OWNER, &genesis, 0, false).await;
    assert!(matches!(result, Err(CliError::StateExists(_))));

    // A different nonce with --force gives a new contract address
    let redeployed = deploy::run(&store, &OWNER, &genesis, 1, true).await.unwrap();
    assert_ne!(redeployed.contract, deployment.contract);
}

/// Tests a full session: launch, fee-bearing transfer, allowance and recovery.
#[tokio::test]
async fn test_session() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("ledger.bin"));
    let deployment = deploy::run(&store, &OWNER, &GenesisConfig::default(), 0, false)
        .await
        .unwrap();

    transfer::transfer(&store, &OWNER, &ALICE, "1000").await.unwrap();
    assert_eq!(query::balance(&store, &ALICE).await.unwrap(), "1000 SPX");

    // Closed market
    let result = transfer::transfer(&store, &ALICE, &BOB, "100").await;
    assert!(matches!(
        result,
        Err(CliError::LedgerError(LedgerError::TradingDisabled))
    ));

    admin::enable_trading(&store, &OWNER).await.unwrap();
    transfer::transfer(&store, &ALICE, &BOB, "100").await.unwrap();
    assert_eq!(query::balance(&store, &BOB).await.unwrap(), "96 SPX");
    assert_eq!(
        query::balance(&store, &deployment.contract).await.unwrap(),
        "4 SPX"
    );

    transfer::approve(&store, &ALICE, &BOB, "10.5").await.unwrap();
    assert_eq!(
        query::allowance(&store, &ALICE, &BOB).await.unwrap(),
        "10.5 SPX"
    );
    transfer::transfer_from(&store, &BOB, &ALICE, &BOB, "10.5")
        .await
        .unwrap();
    assert_eq!(query::allowance(&store, &ALICE, &BOB).await.unwrap(), "0 SPX");

    let recovery = admin::claim_stuck_tokens(&store, &OWNER, &deployment.contract)
        .await
        .unwrap();
    assert_eq!(recovery.amount, 4 * 100_000_000 + 42_000_000);
    assert_eq!(
        query::balance(&store, &deployment.contract).await.unwrap(),
        "0 SPX"
    );
}

/// Tests owner-only commands and their persistence.
#[tokio::test]
async fn test_admin_commands() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("ledger.bin"));
    deploy::run(&store, &OWNER, &GenesisConfig::default(), 0, false)
        .await
        .unwrap();

    admin::exclude_from_fees(&store, &OWNER, &ALICE, true)
        .await
        .unwrap();
    assert!(query::is_excluded(&store, &ALICE).await.unwrap());

    let result = admin::exclude_from_fees(&store, &ALICE, &BOB, true).await;
    assert!(matches!(
        result,
        Err(CliError::LedgerError(LedgerError::Unauthorized(_)))
    ));
    assert!(!query::is_excluded(&store, &BOB).await.unwrap());

    admin::change_fee_receiver(&store, &OWNER, &BOB).await.unwrap();
    let raw = admin::set_swap_token_amount(&store, &OWNER, "250", false)
        .await
        .unwrap();
    assert_eq!(raw, 250 * 100_000_000);

    let info = query::info(&store).await.unwrap();
    assert_eq!(info.fee_receiver, BOB);
    assert_eq!(info.swap_tokens_at_amount, 250 * 100_000_000);
    assert!(!info.swap_enabled);

    admin::deposit_foreign(&store, &[0x44; 32], 900).await.unwrap();
    let recovery = admin::claim_stuck_tokens(&store, &OWNER, &[0x44; 32])
        .await
        .unwrap();
    assert_eq!(recovery.amount, 900);

    admin::transfer_ownership(&store, &OWNER, &ALICE).await.unwrap();
    assert_eq!(query::info(&store).await.unwrap().owner, ALICE);
    admin::renounce_ownership(&store, &ALICE).await.unwrap();
    assert!(matches!(
        admin::enable_trading(&store, &ALICE).await,
        Err(CliError::LedgerError(LedgerError::Unauthorized(_)))
    ));
}

/// Tests that malformed amounts are rejected before touching the ledger.
#[tokio::test]
async fn test_invalid_amount() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("ledger.bin"));
    deploy::run(&store, &OWNER, &GenesisConfig::default(), 0, false)
        .await
        .unwrap();

    let result = transfer::transfer(&store, &OWNER, &ALICE, "1.123456789").await;
    assert!(matches!(result, Err(CliError::InvalidAmount(_))));
    assert_eq!(query::balance(&store, &ALICE).await.unwrap(), "0 SPX");
}

/// Tests that the event log survives between commands and can be drained.
#[tokio::test]
async fn test_events() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("ledger.bin"));
    deploy::run(&store, &OWNER, &GenesisConfig::default(), 0, false)
        .await
        .unwrap();
    admin::enable_trading(&store, &OWNER).await.unwrap();

    let size_before = std::fs::metadata(store.path()).unwrap().len();

    let events = query::events(&store, true).await.unwrap();
    assert!(events.contains(&spx_core::LedgerEvent::TradingEnabled));
    assert!(query::events(&store, false).await.unwrap().is_empty());

    // Draining shrinks the saved state
    let size_after = std::fs::metadata(store.path()).unwrap().len();
    assert!(size_after < size_before);
}

/// Tests that the default state file follows the data directory variable.
#[tokio::test]
#[serial]
async fn test_default_state_location() {
    let dir = tempdir().unwrap();
    std::env::set_var(DATA_DIR_ENV, dir.path());

    let config = CliConfig::default();
    let store = LedgerStore::new(&config.state_file);
    deploy::run(&store, &OWNER, &GenesisConfig::default(), 0, false)
        .await
        .unwrap();
    assert!(dir.path().join("ledger.bin").exists());

    std::env::remove_var(DATA_DIR_ENV);
}
