//! End-to-end ledger scenarios: deployment, trading and fees, transfers, emergency recovery.

use rand::Rng;
use spx_core::{Address, Balance, LedgerError, LedgerEvent, TokenLedger};

const UNIT: Balance = 100_000_000;

/// Accounts used throughout a scenario.
struct Accounts {
    owner: Address,
    addr1: Address,
    addr2: Address,
    fee_receiver: Address,
}

fn random_address() -> Address {
    let mut rng = rand::thread_rng();
    let mut addr = [0u8; 32];
    rng.fill(&mut addr);
    addr
}

fn deploy() -> (TokenLedger, Accounts) {
    let accounts = Accounts {
        owner: random_address(),
        addr1: random_address(),
        addr2: random_address(),
        fee_receiver: random_address(),
    };
    let ledger = TokenLedger::new(accounts.owner).unwrap();
    (ledger, accounts)
}

/// Tests the deployed state.
#[test]
fn test_deployment() {
    let (ledger, accounts) = deploy();

    assert_eq!(ledger.owner(), accounts.owner);
    assert_eq!(ledger.name(), "Silver Phoenix");
    assert_eq!(ledger.symbol(), "SPX");
    assert_eq!(ledger.decimals(), 8);
    assert_eq!(ledger.balance_of(&accounts.owner), ledger.total_supply());
    assert_eq!(ledger.balance_of(&accounts.addr1), 0);
    assert_eq!(ledger.balance_of(&ledger.contract_address()), 0);

    // Genesis is recorded as a mint to the owner
    assert!(ledger.events().contains(&LedgerEvent::Transfer {
        from: spx_core::ZERO_ADDRESS,
        to: accounts.owner,
        amount: ledger.total_supply(),
    }));
}

/// Tests enabling trading followed by a transfer, then a fee exemption.
#[test]
fn test_trading_and_fees() {
    let (mut ledger, accounts) = deploy();

    ledger.enable_trading(&accounts.owner).unwrap();
    let amount = 1000 * UNIT;
    ledger.transfer(&accounts.owner, &accounts.addr1, amount).unwrap();
    assert!(ledger.balance_of(&accounts.addr1) > 0);

    ledger
        .exclude_from_fees(&accounts.owner, &accounts.addr1, true)
        .unwrap();
    assert!(ledger.is_excluded_from_fees(&accounts.addr1));
}

/// Tests that a fee-bearing transfer delivers 96% and keeps 4% as fees.
#[test]
fn test_transfer_between_accounts_charges_fee() {
    let (mut ledger, accounts) = deploy();
    ledger.enable_trading(&accounts.owner).unwrap();

    // Make the owner an ordinary fee payer
    ledger
        .exclude_from_fees(&accounts.owner, &accounts.owner, false)
        .unwrap();

    let owner_before = ledger.balance_of(&accounts.owner);
    let amount = 1000 * UNIT;
    ledger.transfer(&accounts.owner, &accounts.addr1, amount).unwrap();

    assert_eq!(ledger.balance_of(&accounts.addr1), amount * 96 / 100);
    assert_eq!(ledger.balance_of(&accounts.owner), owner_before - amount);
    assert_eq!(
        ledger.balance_of(&ledger.contract_address()),
        amount * 4 / 100
    );
}

/// Tests that an exempt party moves the full amount.
#[test]
fn test_exempt_transfer_moves_full_amount() {
    let (mut ledger, accounts) = deploy();
    ledger.enable_trading(&accounts.owner).unwrap();

    let amount = 1000 * UNIT;
    ledger.transfer(&accounts.owner, &accounts.addr1, amount).unwrap();
    assert_eq!(ledger.balance_of(&accounts.addr1), amount);

    // addr1 -> addr2 pays the fee until addr2 is exempt
    ledger
        .exclude_from_fees(&accounts.owner, &accounts.addr2, true)
        .unwrap();
    ledger.transfer(&accounts.addr1, &accounts.addr2, amount).unwrap();
    assert_eq!(ledger.balance_of(&accounts.addr2), amount);
    assert_eq!(ledger.balance_of(&ledger.contract_address()), 0);
}

/// Tests that transferring more than the balance fails and changes nothing.
#[test]
fn test_transfer_more_than_balance() {
    let (mut ledger, accounts) = deploy();
    ledger.enable_trading(&accounts.owner).unwrap();
    ledger
        .transfer(&accounts.owner, &accounts.addr1, 1000 * UNIT)
        .unwrap();

    let initial = ledger.balance_of(&accounts.addr1);
    let excess = initial + UNIT;
    let before = ledger.state_digest().unwrap();

    let result = ledger.transfer(&accounts.addr1, &accounts.addr2, excess);
    assert_eq!(
        result,
        Err(LedgerError::InsufficientBalance {
            required: excess,
            available: initial,
        })
    );
    assert_eq!(ledger.state_digest().unwrap(), before);
}

/// Tests that ordinary holders cannot trade before launch.
#[test]
fn test_transfer_before_trading_enabled() {
    let (mut ledger, accounts) = deploy();
    ledger
        .transfer(&accounts.owner, &accounts.addr1, 1000 * UNIT)
        .unwrap();

    let result = ledger.transfer(&accounts.addr1, &accounts.addr2, UNIT);
    assert_eq!(result, Err(LedgerError::TradingDisabled));

    ledger.enable_trading(&accounts.owner).unwrap();
    ledger.transfer(&accounts.addr1, &accounts.addr2, UNIT).unwrap();
    assert_eq!(ledger.balance_of(&accounts.addr2), UNIT * 96 / 100);
}

/// Tests the owner claiming tokens sent to the ledger's own address.
#[test]
fn test_claim_stuck_tokens() {
    let (mut ledger, accounts) = deploy();
    let contract = ledger.contract_address();

    let amount = 1000 * UNIT;
    ledger.transfer(&accounts.owner, &contract, amount).unwrap();
    assert_eq!(ledger.balance_of(&contract), amount);

    let recovery = ledger.claim_stuck_tokens(&accounts.owner, &contract).unwrap();
    assert_eq!(recovery.amount, amount);
    assert_eq!(ledger.balance_of(&contract), 0);
    assert_eq!(ledger.balance_of(&accounts.owner), ledger.total_supply());
}

/// Tests that accumulated fees reach the configured fee receiver.
#[test]
fn test_fees_reach_fee_receiver() {
    let (mut ledger, accounts) = deploy();
    ledger.enable_trading(&accounts.owner).unwrap();
    ledger
        .change_fee_receiver(&accounts.owner, &accounts.fee_receiver)
        .unwrap();
    ledger
        .set_swap_token_amount(&accounts.owner, 100 * UNIT, true)
        .unwrap();
    ledger
        .transfer(&accounts.owner, &accounts.addr1, 10_000 * UNIT)
        .unwrap();

    // 40 SPX of fees each round; the third round crosses 100
    for _ in 0..3 {
        ledger
            .transfer(&accounts.addr1, &accounts.addr2, 1000 * UNIT)
            .unwrap();
    }

    assert_eq!(ledger.balance_of(&accounts.fee_receiver), 120 * UNIT);
    assert_eq!(ledger.balance_of(&ledger.contract_address()), 0);
    assert_eq!(ledger.balance_of(&accounts.addr2), 3 * 960 * UNIT);
}

/// Tests that only the owner reaches privileged operations.
#[test]
fn test_only_owner() {
    let (mut ledger, accounts) = deploy();
    let contract = ledger.contract_address();
    let before = ledger.state_digest().unwrap();

    let attempts: Vec<Result<(), LedgerError>> = vec![
        ledger.enable_trading(&accounts.addr1),
        ledger.exclude_from_fees(&accounts.addr1, &accounts.addr1, true),
        ledger.change_fee_receiver(&accounts.addr1, &accounts.addr1),
        ledger.set_swap_token_amount(&accounts.addr1, 0, false),
        ledger
            .claim_stuck_tokens(&accounts.addr1, &contract)
            .map(|_| ()),
    ];

    for attempt in attempts {
        assert!(matches!(attempt, Err(LedgerError::Unauthorized(_))));
    }
    assert_eq!(ledger.state_digest().unwrap(), before);
}
