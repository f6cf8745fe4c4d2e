//! The ledger's data model and its snapshot encoding.

use crate::config::GenesisConfig;
use crate::errors::LedgerError;
use crate::types::{
    address_to_hex, derive_contract_address, is_zero, Address, Balance, LedgerEvent,
    TokenMetadata, ZERO_ADDRESS,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::info;

/// Everything the ledger owns.
///
/// Ordered maps keep the bincode encoding, and so the state digest, independent
/// of insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub(crate) metadata: TokenMetadata,
    /// Address of the ledger contract itself; holds accumulated fees
    pub(crate) contract: Address,
    pub(crate) owner: Address,
    pub(crate) total_supply: Balance,
    pub(crate) fee_percent: u8,
    pub(crate) balances: BTreeMap<Address, Balance>,
    /// (owner, spender) -> remaining allowance
    pub(crate) allowances: BTreeMap<(Address, Address), Balance>,
    pub(crate) excluded_from_fees: BTreeSet<Address>,
    pub(crate) trading_enabled: bool,
    pub(crate) fee_receiver: Address,
    pub(crate) swap_tokens_at_amount: Balance,
    pub(crate) swap_enabled: bool,
    /// Other tokens (zero address: native coin) held by the contract
    pub(crate) foreign_holdings: BTreeMap<Address, Balance>,
    pub(crate) events: Vec<LedgerEvent>,
    /// Set while the swap hook runs
    #[serde(skip)]
    pub(crate) swapping: bool,
}

impl LedgerState {
    /// Builds the genesis state: the whole supply belongs to `deployer`.
    pub fn genesis(
        config: &GenesisConfig,
        deployer: Address,
        deploy_nonce: u64,
    ) -> Result<Self, LedgerError> {
        config.validate()?;

        if is_zero(&deployer) {
            return Err(LedgerError::InvalidAddress(
                "deployer cannot be the zero address".to_string(),
            ));
        }

        let fee_receiver = match config.fee_receiver_address()? {
            Some(addr) if is_zero(&addr) => {
                return Err(LedgerError::InvalidAddress(
                    "fee receiver cannot be the zero address".to_string(),
                ))
            }
            Some(addr) => addr,
            None => deployer,
        };

        let total_supply = config.total_supply()?;
        let contract = derive_contract_address(&deployer, deploy_nonce);

        let mut balances = BTreeMap::new();
        if total_supply > 0 {
            balances.insert(deployer, total_supply);
        }

        let mut excluded_from_fees = BTreeSet::new();
        excluded_from_fees.insert(deployer);
        excluded_from_fees.insert(contract);

        let events = vec![
            LedgerEvent::OwnershipTransferred {
                previous_owner: ZERO_ADDRESS,
                new_owner: deployer,
            },
            LedgerEvent::Transfer {
                from: ZERO_ADDRESS,
                to: deployer,
                amount: total_supply,
            },
        ];

        info!(
            "Genesis for {} at {}: {} minted to {}",
            config.symbol,
            address_to_hex(&contract),
            total_supply,
            address_to_hex(&deployer)
        );

        Ok(Self {
            metadata: config.metadata(),
            contract,
            owner: deployer,
            total_supply,
            fee_percent: config.fee_percent,
            balances,
            allowances: BTreeMap::new(),
            excluded_from_fees,
            trading_enabled: false,
            fee_receiver,
            swap_tokens_at_amount: config.swap_threshold()?,
            swap_enabled: config.swap_enabled,
            foreign_holdings: BTreeMap::new(),
            events,
            swapping: false,
        })
    }

    /// Encodes the state with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a state previously produced by [`LedgerState::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        let state: LedgerState = bincode::deserialize(bytes)?;
        state.check_supply()?;
        Ok(state)
    }

    /// SHA-256 of the encoded state.
    pub fn digest(&self) -> Result<[u8; 32], LedgerError> {
        let encoded = self.encode()?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);

        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        Ok(digest)
    }

    /// Sum of every account balance.
    pub fn sum_of_balances(&self) -> Result<Balance, LedgerError> {
        self.balances.values().try_fold(0u128, |acc, bal| {
            acc.checked_add(*bal)
                .ok_or_else(|| LedgerError::Overflow("sum of balances".to_string()))
        })
    }

    /// Verifies that balances add up to the total supply.
    pub fn check_supply(&self) -> Result<(), LedgerError> {
        let sum = self.sum_of_balances()?;
        if sum != self.total_supply {
            return Err(LedgerError::CorruptState(format!(
                "balances sum to {} but total supply is {}",
                sum, self.total_supply
            )));
        }
        Ok(())
    }

    pub(crate) fn balance_of(&self, addr: &Address) -> Balance {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    pub(crate) fn is_excluded(&self, addr: &Address) -> bool {
        self.excluded_from_fees.contains(addr)
    }

    pub(crate) fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, amount: Balance) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Removes `amount` from `addr`. Zero balances are dropped from the table.
    pub(crate) fn debit(&mut self, addr: &Address, amount: Balance) -> Result<(), LedgerError> {
        let available = self.balance_of(addr);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                required: amount,
                available,
            })?;

        if remaining == 0 {
            self.balances.remove(addr);
        } else {
            self.balances.insert(*addr, remaining);
        }
        Ok(())
    }

    pub(crate) fn credit(&mut self, addr: &Address, amount: Balance) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.balance_of(addr);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("balance of {}", address_to_hex(addr))))?;
        self.balances.insert(*addr, updated);
        Ok(())
    }

    /// Moves `amount` from `from` to `to` and records the transfer.
    pub(crate) fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        self.events.push(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}

impl fmt::Display for LedgerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LedgerState {{ token: {}, owner: {}, supply: {}, holders: {}, trading: {} }}",
            self.metadata.symbol,
            address_to_hex(&self.owner),
            self.total_supply,
            self.balances.len(),
            self.trading_enabled
        )
    }
}
