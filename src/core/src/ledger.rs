//! The Silver Phoenix token ledger: balances, fees, trading gate and owner controls.

use crate::access::{ensure_non_zero, ensure_owner};
use crate::config::GenesisConfig;
use crate::errors::LedgerError;
use crate::fees::{self, FeeSplit};
use crate::state::LedgerState;
use crate::swap::{SendToReceiver, SwapExecutor};
use crate::types::{address_to_hex, Address, Balance, LedgerEvent, Recovery, ZERO_ADDRESS};
use std::fmt;
use tracing::{debug, info, warn};

/// A single token ledger.
///
/// Every operation either commits all of its changes or returns an error and
/// leaves the state untouched. Callers identify themselves with an explicit
/// `caller` address; privileged operations check it against the owner first.
pub struct TokenLedger {
    state: LedgerState,
    /// Taken out while the hook runs
    executor: Option<Box<dyn SwapExecutor>>,
}

impl TokenLedger {
    /// Deploys a ledger with the default Silver Phoenix configuration.
    pub fn new(deployer: Address) -> Result<Self, LedgerError> {
        Self::with_config(&GenesisConfig::default(), deployer, 0)
    }

    /// Deploys a ledger from `config`. `deploy_nonce` selects the contract address.
    pub fn with_config(
        config: &GenesisConfig,
        deployer: Address,
        deploy_nonce: u64,
    ) -> Result<Self, LedgerError> {
        let state = LedgerState::genesis(config, deployer, deploy_nonce)?;
        Ok(Self::from_state(state))
    }

    /// Wraps an existing state with the default swap executor.
    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state,
            executor: Some(Box::new(SendToReceiver)),
        }
    }

    /// Replaces the hook called when accumulated fees are swapped out.
    pub fn set_swap_executor(&mut self, executor: Box<dyn SwapExecutor>) {
        self.executor = Some(executor);
    }

    /// Read access to the raw state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Consumes the ledger, returning its state.
    pub fn into_state(self) -> LedgerState {
        self.state
    }

    /// Encodes the current state.
    pub fn snapshot(&self) -> Result<Vec<u8>, LedgerError> {
        self.state.encode()
    }

    /// Rebuilds a ledger from a snapshot.
    pub fn restore(bytes: &[u8]) -> Result<Self, LedgerError> {
        Ok(Self::from_state(LedgerState::decode(bytes)?))
    }

    /// SHA-256 digest of the current state.
    pub fn state_digest(&self) -> Result<[u8; 32], LedgerError> {
        self.state.digest()
    }

    pub fn owner(&self) -> Address {
        self.state.owner
    }

    pub fn name(&self) -> &str {
        &self.state.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.state.metadata.decimals
    }

    pub fn total_supply(&self) -> Balance {
        self.state.total_supply
    }

    pub fn balance_of(&self, addr: &Address) -> Balance {
        self.state.balance_of(addr)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.state.allowance(owner, spender)
    }

    pub fn is_excluded_from_fees(&self, addr: &Address) -> bool {
        self.state.is_excluded(addr)
    }

    pub fn trading_enabled(&self) -> bool {
        self.state.trading_enabled
    }

    pub fn fee_receiver(&self) -> Address {
        self.state.fee_receiver
    }

    pub fn fee_percent(&self) -> u8 {
        self.state.fee_percent
    }

    pub fn swap_tokens_at_amount(&self) -> Balance {
        self.state.swap_tokens_at_amount
    }

    pub fn swap_enabled(&self) -> bool {
        self.state.swap_enabled
    }

    /// The ledger's own address. Fees accumulate here.
    pub fn contract_address(&self) -> Address {
        self.state.contract
    }

    /// Amount of a foreign token (or, for the zero address, native coin) held by the ledger.
    pub fn foreign_balance(&self, token: &Address) -> Balance {
        self.state.foreign_holdings.get(token).copied().unwrap_or(0)
    }

    /// Events recorded since genesis or the last drain.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.state.events
    }

    /// Removes and returns the recorded events.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Opens transfers to everyone. One way; repeating it is a no-op.
    pub fn enable_trading(&mut self, caller: &Address) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "enable_trading")?;

        if self.state.trading_enabled {
            debug!("Trading already enabled");
            return Ok(());
        }

        self.state.trading_enabled = true;
        self.state.events.push(LedgerEvent::TradingEnabled);
        info!("Trading enabled for {}", self.state.metadata.symbol);
        Ok(())
    }

    /// Moves `amount` from `caller` to `to`, deducting the transfer fee when it applies.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<bool, LedgerError> {
        self.transfer_internal(caller, to, amount)?;
        Ok(true)
    }

    /// Sets the amount `spender` may move out of `caller`'s balance.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<bool, LedgerError> {
        ensure_non_zero(caller, "approver")?;
        ensure_non_zero(spender, "spender")?;

        self.state.set_allowance(*caller, *spender, amount);
        self.state.events.push(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        });
        debug!(
            "{} approved {} for {}",
            address_to_hex(caller),
            address_to_hex(spender),
            amount
        );
        Ok(true)
    }

    /// Raises an existing allowance by `added`.
    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: Balance,
    ) -> Result<bool, LedgerError> {
        let updated = self
            .state
            .allowance(caller, spender)
            .checked_add(added)
            .ok_or_else(|| LedgerError::Overflow("allowance".to_string()))?;
        self.approve(caller, spender, updated)
    }

    /// Lowers an existing allowance by `subtracted`.
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: Balance,
    ) -> Result<bool, LedgerError> {
        let available = self.state.allowance(caller, spender);
        let updated = available
            .checked_sub(subtracted)
            .ok_or(LedgerError::InsufficientAllowance {
                required: subtracted,
                available,
            })?;
        self.approve(caller, spender, updated)
    }

    /// Moves `amount` from `from` to `to` on behalf of `caller`, spending its allowance.
    ///
    /// An allowance of `Balance::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<bool, LedgerError> {
        self.ensure_not_swapping()?;

        let available = self.state.allowance(from, caller);
        if available < amount {
            warn!(
                "Rejected transfer_from by {}: allowance {} < {}",
                address_to_hex(caller),
                available,
                amount
            );
            return Err(LedgerError::InsufficientAllowance {
                required: amount,
                available,
            });
        }

        self.transfer_internal(from, to, amount)?;

        if available != Balance::MAX {
            self.state.set_allowance(*from, *caller, available - amount);
        }
        Ok(true)
    }

    /// Adds or removes `account` from the fee-exemption set.
    pub fn exclude_from_fees(
        &mut self,
        caller: &Address,
        account: &Address,
        excluded: bool,
    ) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "exclude_from_fees")?;

        if excluded {
            self.state.excluded_from_fees.insert(*account);
        } else {
            self.state.excluded_from_fees.remove(account);
        }
        self.state.events.push(LedgerEvent::ExcludeFromFees {
            account: *account,
            excluded,
        });
        info!(
            "Fee exemption for {} set to {}",
            address_to_hex(account),
            excluded
        );
        Ok(())
    }

    /// Replaces the account paid when accumulated fees are swapped out.
    pub fn change_fee_receiver(
        &mut self,
        caller: &Address,
        fee_receiver: &Address,
    ) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "change_fee_receiver")?;
        ensure_non_zero(fee_receiver, "fee receiver")?;

        self.state.fee_receiver = *fee_receiver;
        self.state.events.push(LedgerEvent::FeeReceiverChanged {
            fee_receiver: *fee_receiver,
        });
        info!("Fee receiver changed to {}", address_to_hex(fee_receiver));
        Ok(())
    }

    /// Sets the accumulated-fee threshold (base units) and whether the swap runs at all.
    pub fn set_swap_token_amount(
        &mut self,
        caller: &Address,
        amount: Balance,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "set_swap_token_amount")?;

        self.state.swap_tokens_at_amount = amount;
        self.state.swap_enabled = enabled;
        self.state
            .events
            .push(LedgerEvent::SwapTokensAtAmountUpdated { amount, enabled });
        info!("Swap threshold set to {} (enabled: {})", amount, enabled);
        Ok(())
    }

    /// Sends everything the ledger itself holds of `token` to the owner.
    ///
    /// `token` equal to [`TokenLedger::contract_address`] recovers the ledger's
    /// own tokens; any other address recovers a recorded foreign holding. An
    /// empty holding is recovered as zero rather than rejected.
    pub fn claim_stuck_tokens(
        &mut self,
        caller: &Address,
        token: &Address,
    ) -> Result<Recovery, LedgerError> {
        ensure_owner(&self.state.owner, caller, "claim_stuck_tokens")?;
        self.ensure_not_swapping()?;

        let owner = self.state.owner;
        let contract = self.state.contract;

        let amount = if *token == contract {
            let held = self.state.balance_of(&contract);
            if held > 0 {
                self.state.move_balance(&contract, &owner, held)?;
            }
            held
        } else {
            self.state.foreign_holdings.remove(token).unwrap_or(0)
        };

        self.state.events.push(LedgerEvent::StuckTokensClaimed {
            token: *token,
            amount,
        });
        info!(
            "Claimed {} of token {} for {}",
            amount,
            address_to_hex(token),
            address_to_hex(&owner)
        );

        Ok(Recovery {
            token: *token,
            to: owner,
            amount,
        })
    }

    /// Records `amount` of a foreign token arriving at the ledger's address.
    pub fn deposit_foreign(&mut self, token: &Address, amount: Balance) -> Result<(), LedgerError> {
        if *token == self.state.contract {
            return Err(LedgerError::InvalidAddress(
                "the ledger's own token is moved with transfer".to_string(),
            ));
        }

        let held = self.foreign_balance(token);
        let updated = held
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("holding of {}", address_to_hex(token))))?;
        self.state.foreign_holdings.insert(*token, updated);
        debug!("Ledger now holds {} of {}", updated, address_to_hex(token));
        Ok(())
    }

    /// Hands ownership to `new_owner`, who also becomes fee exempt.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "transfer_ownership")?;
        ensure_non_zero(new_owner, "new owner")?;

        let previous_owner = self.state.owner;
        self.state.owner = *new_owner;

        if self.state.excluded_from_fees.insert(*new_owner) {
            self.state.events.push(LedgerEvent::ExcludeFromFees {
                account: *new_owner,
                excluded: true,
            });
        }
        self.state.events.push(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner: *new_owner,
        });
        info!(
            "Ownership transferred from {} to {}",
            address_to_hex(&previous_owner),
            address_to_hex(new_owner)
        );
        Ok(())
    }

    /// Gives up ownership. Every privileged operation fails afterwards.
    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), LedgerError> {
        ensure_owner(&self.state.owner, caller, "renounce_ownership")?;

        let previous_owner = self.state.owner;
        self.state.owner = ZERO_ADDRESS;
        self.state.events.push(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner: ZERO_ADDRESS,
        });
        warn!("Ownership renounced by {}", address_to_hex(&previous_owner));
        Ok(())
    }

    fn ensure_not_swapping(&self) -> Result<(), LedgerError> {
        if self.state.swapping {
            warn!("Rejected reentrant call during fee swap");
            return Err(LedgerError::Reentrancy);
        }
        Ok(())
    }

    /// The owner, and any fee-exempt party, may move tokens before launch.
    fn is_gate_exempt(&self, from: &Address, to: &Address) -> bool {
        *from == self.state.owner
            || *to == self.state.owner
            || self.state.is_excluded(from)
            || self.state.is_excluded(to)
    }

    fn transfer_internal(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        self.ensure_not_swapping()?;
        ensure_non_zero(from, "sender")?;
        ensure_non_zero(to, "recipient")?;

        if !self.state.trading_enabled && !self.is_gate_exempt(from, to) {
            warn!(
                "Rejected transfer from {}: trading not enabled",
                address_to_hex(from)
            );
            return Err(LedgerError::TradingDisabled);
        }

        let available = self.state.balance_of(from);
        if available < amount {
            warn!(
                "Rejected transfer from {}: balance {} < {}",
                address_to_hex(from),
                available,
                amount
            );
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        let split = if self.state.is_excluded(from) || self.state.is_excluded(to) {
            FeeSplit::exempt(amount)
        } else {
            fees::split(amount, self.state.fee_percent)
        };

        let contract = self.state.contract;
        let triggers_swap = split.fee > 0
            && self.state.swap_enabled
            && *from != contract
            && self.contract_balance_after(to, split) >= self.state.swap_tokens_at_amount;

        // Only a swap can fail after effects are applied
        let checkpoint = if triggers_swap {
            Some(self.state.clone())
        } else {
            None
        };

        let result = self.apply_transfer(from, to, amount, split).and_then(|_| {
            if triggers_swap {
                self.swap_and_send()
            } else {
                Ok(())
            }
        });

        if let Err(e) = result {
            if let Some(checkpoint) = checkpoint {
                self.state = checkpoint;
            }
            warn!("Transfer from {} rolled back: {}", address_to_hex(from), e);
            return Err(e);
        }

        debug!(
            "Transferred {} from {} to {} (fee {})",
            split.net,
            address_to_hex(from),
            address_to_hex(to),
            split.fee
        );
        Ok(())
    }

    fn contract_balance_after(&self, to: &Address, split: FeeSplit) -> Balance {
        let mut balance = self
            .state
            .balance_of(&self.state.contract)
            .saturating_add(split.fee);
        if *to == self.state.contract {
            balance = balance.saturating_add(split.net);
        }
        balance
    }

    fn apply_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
        split: FeeSplit,
    ) -> Result<(), LedgerError> {
        let contract = self.state.contract;

        self.state.debit(from, amount)?;
        self.state.credit(to, split.net)?;
        self.state.events.push(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount: split.net,
        });

        if split.fee > 0 {
            self.state.credit(&contract, split.fee)?;
            self.state.events.push(LedgerEvent::Transfer {
                from: *from,
                to: contract,
                amount: split.fee,
            });
        }
        Ok(())
    }

    /// Pays the whole contract balance to the fee receiver, then runs the hook.
    fn swap_and_send(&mut self) -> Result<(), LedgerError> {
        let contract = self.state.contract;
        let fee_receiver = self.state.fee_receiver;
        let amount = self.state.balance_of(&contract);
        if amount == 0 {
            return Ok(());
        }

        self.state.move_balance(&contract, &fee_receiver, amount)?;
        self.state.events.push(LedgerEvent::SwapAndSendFee {
            amount,
            fee_receiver,
        });
        info!(
            "Swapping {} accumulated fees to {}",
            amount,
            address_to_hex(&fee_receiver)
        );

        let mut executor = match self.executor.take() {
            Some(executor) => executor,
            None => return Ok(()),
        };

        self.state.swapping = true;
        let outcome = executor.swap_and_send(self, &fee_receiver, amount);
        self.state.swapping = false;
        self.executor = Some(executor);

        outcome
    }
}

impl fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenLedger")
            .field("state", &self.state)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}

impl fmt::Display for TokenLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)
    }
}
