//! Genesis configuration for a ledger deployment.

use crate::errors::LedgerError;
use crate::types::{Address, Balance, TokenMetadata};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest supported number of decimals.
pub const MAX_DECIMALS: u8 = 18;

/// Parameters fixed when a ledger is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places in one whole token
    pub decimals: u8,
    /// Total supply in whole tokens, minted to the deployer
    pub total_supply_tokens: u128,
    /// Transfer fee in percent of the transferred amount
    pub fee_percent: u8,
    /// Fee balance, in whole tokens, at which the automatic swap triggers.
    /// `None` uses one five-thousandth of the total supply.
    pub swap_tokens_at_amount: Option<u128>,
    /// Whether the automatic swap starts enabled
    pub swap_enabled: bool,
    /// Initial fee receiver, hex encoded. `None` uses the deployer.
    pub fee_receiver: Option<String>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            name: "Silver Phoenix".to_string(),
            symbol: "SPX".to_string(),
            decimals: 8,
            total_supply_tokens: 1_000_000_000,
            fee_percent: 4,
            swap_tokens_at_amount: None,
            swap_enabled: true,
            fee_receiver: None,
        }
    }
}

impl GenesisConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let mut file = File::open(path.as_ref()).map_err(|e| {
            LedgerError::ConfigError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| LedgerError::ConfigError(e.to_string()))?;

        let config: GenesisConfig = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a JSON file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LedgerError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::SerializationError(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| LedgerError::ConfigError(e.to_string()))?;
        Ok(())
    }

    /// Checks that the configuration describes a representable token.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.decimals > MAX_DECIMALS {
            return Err(LedgerError::ConfigError(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        if self.fee_percent > 100 {
            return Err(LedgerError::ConfigError(format!(
                "fee percent must be at most 100, got {}",
                self.fee_percent
            )));
        }
        self.total_supply()?;
        self.swap_threshold()?;
        Ok(())
    }

    /// One whole token in base units.
    pub fn unit(&self) -> Balance {
        10u128.pow(self.decimals as u32)
    }

    /// Total supply in base units.
    pub fn total_supply(&self) -> Result<Balance, LedgerError> {
        self.total_supply_tokens.checked_mul(self.unit()).ok_or_else(|| {
            LedgerError::Overflow(format!(
                "total supply of {} tokens with {} decimals",
                self.total_supply_tokens, self.decimals
            ))
        })
    }

    /// Swap threshold in base units.
    pub fn swap_threshold(&self) -> Result<Balance, LedgerError> {
        match self.swap_tokens_at_amount {
            Some(tokens) => tokens.checked_mul(self.unit()).ok_or_else(|| {
                LedgerError::Overflow(format!("swap threshold of {} tokens", tokens))
            }),
            None => Ok(self.total_supply()? / 5_000),
        }
    }

    /// Parses the configured fee receiver, if any.
    pub fn fee_receiver_address(&self) -> Result<Option<Address>, LedgerError> {
        self.fee_receiver
            .as_deref()
            .map(crate::types::address_from_hex)
            .transpose()
    }

    /// The token metadata this configuration describes.
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}
