//! Persistence of the deployed ledger between CLI invocations.

use crate::errors::CliError;
use spx_core::TokenLedger;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A ledger snapshot file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Creates a store backed by `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a ledger has been deployed here.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the deployed ledger.
    pub fn load(&self) -> Result<TokenLedger, CliError> {
        if !self.exists() {
            return Err(CliError::StateMissing(self.path.display().to_string()));
        }

        let mut file = File::open(&self.path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let ledger = TokenLedger::restore(&bytes)?;
        debug!("Loaded ledger from {}", self.path.display());
        Ok(ledger)
    }

    /// Writes the ledger, replacing any previous snapshot.
    pub fn save(&self, ledger: &TokenLedger) -> Result<(), CliError> {
        let bytes = ledger.snapshot()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target, then rename, so a crash never leaves half a snapshot
        let tmp = self.path.with_extension("tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved ledger to {}", self.path.display());
        Ok(())
    }

    /// Loads the ledger, applies `op`, and saves only if `op` succeeded.
    pub fn update<T, E, F>(&self, op: F) -> Result<T, CliError>
    where
        F: FnOnce(&mut TokenLedger) -> Result<T, E>,
        CliError: From<E>,
    {
        let mut ledger = self.load()?;
        let value = op(&mut ledger)?;
        self.save(&ledger)?;
        Ok(value)
    }
}
