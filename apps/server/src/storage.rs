//! JSON file persistence of the portfolio collections.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use pinsight_core::accounts::Account;
use pinsight_core::allocations::AllocationRule;
use pinsight_core::errors::Result;
use pinsight_core::fx::CurrencyEntry;
use pinsight_core::store::{PortfolioRepositoryTrait, StoredCollections};

/// Stores all three collections in one JSON document.
///
/// Every save rewrites the document through a temporary file and a rename,
/// so a crash never leaves a half-written file behind.
pub struct JsonFileRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles of the document
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredCollections> {
        if !self.path.exists() {
            return Ok(StoredCollections::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(StoredCollections::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn update(&self, f: impl FnOnce(&mut StoredCollections)) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut collections = self.read()?;
        f(&mut collections);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(&collections)?)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Saved portfolio data to {}", self.path.display());
        Ok(())
    }
}

impl PortfolioRepositoryTrait for JsonFileRepository {
    fn load(&self) -> Result<StoredCollections> {
        self.read()
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.update(|c| c.accounts = accounts.to_vec())
    }

    fn save_currencies(&self, currencies: &[CurrencyEntry]) -> Result<()> {
        self.update(|c| c.currencies = currencies.to_vec())
    }

    fn save_allocations(&self, allocations: &[AllocationRule]) -> Result<()> {
        self.update(|c| c.allocations = allocations.to_vec())
    }
}
