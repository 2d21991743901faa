//! Repository that keeps the collections in memory.

use std::sync::{PoisonError, RwLock};

use crate::accounts::Account;
use crate::allocations::AllocationRule;
use crate::errors::Result;
use crate::fx::CurrencyEntry;

use super::store_model::StoredCollections;
use super::store_traits::PortfolioRepositoryTrait;

/// Non-durable repository, used by tests and by embedders that persist
/// through their own channel.
#[derive(Debug, Default)]
pub struct InMemoryPortfolioRepository {
    collections: RwLock<StoredCollections>,
}

impl InMemoryPortfolioRepository {
    pub fn new(initial: StoredCollections) -> Self {
        Self {
            collections: RwLock::new(initial),
        }
    }

    /// Current content, as last saved.
    pub fn collections(&self) -> StoredCollections {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut StoredCollections)) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut collections);
        Ok(())
    }
}

impl PortfolioRepositoryTrait for InMemoryPortfolioRepository {
    fn load(&self) -> Result<StoredCollections> {
        Ok(self.collections())
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
