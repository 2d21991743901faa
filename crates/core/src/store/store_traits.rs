//! Persistence contract of the portfolio store.

use crate::accounts::Account;
use crate::allocations::AllocationRule;
use crate::errors::Result;
use crate::fx::CurrencyEntry;

use super::store_model::StoredCollections;

/// Durable storage of the three collections.
///
/// The store only hands resolved currencies and allocation rules to the
/// `save_*` methods; placeholders are never persisted.
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Reads all collections. Missing collections load as empty.
    fn load(&self) -> Result<StoredCollections>;

    fn save_accounts(&self, accounts: &[Account]) -> Result<()>;

    fn save_currencies(&self, currencies: &[CurrencyEntry]) -> Result<()>;

    fn save_allocations(&self, allocations: &[AllocationRule]) -> Result<()>;
}
