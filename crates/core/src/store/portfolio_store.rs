//! Observable store of accounts, currencies and allocation rules.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::accounts::{Account, AccountUpdate, BrokerageSnapshot};
use crate::allocations::AllocationRule;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::fx::CurrencyEntry;
use crate::portfolio::allocation::{AggregationOptions, AssetSummary};
use crate::portfolio::export;

use super::store_model::{CollectionUpdate, PortfolioSnapshot, StoredCollections};
use super::store_traits::PortfolioRepositoryTrait;

/// Holds the three collections behind one lock so readers always see a
/// consistent snapshot.
///
/// Every mutation persists the affected collection, swaps the new state in,
/// releases the lock and then emits exactly one [`DomainEvent`]. A failed
/// mutation leaves the state untouched and emits nothing.
pub struct PortfolioStore {
    state: RwLock<PortfolioSnapshot>,
    repository: Arc<dyn PortfolioRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl PortfolioStore {
    /// Creates an empty store.
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            state: RwLock::new(PortfolioSnapshot::default()),
            repository,
            event_sink,
        }
    }

    /// Creates a store filled from the repository.
    pub fn open(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        let store = Self::new(repository, event_sink);
        store.reload()?;
        Ok(store)
    }

    /// Re-reads every collection from the repository.
    pub fn reload(&self) -> Result<()> {
        let stored = self.repository.load()?;
        self.load(stored);
        Ok(())
    }

    /// Replaces all collections at once.
    pub fn load(&self, stored: StoredCollections) {
        let snapshot = PortfolioSnapshot::from_stored(stored);
        debug!(
            "Loaded {} accounts, {} currencies, {} allocations",
            snapshot.accounts.len(),
            snapshot.currencies.len(),
            snapshot.allocations.len()
        );
        *self.write() = snapshot;
        self.event_sink.emit(DomainEvent::CollectionsLoaded);
    }

    /// Applies change notifications coming from storage.
    ///
    /// The changes are already persisted, so nothing is written back. One
    /// event is emitted per update.
    pub fn apply_changes(&self, updates: Vec<CollectionUpdate>) {
        for update in updates {
            let event = {
                let mut state = self.write();
                let current = state.to_stored();
                let (next, event) = match update {
                    CollectionUpdate::Accounts(accounts) => {
                        let ids = accounts.iter().map(|a| a.id.clone()).collect();
                        (
                            PortfolioSnapshot::build(accounts, current.currencies, current.allocations),
                            DomainEvent::accounts_changed(ids),
                        )
                    }
                    CollectionUpdate::Currencies(currencies) => {
                        let codes = currencies.iter().map(|c| c.code.clone()).collect();
                        (
                            PortfolioSnapshot::build(current.accounts, currencies, current.allocations),
                            DomainEvent::currencies_changed(codes),
                        )
                    }
                    CollectionUpdate::Allocations(allocations) => {
                        let tickers = allocations.iter().map(|r| r.ticker.clone()).collect();
                        (
                            PortfolioSnapshot::build(current.accounts, current.currencies, allocations),
                            DomainEvent::allocations_changed(tickers),
                        )
                    }
                };
                *state = next;
                event
            };
            debug!("Applied external change: {}", event.kind());
            self.event_sink.emit(event);
        }
    }

    // ==================== Accounts ====================

    /// Merges a brokerage snapshot into the accounts.
    ///
    /// A new account goes to the front of the collection. An existing one
    /// has its positions merged according to the snapshot's account type and
    /// keeps its visibility.
    pub fn import_snapshot(&self, snapshot: &BrokerageSnapshot, include_cash: bool) -> Result<Account> {
        snapshot.validate()?;
        if let Some(info) = snapshot.diagnostics.info.as_deref().filter(|i| !i.is_empty()) {
            warn!("Importing {} with warning: {}", snapshot.account.id, info);
        }

        self.mutate_accounts(&snapshot.account.id, |accounts| {
            let account = match accounts.iter().position(|a| a.id == snapshot.account.id) {
                Some(index) => {
                    let merged = snapshot.to_replacement(&accounts[index], include_cash);
                    debug!(
                        "Merged snapshot into account {} ({} positions)",
                        merged.id,
                        merged.positions.len()
                    );
                    accounts[index] = merged.clone();
                    merged
                }
                None => {
                    let account = snapshot.to_new_account(include_cash);
                    debug!("Added account {} from snapshot", account.id);
                    accounts.insert(0, account.clone());
                    account
                }
            };
            Ok(account)
        })
    }

    /// Adds an account at the front of the collection.
    pub fn add_account(&self, account: Account) -> Result<Account> {
        account.validate()?;
        let account_id = account.id.clone();
        self.mutate_accounts(&account_id, |accounts| {
            if accounts.iter().any(|a| a.id == account.id) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Account {} already exists",
                    account.id
                ))));
            }
            accounts.insert(0, account.clone());
            Ok(account)
        })
    }

    pub fn update_account(&self, account_id: &str, update: AccountUpdate) -> Result<Account> {
        self.mutate_accounts(account_id, |accounts| {
            let account = accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .ok_or_else(|| Error::NotFound(format!("Account {}", account_id)))?;
            update.apply(account);
            Ok(account.clone())
        })
    }

    pub fn remove_account(&self, account_id: &str) -> Result<()> {
        self.mutate_accounts(account_id, |accounts| {
            let index = accounts
                .iter()
                .position(|a| a.id == account_id)
                .ok_or_else(|| Error::NotFound(format!("Account {}", account_id)))?;
            accounts.remove(index);
            Ok(())
        })
    }

    // ==================== Currencies ====================

    /// Sets the multiplier of a currency. An unresolved entry clears it.
    pub fn upsert_currency(&self, entry: CurrencyEntry) -> Result<CurrencyEntry> {
        let entry = entry.normalized()?;
        self.mutate_currencies(&entry.code, |currencies| {
            match currencies.iter_mut().find(|c| c.code == entry.code) {
                Some(existing) => *existing = entry.clone(),
                None => currencies.push(entry.clone()),
            }
            Ok(entry.clone())
        })
    }

    pub fn remove_currency(&self, code: &str) -> Result<()> {
        let code = code.trim().to_uppercase();
        self.mutate_currencies(&code, |currencies| {
            let before = currencies.len();
            currencies.retain(|c| c.code != code);
            if currencies.len() == before {
                return Err(Error::NotFound(format!("Currency {}", code)));
            }
            Ok(())
        })
    }

    // ==================== Allocations ====================

    /// Parses `description` and stores it as the rule of `ticker`.
    ///
    /// A blank description clears the rule. On a validation error nothing
    /// changes.
    pub fn set_allocation(&self, ticker: &str, description: &str) -> Result<AllocationRule> {
        let rule = if description.trim().is_empty() {
            AllocationRule::unresolved(ticker)
        } else {
            AllocationRule::from_description(ticker, description)?
        };
        self.upsert_allocation(rule)
    }

    /// Stores a rule as given. Every weight must lie in (0, 1] and the
    /// weights must add up to exactly 1.
    pub fn upsert_allocation(&self, rule: AllocationRule) -> Result<AllocationRule> {
        let rule = AllocationRule {
            ticker: rule.ticker.trim().to_uppercase(),
            allocation: rule.allocation,
        };
        if rule.ticker.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Ticker cannot be empty".to_string(),
            )));
        }
        if rule.is_resolved() {
            let weights = rule.allocation.weights();
            if let Some(weight) = weights
                .iter()
                .find(|w| w.percentage <= Decimal::ZERO || w.percentage > Decimal::ONE)
            {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Weight of '{}' must be above 0% and at most 100%",
                    weight.name
                ))));
            }
            let total: Decimal = weights.iter().map(|w| w.percentage).sum();
            if total != Decimal::ONE {
                return Err(ValidationError::IncompleteTotal.into());
            }
        }

        let ticker = rule.ticker.clone();
        self.mutate_allocations(&ticker, |allocations| {
            match allocations.iter_mut().find(|r| r.ticker == rule.ticker) {
                Some(existing) => *existing = rule.clone(),
                None => allocations.push(rule.clone()),
            }
            Ok(rule)
        })
    }

    pub fn remove_allocation(&self, ticker: &str) -> Result<()> {
        let ticker = ticker.trim().to_uppercase();
        self.mutate_allocations(&ticker, |allocations| {
            let before = allocations.len();
            allocations.retain(|r| r.ticker != ticker);
            if allocations.len() == before {
                return Err(Error::NotFound(format!("Allocation {}", ticker)));
            }
            Ok(())
        })
    }

    // ==================== Reads ====================

    /// Consistent copy of all three collections, placeholders included.
    pub fn snapshot(&self) -> PortfolioSnapshot {
        self.read().clone()
    }

    pub fn summary(&self, options: &AggregationOptions) -> AssetSummary {
        self.read().summary(options)
    }

    pub fn portfolio_csv(&self) -> Result<String> {
        let state = self.read();
        export::portfolio_csv(&state.accounts, &state.allocations, &state.currency_table())
    }

    pub fn assets_csv(&self, options: &AggregationOptions) -> Result<String> {
        let summary = self.summary(options);
        export::assets_csv(&summary)
    }

    // ==================== Internals ====================

    fn read(&self) -> RwLockReadGuard<'_, PortfolioSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PortfolioSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate_accounts<T>(
        &self,
        account_id: &str,
        f: impl FnOnce(&mut Vec<Account>) -> Result<T>,
    ) -> Result<T> {
        let result = {
            let mut state = self.write();
            let current = state.to_stored();
            let mut accounts = current.accounts;
            let result = f(&mut accounts)?;
            self.repository.save_accounts(&accounts)?;
            *state = PortfolioSnapshot::build(accounts, current.currencies, current.allocations);
            result
        };
        self.event_sink
            .emit(DomainEvent::accounts_changed(vec![account_id.to_string()]));
        Ok(result)
    }

    fn mutate_currencies<T>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Vec<CurrencyEntry>) -> Result<T>,
    ) -> Result<T> {
        let result = {
            let mut state = self.write();
            let current = state.to_stored();
            let mut currencies = current.currencies;
            let result = f(&mut currencies)?;
            let next = PortfolioSnapshot::build(current.accounts, currencies, current.allocations);
            self.repository.save_currencies(&next.resolved_currencies())?;
            *state = next;
            result
        };
        self.event_sink
            .emit(DomainEvent::currencies_changed(vec![code.to_string()]));
        Ok(result)
    }

    fn mutate_allocations<T>(
        &self,
        ticker: &str,
        f: impl FnOnce(&mut Vec<AllocationRule>) -> Result<T>,
    ) -> Result<T> {
        let result = {
            let mut state = self.write();
            let current = state.to_stored();
            let mut allocations = current.allocations;
            let result = f(&mut allocations)?;
            let next = PortfolioSnapshot::build(current.accounts, current.currencies, allocations);
            self.repository.save_allocations(&next.resolved_allocations())?;
            *state = next;
            result
        };
        self.event_sink
            .emit(DomainEvent::allocations_changed(vec![ticker.to_string()]));
        Ok(result)
    }
}
