//! Collections held by the portfolio store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::allocations::AllocationRule;
use crate::errors::{Error, Result, ValidationError};
use crate::fx::{CurrencyEntry, CurrencyTable};
use crate::portfolio::allocation::{aggregate_with, AggregationOptions, AssetSummary};
use crate::portfolio::gaps::{fill_allocation_gaps, fill_currency_gaps};

/// The three collections as persisted. Only resolved currencies and
/// allocation rules are ever written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredCollections {
    pub accounts: Vec<Account>,
    pub currencies: Vec<CurrencyEntry>,
    pub allocations: Vec<AllocationRule>,
}

/// Consistent view of the store: the resolved entries followed by an
/// unresolved placeholder for every code or ticker the positions reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub accounts: Vec<Account>,
    pub currencies: Vec<CurrencyEntry>,
    pub allocations: Vec<AllocationRule>,
}

impl PortfolioSnapshot {
    /// Drops unresolved entries from the inputs and derives placeholders
    /// from the current accounts.
    pub fn build(
        accounts: Vec<Account>,
        currencies: Vec<CurrencyEntry>,
        allocations: Vec<AllocationRule>,
    ) -> Self {
        let currencies = currencies.into_iter().filter(|c| c.is_resolved()).collect();
        let allocations = allocations.into_iter().filter(|r| r.is_resolved()).collect();
        Self {
            currencies: fill_currency_gaps(&accounts, currencies),
            allocations: fill_allocation_gaps(&accounts, allocations),
            accounts,
        }
    }

    pub fn from_stored(stored: StoredCollections) -> Self {
        Self::build(stored.accounts, stored.currencies, stored.allocations)
    }

    /// The persistable part of the snapshot.
    pub fn to_stored(&self) -> StoredCollections {
        StoredCollections {
            accounts: self.accounts.clone(),
            currencies: self.resolved_currencies(),
            allocations: self.resolved_allocations(),
        }
    }

    pub fn resolved_currencies(&self) -> Vec<CurrencyEntry> {
        self.currencies.iter().filter(|c| c.is_resolved()).cloned().collect()
    }

    pub fn resolved_allocations(&self) -> Vec<AllocationRule> {
        self.allocations.iter().filter(|r| r.is_resolved()).cloned().collect()
    }

    /// Codes still waiting for a multiplier.
    pub fn unresolved_currency_codes(&self) -> Vec<&str> {
        self.currencies
            .iter()
            .filter(|c| !c.is_resolved())
            .map(|c| c.code.as_str())
            .collect()
    }

    /// Tickers still waiting for an allocation.
    pub fn unresolved_tickers(&self) -> Vec<&str> {
        self.allocations
            .iter()
            .filter(|r| !r.is_resolved())
            .map(|r| r.ticker.as_str())
            .collect()
    }

    pub fn currency_table(&self) -> CurrencyTable<'_> {
        CurrencyTable::new(&self.currencies)
    }

    pub fn summary(&self, options: &AggregationOptions) -> AssetSummary {
        aggregate_with(&self.accounts, &self.allocations, &self.currency_table(), options)
    }
}

/// Names of the persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    Accounts,
    Currencies,
    Allocations,
}

impl CollectionName {
    pub const ALL: [CollectionName; 3] = [
        CollectionName::Accounts,
        CollectionName::Currencies,
        CollectionName::Allocations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Accounts => "accounts",
            CollectionName::Currencies => "currencies",
            CollectionName::Allocations => "allocations",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CollectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Unknown collection '{}'",
                    s
                )))
            })
    }
}

/// New content of one collection, as reported by storage.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionUpdate {
    Accounts(Vec<Account>),
    Currencies(Vec<CurrencyEntry>),
    Allocations(Vec<AllocationRule>),
}

impl CollectionUpdate {
    pub fn name(&self) -> CollectionName {
        match self {
            CollectionUpdate::Accounts(_) => CollectionName::Accounts,
            CollectionUpdate::Currencies(_) => CollectionName::Currencies,
            CollectionUpdate::Allocations(_) => CollectionName::Allocations,
        }
    }

    /// Decodes a raw storage change for the named collection.
    pub fn from_json(name: CollectionName, value: serde_json::Value) -> Result<Self> {
        Ok(match name {
            CollectionName::Accounts => CollectionUpdate::Accounts(serde_json::from_value(value)?),
            CollectionName::Currencies => {
                CollectionUpdate::Currencies(serde_json::from_value(value)?)
            }
            CollectionName::Allocations => {
                CollectionUpdate::Allocations(serde_json::from_value(value)?)
            }
        })
    }
}
