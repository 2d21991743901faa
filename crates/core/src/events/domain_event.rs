//! Domain event types.

use serde::{Deserialize, Serialize};

/// Events emitted by the portfolio store after a collection changed.
///
/// Each mutation emits exactly one event once the new state is in place.
/// Listeners re-read the store and recompute; the payload only tells them
/// what changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Accounts were added, updated, imported or removed.
    AccountsChanged { account_ids: Vec<String> },

    /// Currency entries changed.
    CurrenciesChanged { codes: Vec<String> },

    /// Allocation rules changed.
    AllocationsChanged { tickers: Vec<String> },

    /// All three collections were replaced from storage.
    CollectionsLoaded,
}

impl DomainEvent {
    pub fn accounts_changed(account_ids: Vec<String>) -> Self {
        Self::AccountsChanged { account_ids }
    }

    pub fn currencies_changed(codes: Vec<String>) -> Self {
        Self::CurrenciesChanged { codes }
    }

    pub fn allocations_changed(tickers: Vec<String>) -> Self {
        Self::AllocationsChanged { tickers }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::AccountsChanged { .. } => "accounts_changed",
            DomainEvent::CurrenciesChanged { .. } => "currencies_changed",
            DomainEvent::AllocationsChanged { .. } => "allocations_changed",
            DomainEvent::CollectionsLoaded => "collections_loaded",
        }
    }
}
