//! Brokerage snapshots delivered by a position source.

use serde::{Deserialize, Serialize};

use super::accounts_model::{Account, AccountType, Position};
use crate::errors::{Error, Result};

/// One scrape of a brokerage page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageSnapshot {
    pub brokerage: String,
    pub account: SnapshotAccount,
    #[serde(default)]
    pub diagnostics: SnapshotDiagnostics,
}

/// The account as seen by the position source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAccount {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Messages the position source attaches to a snapshot.
///
/// `error` means the snapshot is unusable; `info` is a hint for the user
/// (e.g. a missing currency column) and does not block the import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiagnostics {
    pub error: Option<String>,
    pub info: Option<String>,
}

impl BrokerageSnapshot {
    /// Checks that the snapshot can be imported at all.
    pub fn validate(&self) -> Result<()> {
        if let Some(error) = self.diagnostics.error.as_deref().filter(|e| !e.is_empty()) {
            return Err(Error::SourceUnavailable(error.to_string()));
        }
        if self.account.name.trim().is_empty() || self.account.id.trim().is_empty() {
            return Err(Error::SourceUnavailable(
                "Account name not found".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the account to add when no account with this id exists yet.
    pub fn to_new_account(&self, include_cash: bool) -> Account {
        Account {
            id: self.account.id.clone(),
            name: self.account.name.clone(),
            brokerage: self.brokerage.clone(),
            hidden: false,
            account_type: self.account.account_type,
            positions: retain_cash(self.account.positions.clone(), include_cash),
        }
    }

    /// Builds the replacement for an existing account.
    ///
    /// Name, brokerage and type come from the snapshot, `hidden` is kept.
    pub fn to_replacement(&self, existing: &Account, include_cash: bool) -> Account {
        let positions = replacement_positions(
            &existing.positions,
            &self.account.positions,
            self.account.account_type,
        );
        Account {
            id: existing.id.clone(),
            name: self.account.name.clone(),
            brokerage: self.brokerage.clone(),
            hidden: existing.hidden,
            account_type: self.account.account_type,
            positions: retain_cash(positions, include_cash),
        }
    }
}

/// Merges freshly scraped positions with the ones already stored.
///
/// A cash-only snapshot keeps the stored securities, an excludes-cash
/// snapshot keeps the stored cash, anything else replaces everything.
pub fn replacement_positions(
    existing: &[Position],
    incoming: &[Position],
    account_type: Option<AccountType>,
) -> Vec<Position> {
    let kept = existing.iter().filter(|p| match account_type {
        Some(AccountType::CashOnly) => !p.is_cash(),
        Some(AccountType::ExcludesCash) => p.is_cash(),
        None => false,
    });
    kept.chain(incoming.iter()).cloned().collect()
}

fn retain_cash(positions: Vec<Position>, include_cash: bool) -> Vec<Position> {
    if include_cash {
        positions
    } else {
        positions.into_iter().filter(|p| !p.is_cash()).collect()
    }
}
