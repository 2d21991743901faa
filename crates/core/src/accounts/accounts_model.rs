//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{ACCOUNT_ID_DELIMITER, CASH_TICKER};
use crate::errors::{Error, Result, ValidationError};

/// How a brokerage reports an account's positions.
///
/// Some brokerage pages only show the cash balance, others only the
/// securities. The type decides which existing positions survive when a new
/// snapshot of the same account is merged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    /// The snapshot carries only the cash balance.
    CashOnly,
    /// The snapshot carries every position except cash.
    ExcludesCash,
}

/// A holding of one ticker inside an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(deserialize_with = "deserialize_upper")]
    pub ticker: String,
    pub value: Decimal,
    #[serde(default, deserialize_with = "deserialize_upper_opt")]
    pub currency: Option<String>,
}

impl Position {
    /// Creates a position, upper-casing ticker and currency code.
    ///
    /// An empty currency code is treated as missing.
    pub fn new(ticker: &str, value: Decimal, currency: Option<&str>) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            value,
            currency: normalize_code(currency),
        }
    }

    /// Returns true if this position is uninvested cash.
    pub fn is_cash(&self) -> bool {
        self.ticker == CASH_TICKER
    }
}

/// Domain model representing a brokerage account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brokerage: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, rename = "type")]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Account {
    /// Creates a visible account with a brokerage-namespaced id.
    pub fn new(brokerage: &str, name: &str, positions: Vec<Position>) -> Self {
        Self {
            id: brokerage_account_id(brokerage, name),
            name: name.to_string(),
            brokerage: brokerage.to_string(),
            hidden: false,
            account_type: None,
            positions,
        }
    }

    /// Validates the account before it enters the collection.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update of an existing account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub hidden: Option<bool>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub positions: Option<Vec<Position>>,
}

impl AccountUpdate {
    /// Shorthand for toggling visibility.
    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Default::default()
        }
    }

    /// Applies the update onto an account.
    pub fn apply(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(hidden) = self.hidden {
            account.hidden = hidden;
        }
        if let Some(account_type) = self.account_type {
            account.account_type = Some(account_type);
        }
        if let Some(positions) = self.positions {
            account.positions = positions;
        }
    }
}

/// Builds the stable account id used to merge snapshots of the same account.
pub fn brokerage_account_id(brokerage: &str, account_name: &str) -> String {
    format!("{}{}{}", brokerage, ACCOUNT_ID_DELIMITER, account_name)
}

pub(crate) fn normalize_code(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
}

pub(crate) fn deserialize_upper<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_uppercase())
}

fn deserialize_upper_opt<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_code(value.as_deref()))
}
