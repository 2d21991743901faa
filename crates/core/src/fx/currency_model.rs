//! Currency multiplier models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::{deserialize_upper, normalize_code};
use crate::errors::{Error, Result, ValidationError};

/// Conversion factor from a currency into the reporting currency.
///
/// Serialized as a bare number, or `null` while the user has not entered
/// a value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum Multiplier {
    Resolved(Decimal),
    #[default]
    Unresolved,
}

impl Multiplier {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Multiplier::Resolved(value) => Some(*value),
            Multiplier::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Multiplier::Resolved(_))
    }
}

impl From<Option<Decimal>> for Multiplier {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Multiplier::Unresolved, Multiplier::Resolved)
    }
}

impl From<Multiplier> for Option<Decimal> {
    fn from(multiplier: Multiplier) -> Self {
        multiplier.value()
    }
}

/// A currency code together with its multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyEntry {
    #[serde(deserialize_with = "deserialize_upper")]
    pub code: String,
    #[serde(default)]
    pub multiplier: Multiplier,
}

impl CurrencyEntry {
    pub fn resolved(code: &str, multiplier: Decimal) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            multiplier: Multiplier::Resolved(multiplier),
        }
    }

    /// Placeholder for a code seen in positions but not priced yet.
    pub fn unresolved(code: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            multiplier: Multiplier::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.multiplier.is_resolved()
    }

    /// Upper-cases the code and rejects entries that cannot be stored.
    pub fn normalized(self) -> Result<Self> {
        let code = normalize_code(Some(&self.code)).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(
                "Currency code cannot be empty".to_string(),
            ))
        })?;
        if let Multiplier::Resolved(value) = self.multiplier {
            if value.is_sign_negative() {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Multiplier for {} cannot be negative",
                    code
                ))));
            }
        }
        Ok(Self {
            code,
            multiplier: self.multiplier,
        })
    }
}
