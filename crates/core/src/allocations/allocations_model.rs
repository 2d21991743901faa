//! Allocation rule models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation_parser::{describe, parse_description};
use crate::accounts::deserialize_upper;
use crate::errors::Result;

/// Share of a security's value assigned to one asset class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassWeight {
    /// Asset class name, e.g. "US Equity"
    pub name: String,
    /// Fraction of the security's value, in (0, 1]
    pub percentage: Decimal,
}

impl AssetClassWeight {
    pub fn new(name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            percentage,
        }
    }
}

/// The asset class split of one ticker.
///
/// Serialized as the plain list of weights; an empty list means the user has
/// not described the ticker yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<AssetClassWeight>", into = "Vec<AssetClassWeight>")]
pub enum Allocation {
    Resolved(Vec<AssetClassWeight>),
    #[default]
    Unresolved,
}

impl Allocation {
    /// Weights of a resolved allocation, empty otherwise.
    pub fn weights(&self) -> &[AssetClassWeight] {
        match self {
            Allocation::Resolved(weights) => weights,
            Allocation::Unresolved => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Allocation::Resolved(_))
    }
}

impl From<Vec<AssetClassWeight>> for Allocation {
    fn from(weights: Vec<AssetClassWeight>) -> Self {
        if weights.is_empty() {
            Allocation::Unresolved
        } else {
            Allocation::Resolved(weights)
        }
    }
}

impl From<Allocation> for Vec<AssetClassWeight> {
    fn from(allocation: Allocation) -> Self {
        match allocation {
            Allocation::Resolved(weights) => weights,
            Allocation::Unresolved => Vec::new(),
        }
    }
}

/// User-declared split of a ticker's value across asset classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRule {
    #[serde(deserialize_with = "deserialize_upper")]
    pub ticker: String,
    #[serde(default, rename = "assetClasses")]
    pub allocation: Allocation,
}

impl AllocationRule {
    /// Parses a free-form description such as `"US:60,Intl:40"`.
    pub fn from_description(ticker: &str, description: &str) -> Result<Self> {
        let weights = parse_description(description)?;
        Ok(Self {
            ticker: ticker.trim().to_uppercase(),
            allocation: Allocation::from(weights),
        })
    }

    /// Placeholder for a ticker seen in positions but not described yet.
    pub fn unresolved(ticker: &str) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            allocation: Allocation::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.allocation.is_resolved()
    }

    /// True if the ticker is split over more than one asset class.
    pub fn is_multi_asset(&self) -> bool {
        self.allocation.weights().len() > 1
    }

    /// Renders the rule back into its editable description.
    pub fn description(&self) -> String {
        describe(self.allocation.weights())
    }
}
