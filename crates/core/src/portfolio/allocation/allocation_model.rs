//! Allocation models for the portfolio breakdown by asset class.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated value of one asset class across every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassTotal {
    /// Asset class name as written in the allocation rules
    pub asset_class: String,
    /// Total value in the reporting currency
    pub value: Decimal,
    /// Fraction of the whole portfolio (0-1)
    pub percentage: Decimal,
}

impl AssetClassTotal {
    pub(crate) fn empty(asset_class: &str) -> Self {
        Self {
            asset_class: asset_class.to_string(),
            value: Decimal::ZERO,
            percentage: Decimal::ZERO,
        }
    }
}

/// Complete asset class breakdown of the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    /// Asset classes sorted by value descending
    pub items: Vec<AssetClassTotal>,
    /// Total portfolio value in the reporting currency
    pub total: Decimal,
}

/// Knobs for the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationOptions {
    /// Whether positions with the `CASH` ticker count towards the totals
    pub include_cash: bool,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self { include_cash: true }
    }
}
