//! Row models for the CSV reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `(position, asset class)` line of the portfolio report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRow {
    pub brokerage: String,
    pub account_id: String,
    pub account_name: String,
    pub ticker: String,
    /// Position value times the class percentage, in the position currency
    pub value: Decimal,
    pub currency: Option<String>,
    /// Resolved multiplier of the position currency, if any
    pub currency_multiplier: Option<Decimal>,
    pub normalized_value: Decimal,
    /// Empty when the ticker has no resolved allocation
    pub asset_class: String,
}

impl PortfolioRow {
    pub const HEADERS: [&'static str; 9] = [
        "Brokerage",
        "Account ID",
        "Account Name",
        "Ticker",
        "Value",
        "Currency",
        "Currency Multiplier",
        "Normalized Value",
        "Asset Class",
    ];
}

/// One line of the asset class report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    pub asset_class: String,
    pub value: Decimal,
    /// Fraction of the portfolio (0-1)
    pub percentage: Decimal,
}

impl AssetRow {
    pub const HEADERS: [&'static str; 3] = ["Asset Class", "Value", "% Portfolio"];
}

/// Which report a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Portfolio,
    Assets,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Portfolio => "portfolio",
            ExportKind::Assets => "assets",
        }
    }
}

/// Download name of a report, e.g. `"2024-03-01 portfolio.csv"`.
pub fn export_file_name(date: NaiveDate, kind: ExportKind) -> String {
    format!("{} {}.csv", date.format("%Y-%m-%d"), kind.as_str())
}
