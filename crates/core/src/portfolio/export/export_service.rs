//! Builds the report rows and writes them as CSV.

use csv::Writer;
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::allocations::{AllocationRule, AssetClassWeight};
use crate::errors::{Error, Result};
use crate::fx::CurrencyTable;
use crate::portfolio::allocation::{resolved_rules_by_ticker, AssetSummary};

use super::{AssetRow, PortfolioRow};

/// One row per position and asset class, in account then position order.
///
/// A ticker without a resolved rule yields a single row with the full value
/// and an empty asset class.
pub fn portfolio_rows(
    accounts: &[Account],
    rules: &[AllocationRule],
    currencies: &CurrencyTable,
) -> Vec<PortfolioRow> {
    let rules_by_ticker = resolved_rules_by_ticker(rules);
    let unassigned = vec![AssetClassWeight::new("", Decimal::ONE)];

    let mut rows = Vec::new();
    for account in accounts {
        for position in &account.positions {
            let weights = rules_by_ticker
                .get(position.ticker.as_str())
                .map(|rule| rule.allocation.weights())
                .unwrap_or(unassigned.as_slice());
            let multiplier = currencies.multiplier_for(position.currency.as_deref());

            for weight in weights {
                let value = position.value.saturating_mul(weight.percentage);
                rows.push(PortfolioRow {
                    brokerage: account.brokerage.clone(),
                    account_id: account.id.clone(),
                    account_name: account.name.clone(),
                    ticker: position.ticker.clone(),
                    value,
                    currency: position.currency.clone(),
                    currency_multiplier: multiplier,
                    normalized_value: value.saturating_mul(multiplier.unwrap_or(Decimal::ONE)),
                    asset_class: weight.name.clone(),
                });
            }
        }
    }
    rows
}

/// Rows of the asset class report, in summary order.
pub fn asset_rows(summary: &AssetSummary) -> Vec<AssetRow> {
    summary
        .items
        .iter()
        .map(|item| AssetRow {
            asset_class: item.asset_class.clone(),
            value: item.value,
            percentage: item.percentage,
        })
        .collect()
}

/// Portfolio report as CSV text with a header row.
pub fn portfolio_csv(
    accounts: &[Account],
    rules: &[AllocationRule],
    currencies: &CurrencyTable,
) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(PortfolioRow::HEADERS)?;
    for row in portfolio_rows(accounts, rules, currencies) {
        writer.write_record([
            row.brokerage,
            row.account_id,
            row.account_name,
            row.ticker,
            decimal_cell(row.value),
            row.currency.unwrap_or_default(),
            row.currency_multiplier.map(decimal_cell).unwrap_or_default(),
            decimal_cell(row.normalized_value),
            row.asset_class,
        ])?;
    }
    finish(writer)
}

/// Asset class report as CSV text with a header row.
pub fn assets_csv(summary: &AssetSummary) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(AssetRow::HEADERS)?;
    for row in asset_rows(summary) {
        writer.write_record([
            row.asset_class,
            decimal_cell(row.value),
            decimal_cell(row.percentage),
        ])?;
    }
    finish(writer)
}

fn decimal_cell(value: Decimal) -> String {
    value.normalize().to_string()
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}
