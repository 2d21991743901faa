//! Aggregation of positions into per-asset-class totals.

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::allocations::{AllocationRule, AssetClassWeight};
use crate::constants::UNKNOWN_ASSET_CLASS;
use crate::fx::CurrencyTable;

use super::{AggregationOptions, AssetClassTotal, AssetSummary};

/// Aggregates every position of every account into asset class totals.
///
/// Hidden accounts are included; visibility only matters for display.
pub fn aggregate(
    accounts: &[Account],
    rules: &[AllocationRule],
    currencies: &CurrencyTable,
) -> AssetSummary {
    aggregate_with(accounts, rules, currencies, &AggregationOptions::default())
}

/// Same as [`aggregate`] with explicit options.
///
/// Positions whose ticker has no resolved rule land in the `???` class.
/// Buckets are sorted by value descending; equal values keep the order in
/// which their class was first seen. When the total is zero every
/// percentage is zero, and without positions the summary is empty.
pub fn aggregate_with(
    accounts: &[Account],
    rules: &[AllocationRule],
    currencies: &CurrencyTable,
    options: &AggregationOptions,
) -> AssetSummary {
    let rules_by_ticker = resolved_rules_by_ticker(rules);
    let unknown = vec![AssetClassWeight::new(UNKNOWN_ASSET_CLASS, Decimal::ONE)];

    let mut buckets: Vec<AssetClassTotal> = Vec::new();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();
    let mut position_count = 0usize;

    for position in accounts.iter().flat_map(|account| account.positions.iter()) {
        if !options.include_cash && position.is_cash() {
            continue;
        }
        position_count += 1;

        let weights = rules_by_ticker
            .get(position.ticker.as_str())
            .map(|rule| rule.allocation.weights())
            .unwrap_or(unknown.as_slice());

        for weight in weights {
            let contribution = currencies.convert(
                position.value.saturating_mul(weight.percentage),
                position.currency.as_deref(),
            );
            let slot = *bucket_index.entry(weight.name.clone()).or_insert_with(|| {
                buckets.push(AssetClassTotal::empty(&weight.name));
                buckets.len() - 1
            });
            buckets[slot].value = buckets[slot].value.saturating_add(contribution);
        }
    }

    // Extreme values saturate rather than overflow
    let total = buckets
        .iter()
        .fold(Decimal::ZERO, |total, bucket| total.saturating_add(bucket.value));

    // Stable sort keeps first-seen order for equal values
    buckets.sort_by(|a, b| b.value.cmp(&a.value));
    for bucket in &mut buckets {
        bucket.percentage = bucket.value.checked_div(total).unwrap_or(Decimal::ZERO);
    }

    debug!(
        "Aggregated {} positions into {} asset classes, total {}",
        position_count,
        buckets.len(),
        total
    );

    AssetSummary {
        items: buckets,
        total,
    }
}

/// Index of resolved rules by ticker. The first resolved rule for a ticker wins.
pub(crate) fn resolved_rules_by_ticker(rules: &[AllocationRule]) -> HashMap<&str, &AllocationRule> {
    let mut by_ticker: HashMap<&str, &AllocationRule> = HashMap::new();
    for rule in rules.iter().filter(|rule| rule.is_resolved()) {
        by_ticker.entry(rule.ticker.as_str()).or_insert(rule);
    }
    by_ticker
}
