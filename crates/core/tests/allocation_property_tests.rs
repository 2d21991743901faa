//! Property-based integration tests for allocation parsing and aggregation.
//!
//! These tests verify that universal properties hold across generated
//! descriptions and portfolios, using the `proptest` crate.

use pinsight_core::accounts::{Account, Position};
use pinsight_core::allocations::{describe, parse_description, AllocationRule};
use pinsight_core::fx::{CurrencyEntry, CurrencyTable};
use pinsight_core::portfolio::aggregate;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Generates one `name[:percent]` segment.
fn arb_segment() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{0,6}", proptest::option::of(0u32..=100)).prop_map(|(name, percent)| {
        match percent {
            Some(p) => format!("{}:{}", name, p),
            None => name,
        }
    })
}

/// Generates a comma-separated description of one to six segments.
fn arb_description() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_segment(), 1..=6).prop_map(|segments| segments.join(","))
}

fn arb_position() -> impl Strategy<Value = Position> {
    (
        prop_oneof![Just("AAPL"), Just("XIU"), Just("VFV"), Just("CASH"), Just("ZZZ")],
        0u32..100_000,
        prop_oneof![Just(Some("USD")), Just(Some("CAD")), Just(Some("EUR")), Just(None)],
    )
        .prop_map(|(ticker, cents, currency)| {
            Position::new(ticker, Decimal::new(cents as i64, 2), currency)
        })
}

fn arb_accounts() -> impl Strategy<Value = Vec<Account>> {
    proptest::collection::vec(proptest::collection::vec(arb_position(), 0..6), 0..4).prop_map(
        |accounts| {
            accounts
                .into_iter()
                .enumerate()
                .map(|(i, positions)| Account::new("broker", &format!("Account {}", i), positions))
                .collect()
        },
    )
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// A description either fails validation or yields weights summing to 1.
    #[test]
    fn prop_parsed_weights_sum_to_one(description in arb_description()) {
        if let Ok(weights) = parse_description(&description) {
            let total: Decimal = weights.iter().map(|w| w.percentage).sum();
            prop_assert_eq!(total, Decimal::ONE);
            for weight in &weights {
                prop_assert!(weight.percentage > Decimal::ZERO);
                prop_assert!(weight.percentage <= Decimal::ONE);
                prop_assert!(weight.percentage.scale() <= 3);
            }
        }
    }

    /// Descriptions without explicit percentages always parse, with the
    /// shares never increasing from left to right.
    #[test]
    fn prop_auto_fill_is_valid_and_monotone(names in proptest::collection::vec("[A-Z][a-z]{0,6}", 2..=12)) {
        let weights = parse_description(&names.join(",")).unwrap();
        let total: Decimal = weights.iter().map(|w| w.percentage).sum();
        prop_assert_eq!(total, Decimal::ONE);
        prop_assert!(weights.windows(2).all(|pair| pair[0].percentage >= pair[1].percentage));
    }

    /// Rendering parsed weights and parsing them again is lossless.
    #[test]
    fn prop_describe_round_trips(description in arb_description()) {
        if let Ok(weights) = parse_description(&description) {
            let reparsed = parse_description(&describe(&weights)).unwrap();
            prop_assert_eq!(reparsed, weights);
        }
    }

    /// Bucket values add up to the total and are sorted descending.
    #[test]
    fn prop_aggregate_is_consistent(accounts in arb_accounts()) {
        let rules = vec![
            AllocationRule::from_description("AAPL", "Equity").unwrap(),
            AllocationRule::from_description("XIU", "Equity:60,Bonds").unwrap(),
            AllocationRule::from_description("VFV", "US,CA,Intl").unwrap(),
            AllocationRule::unresolved("ZZZ"),
        ];
        let currencies = vec![
            CurrencyEntry::resolved("USD", Decimal::new(135, 2)),
            CurrencyEntry::unresolved("EUR"),
        ];
        let summary = aggregate(&accounts, &rules, &CurrencyTable::new(&currencies));

        let value_sum: Decimal = summary.items.iter().map(|i| i.value).sum();
        prop_assert_eq!(value_sum, summary.total);
        prop_assert!(summary.items.windows(2).all(|pair| pair[0].value >= pair[1].value));

        if !summary.total.is_zero() {
            let percentage_sum: Decimal = summary.items.iter().map(|i| i.percentage).sum();
            prop_assert!((percentage_sum - Decimal::ONE).abs() < Decimal::new(1, 6));
        } else {
            prop_assert!(summary.items.iter().all(|i| i.percentage.is_zero()));
        }
    }
}
