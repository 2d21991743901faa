//! Parser for free-form allocation descriptions.
//!
//! A description lists asset classes separated by commas, each optionally
//! followed by a colon and a percentage: `"US:60, Intl:30, Bonds"`. Classes
//! without a usable percentage share whatever is left of 100%.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::allocations_model::AssetClassWeight;
use crate::constants::PERCENTAGE_PRECISION;
use crate::errors::{Result, ValidationError};

/// Fraction digits kept from a percentage before it is parsed.
const MAX_FRACTION_DIGITS: usize = 20;

static PERCENTAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+").expect("Invalid regex pattern"));

/// Parses a description into asset class weights summing to exactly 1.
///
/// A description without commas is a single class at 100%; a percentage
/// after its colon is ignored unless it exceeds 100. Empty names are
/// accepted; rejecting them is up to the caller.
pub fn parse_description(description: &str) -> Result<Vec<AssetClassWeight>> {
    let segments: Vec<&str> = description.split(',').collect();
    if segments.len() == 1 {
        let (name, value) = match description.split_once(':') {
            Some((name, value)) => (name.trim(), Some(value)),
            None => (description.trim(), None),
        };
        // The percentage of a lone class is always 100%, but an impossible
        // one is still reported.
        if value.and_then(parse_percent).is_some_and(|p| p > dec!(100)) {
            return Err(ValidationError::ClassExceeds(name.to_string()).into());
        }
        return Ok(vec![AssetClassWeight::new(name, Decimal::ONE)]);
    }

    // (name, explicit fraction); None marks an auto-filling class
    let mut classes: Vec<(String, Option<Decimal>)> = Vec::with_capacity(segments.len());
    for segment in segments {
        let (name, value) = match segment.split_once(':') {
            Some((name, value)) => (name.trim(), Some(value)),
            None => (segment.trim(), None),
        };

        let fraction = match value.and_then(parse_percent) {
            Some(percent) => {
                if percent > dec!(100) {
                    return Err(ValidationError::ClassExceeds(name.to_string()).into());
                }
                let fraction = (percent / dec!(100)).round_dp_with_strategy(
                    PERCENTAGE_PRECISION,
                    RoundingStrategy::MidpointAwayFromZero,
                );
                Some(fraction).filter(|f| !f.is_zero())
            }
            None => None,
        };
        classes.push((name.to_string(), fraction));
    }

    let explicit: Decimal = classes.iter().filter_map(|class| class.1).sum();
    if explicit > Decimal::ONE {
        return Err(ValidationError::TotalExceeds.into());
    }

    // Rounding each share up keeps the shares non-increasing from left to
    // right and leaves the exact remainder to the last class.
    let mut remaining = Decimal::ONE - explicit;
    let mut left = classes.iter().filter(|class| class.1.is_none()).count();
    for class in classes.iter_mut().filter(|class| class.1.is_none()) {
        let share = (remaining / Decimal::from(left))
            .round_dp_with_strategy(PERCENTAGE_PRECISION, RoundingStrategy::ToPositiveInfinity);
        class.1 = Some(share);
        remaining -= share;
        left -= 1;
    }

    let weights: Vec<AssetClassWeight> = classes
        .into_iter()
        .filter_map(|(name, fraction)| {
            fraction
                .filter(|f| !f.is_zero())
                .map(|f| AssetClassWeight::new(name, f))
        })
        .collect();

    let total: Decimal = weights.iter().map(|w| w.percentage).sum();
    if total != Decimal::ONE {
        return Err(ValidationError::IncompleteTotal.into());
    }

    Ok(weights)
}

/// Renders weights back into description form.
///
/// `parse_description(&describe(w))` yields `w` again for any valid `w`.
pub fn describe(weights: &[AssetClassWeight]) -> String {
    if weights.len() <= 1 {
        return weights.iter().map(|w| w.name.as_str()).collect();
    }

    weights
        .iter()
        .map(|w| format!("{}:{}", w.name, (w.percentage * dec!(100)).normalize()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Extracts the first number from the text after a colon.
///
/// Only the leading well-formed part of a run like `"12.5.1"` is used.
fn parse_percent(text: &str) -> Option<Decimal> {
    let run = PERCENTAGE_REGEX.find(text)?.as_str();
    if !run.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut parts = run.split('.');
    let whole = parts.next().unwrap_or_default().trim_start_matches('0');
    let fraction = parts.next().unwrap_or_default();
    // Anything with four or more whole digits is above 100, including
    // numbers too large for a Decimal.
    if whole.len() > 3 {
        return Some(Decimal::MAX);
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    let number = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    Decimal::from_str(&number).ok()
}
