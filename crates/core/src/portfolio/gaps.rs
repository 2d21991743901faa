//! Detection of currency codes and tickers that positions reference but the
//! reference collections do not cover yet.
//!
//! Every referenced key gets an unresolved placeholder so the user can fill
//! it in. Placeholders are derived on each change and never persisted.

use std::collections::HashSet;

use crate::accounts::Account;
use crate::allocations::AllocationRule;
use crate::fx::CurrencyEntry;

/// Distinct non-empty currency codes of all positions that are not in
/// `known_codes`, in order of first occurrence.
pub fn missing_currency_codes<S: AsRef<str>>(accounts: &[Account], known_codes: &[S]) -> Vec<String> {
    let referenced = accounts
        .iter()
        .flat_map(|account| account.positions.iter())
        .filter_map(|position| position.currency.as_deref())
        .filter(|code| !code.is_empty());
    missing(referenced, known_codes)
}

/// Distinct tickers of all positions that are not in `known_tickers`, in
/// order of first occurrence.
pub fn missing_allocation_tickers<S: AsRef<str>>(
    accounts: &[Account],
    known_tickers: &[S],
) -> Vec<String> {
    let referenced = accounts
        .iter()
        .flat_map(|account| account.positions.iter())
        .map(|position| position.ticker.as_str());
    missing(referenced, known_tickers)
}

/// Appends an unresolved entry for every referenced code `currencies` lacks.
pub fn fill_currency_gaps(accounts: &[Account], mut currencies: Vec<CurrencyEntry>) -> Vec<CurrencyEntry> {
    let known: Vec<&str> = currencies.iter().map(|c| c.code.as_str()).collect();
    let missing = missing_currency_codes(accounts, &known);
    currencies.extend(missing.iter().map(|code| CurrencyEntry::unresolved(code)));
    currencies
}

/// Appends an unresolved rule for every referenced ticker `rules` lacks.
pub fn fill_allocation_gaps(accounts: &[Account], mut rules: Vec<AllocationRule>) -> Vec<AllocationRule> {
    let known: Vec<&str> = rules.iter().map(|r| r.ticker.as_str()).collect();
    let missing = missing_allocation_tickers(accounts, &known);
    rules.extend(missing.iter().map(|ticker| AllocationRule::unresolved(ticker)));
    rules
}

fn missing<'a, S: AsRef<str>>(
    referenced: impl Iterator<Item = &'a str>,
    known: &[S],
) -> Vec<String> {
    let known: HashSet<&str> = known.iter().map(AsRef::as_ref).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    referenced
        .filter(|key| !known.contains(key) && seen.insert(*key))
        .map(str::to_string)
        .collect()
}
