use rust_decimal::Decimal;

use super::currency_model::CurrencyEntry;

/// Lookup of currency code to multiplier used to normalize position values
/// into the reporting currency.
///
/// Conversion fails open: an unknown, empty or unresolved code converts with
/// a multiplier of 1, so a missing rate costs precision but never blocks
/// aggregation.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyTable<'a> {
    entries: &'a [CurrencyEntry],
}

impl<'a> CurrencyTable<'a> {
    pub fn new(entries: &'a [CurrencyEntry]) -> Self {
        Self { entries }
    }

    /// Case-insensitive lookup of a resolved multiplier.
    pub fn multiplier_for(&self, currency_code: Option<&str>) -> Option<Decimal> {
        let code = currency_code.unwrap_or_default();
        self.entries
            .iter()
            .filter(|entry| entry.code.eq_ignore_ascii_case(code))
            .find_map(|entry| entry.multiplier.value())
    }

    /// Converts `value` into the reporting currency, saturating at the
    /// bounds of `Decimal`.
    pub fn convert(&self, value: Decimal, currency_code: Option<&str>) -> Decimal {
        match self.multiplier_for(currency_code) {
            Some(multiplier) => value.saturating_mul(multiplier),
            None => value,
        }
    }
}
