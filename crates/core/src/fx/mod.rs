//! FX module - currency multipliers and value normalization.

mod currency_model;
mod currency_table;

pub use currency_model::{CurrencyEntry, Multiplier};
pub use currency_table::CurrencyTable;
