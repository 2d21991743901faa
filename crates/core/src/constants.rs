/// Reserved ticker for uninvested cash
pub const CASH_TICKER: &str = "CASH";

/// Asset class used on screen for positions without an allocation rule
pub const UNKNOWN_ASSET_CLASS: &str = "???";

/// Decimal places kept for asset class percentages (as 0-1 fractions)
pub const PERCENTAGE_PRECISION: u32 = 3;

/// Separator between brokerage and account name in account ids
pub const ACCOUNT_ID_DELIMITER: &str = ":";
