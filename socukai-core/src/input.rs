//! Money input parsing for form fields and command-line arguments.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Optional `RM` prefix (any case) followed by the amount.
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:rm)?\s*(?P<amount>[-+]?[0-9][0-9,]*(?:\.[0-9]+)?|[-+]?\.[0-9]+)$")
        .expect("valid money regex")
});

/// Largest accepted amount, RM 1,000,000,000,000.
pub const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Error returned when a string is not a usable money amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("invalid amount '{0}'")]
    InvalidNumber(String),

    #[error("amount cannot be negative: '{0}'")]
    Negative(String),

    #[error("amount '{0}' exceeds the maximum of RM 1,000,000,000,000")]
    TooLarge(String),
}

/// Parses a money amount such as `"RM 1,234.56"`.
///
/// Whitespace is trimmed, an `RM` prefix and comma thousands separators are
/// accepted. Empty input is treated as 0. Amounts above [`MAX_MONEY`] are
/// rejected.
///
/// ```
/// use rust_decimal::Decimal;
/// use socukai_core::input::parse_money;
///
/// assert_eq!(parse_money("RM 85,000").unwrap(), Decimal::from(85_000));
/// assert_eq!(parse_money("").unwrap(), Decimal::ZERO);
/// assert!(parse_money("-1").is_err());
/// ```
pub fn parse_money(s: &str) -> Result<Decimal, ParseMoneyError> {
    Ok(parse_optional_money(s)?.unwrap_or(Decimal::ZERO))
}

/// Like [`parse_money`] but maps empty input to `None`.
pub fn parse_optional_money(s: &str) -> Result<Option<Decimal>, ParseMoneyError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(amount) = MONEY.captures(trimmed).and_then(|c| c.name("amount")) else {
        tracing::warn!(input = %s, "invalid money amount");
        return Err(ParseMoneyError::InvalidNumber(s.to_string()));
    };

    let value: Decimal = amount.as_str().replace(',', "").parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid money amount: {}", e);
        ParseMoneyError::InvalidNumber(s.to_string())
    })?;

    if value < Decimal::ZERO {
        return Err(ParseMoneyError::Negative(s.to_string()));
    }
    if value > MAX_MONEY {
        tracing::warn!(input = %s, "money amount above maximum");
        return Err(ParseMoneyError::TooLarge(s.to_string()));
    }
    // "-0" parses to a negative zero
    Ok(Some(value.abs()))
}
