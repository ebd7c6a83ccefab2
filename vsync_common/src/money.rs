//! Money helpers.
//!
//! Amounts are carried as `f64` while prices are being derived, and rounded half-up to whole cents when they are
//! displayed, persisted or submitted to the storefront.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid currency amount: {0}")]
pub struct MoneyParseError(pub String);

/// Rounds to the nearest cent, with halves rounded up.
///
/// A single `f64::EPSILON` nudge is applied first so that values such as `1.005`, whose binary representation sits a
/// hair below the half-way mark, still round up.
pub fn round_to_cents(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Formats an amount the way Shopify expects prices: a plain decimal string with exactly two decimals.
pub fn format_price(value: f64) -> String {
    format!("{:.2}", round_to_cents(value))
}

/// Parses a decimal currency string, such as Shopify's `"10.00"` price strings, or a modifier value like `"2.5"`.
pub fn parse_price(price: &str) -> Result<f64, MoneyParseError> {
    let trimmed = price.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        return Err(MoneyParseError(price.to_string()));
    }
    let value = trimmed.parse::<f64>().map_err(|e| MoneyParseError(format!("{price}. {e}")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MoneyParseError(price.to_string()))
    }
}
