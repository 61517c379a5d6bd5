//! Price parsing, coercion and formatting.
//!
//! Prices are plain `f64` amounts. User input is validated strictly when a
//! custom drink is created, while persisted prices are decoded leniently so a
//! single damaged value cannot wipe an entire order log.

use std::num::FpCategory;

use serde::{Deserialize, Deserializer};

use crate::error::CommandError;

/// Parses user-entered price text into a non-negative finite amount.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`CommandError::InvalidPrice`] when the text is not a finite real
/// number and [`CommandError::NegativePrice`] when it is below zero.
///
/// # Examples
///
/// ```
/// use bar_tab::{CommandError, parse_price};
///
/// assert_eq!(parse_price(" 2.50 "), Ok(2.5));
/// assert!(matches!(parse_price("abc"), Err(CommandError::InvalidPrice { .. })));
/// assert!(matches!(parse_price("-1"), Err(CommandError::NegativePrice { .. })));
/// ```
pub fn parse_price(text: &str) -> Result<f64, CommandError> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| CommandError::InvalidPrice {
            input: trimmed.to_owned(),
        })?;
    match value.classify() {
        FpCategory::Zero => Ok(0.0),
        _ if value.is_sign_negative() => Err(CommandError::NegativePrice {
            input: trimmed.to_owned(),
        }),
        _ => Ok(value),
    }
}

/// Coerces non-finite amounts to zero so they never poison a total.
///
/// Negative zero also collapses to positive zero.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    match value.classify() {
        FpCategory::Nan | FpCategory::Infinite | FpCategory::Zero => 0.0,
        FpCategory::Subnormal | FpCategory::Normal => value,
    }
}

/// Formats an amount with exactly two decimals.
///
/// Non-finite amounts and negative zero render as `0.00`.
///
/// ```
/// use bar_tab::format_amount;
///
/// assert_eq!(format_amount(3.5), "3.50");
/// assert_eq!(format_amount(f64::NAN), "0.00");
/// assert_eq!(format_amount(-0.0), "0.00");
/// ```
#[must_use]
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", finite_or_zero(value))
}

/// Equality key for a price: signed zeros collapse and every NaN is equal.
pub(crate) fn price_key(value: f64) -> u64 {
    match value.classify() {
        FpCategory::Zero => 0,
        FpCategory::Nan => f64::NAN.to_bits(),
        FpCategory::Infinite | FpCategory::Subnormal | FpCategory::Normal => value.to_bits(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Stand-in for a stored record whose price is absent.
pub(crate) const fn missing_price() -> f64 {
    f64::NAN
}

/// Decodes a stored price, mapping anything unusable to NaN.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawPrice::deserialize(deserializer)?;
    Ok(match raw {
        RawPrice::Number(value) => value,
        RawPrice::Text(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        RawPrice::Other(_) => f64::NAN,
    })
}
