//! Unit normalization and display formatting.
//!
//! On-chain amounts are fixed-point integers scaled by 10^18 ("wei") and
//! arrive as decimal strings; timestamps arrive as unix-second strings.
//! This module turns them into `f64` display values and [`DateTime<Utc>`].
//! Precision loss beyond 2^53 is accepted: these values are for display,
//! never for settlement. Rounding happens only in the `format_*` helpers.

use chrono::{DateTime, Utc};

/// Placeholder rendered for timestamps that could not be read.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

const WEI_PER_UNIT: f64 = 1e18;

/// Failure to read a raw numeric or timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// The value was missing or empty.
    #[error("value is empty")]
    Empty,
    /// The value is not a finite decimal number.
    #[error("not a decimal number: {0:?}")]
    InvalidNumber(String),
    /// The value is not a representable unix timestamp.
    #[error("not a unix timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Parses a decimal string strictly, rejecting empty, non-numeric, and
/// non-finite (`NaN`, `inf`) input.
///
/// # Errors
///
/// Returns [`UnitError::Empty`] for blank input and
/// [`UnitError::InvalidNumber`] for anything that is not a finite number.
pub fn parse_decimal_strict(raw: &str) -> Result<f64, UnitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }
    // `f64::from_str` accepts "inf" and "NaN"; the indexer never emits them.
    let starts_numeric = trimmed
        .trim_start_matches(['-', '+'])
        .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if !starts_numeric {
        return Err(UnitError::InvalidNumber(raw.to_string()));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(UnitError::InvalidNumber(raw.to_string())),
    }
}

/// Parses a wei-scale string into display units (`value / 10^18`).
///
/// # Errors
///
/// Same as [`parse_decimal_strict`].
pub fn parse_wei(raw: &str) -> Result<f64, UnitError> {
    parse_decimal_strict(raw).map(|value| value / WEI_PER_UNIT)
}

/// Infallible wei normalization: missing or empty input is `0`, and
/// malformed input is logged and read as `0`.
#[must_use]
pub fn normalize_wei(raw: Option<&str>) -> f64 {
    lenient(raw, parse_wei)
}

/// Infallible unscaled decimal parse with the same fallback rules as
/// [`normalize_wei`]. Used for raw vote tallies.
#[must_use]
pub fn parse_decimal(raw: Option<&str>) -> f64 {
    lenient(raw, parse_decimal_strict)
}

fn lenient(raw: Option<&str>, parse: fn(&str) -> Result<f64, UnitError>) -> f64 {
    match raw.map(parse) {
        None | Some(Err(UnitError::Empty)) => 0.0,
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "malformed numeric value, using 0");
            0.0
        }
    }
}

/// Parses a unix-seconds string strictly.
///
/// # Errors
///
/// Returns [`UnitError::Empty`] for blank input and
/// [`UnitError::InvalidTimestamp`] when the value is not an integer number
/// of seconds within chrono's representable range.
pub fn parse_unix_seconds_strict(raw: &str) -> Result<DateTime<Utc>, UnitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| UnitError::InvalidTimestamp(raw.to_string()))
}

/// Converts a unix-seconds string into a time value; anything unreadable
/// is "unknown" (`None`).
#[must_use]
pub fn parse_unix_seconds(raw: Option<&str>) -> Option<DateTime<Utc>> {
    match parse_unix_seconds_strict(raw?) {
        Ok(ts) => Some(ts),
        Err(err) => {
            tracing::debug!(error = %err, "unreadable timestamp");
            None
        }
    }
}

/// Formats a display amount with thousands separators and a fixed number
/// of fraction digits, e.g. `1234.5` → `"1,234.50"`.
#[must_use]
pub fn format_amount(value: f64, fraction_digits: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.*}", fraction_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let mut out = String::with_capacity(grouped.len() + fraction_digits + 2);
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats a percentage with one decimal place, e.g. `65.0%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.1}%")
}

/// Formats a timestamp for display, or the [`UNKNOWN_PLACEHOLDER`].
#[must_use]
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || UNKNOWN_PLACEHOLDER.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}
