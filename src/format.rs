//! Display formatting for ticker values
//!
//! Prices are rendered as Brazilian real (`R$ 65.000,50`) and timestamps with
//! the fixed `dd/MM/yyyy HH:mm:ss` pattern.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol prefixed to every price
const CURRENCY_SYMBOL: &str = "R$";

/// Pattern used for every timestamp on screen
const TIMESTAMP_PATTERN: &str = "%d/%m/%Y %H:%M:%S";

/// Parses a decimal price, accepting plain or scientific notation
pub fn parse_price(last: &str) -> Option<Decimal> {
    let trimmed = last.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Formats a price string as currency
///
/// Returns `None` when `last` is not a decimal number, so the caller can
/// leave the price region untouched.
///
/// Follows the pt-BR currency layout, except that `R$` is followed by an
/// ASCII space, not U+00A0.
///
/// # Examples
/// * `"65000.50"` -> `"R$ 65.000,50"`
/// * `"0.125"` -> `"R$ 0,12"` (half-even rounding)
pub fn format_price(last: &str) -> Option<String> {
    let value = parse_price(last)?;
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    rounded.set_sign_positive(true);
    rounded.rescale(2);
    let plain = rounded.to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    Some(format!(
        "{}{} {},{}",
        if negative { "-" } else { "" },
        CURRENCY_SYMBOL,
        group_thousands(integer),
        fraction
    ))
}

/// Inserts `.` between groups of three digits
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Formats Unix seconds in the local timezone
///
/// Returns `None` for zero, negative or out-of-range timestamps.
pub fn format_timestamp(epoch_seconds: i64) -> Option<String> {
    format_timestamp_in(epoch_seconds, &Local)
}

/// Formats Unix seconds in the given timezone
pub fn format_timestamp_in<Tz>(epoch_seconds: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if epoch_seconds <= 0 {
        return None;
    }
    let datetime = tz.timestamp_opt(epoch_seconds, 0).single()?;
    Some(datetime.format(TIMESTAMP_PATTERN).to_string())
}

/// Maps a non-2xx status code to the message shown to the user
pub fn status_message(code: u16) -> String {
    match code {
        400 => "Bad Request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not Found".to_string(),
        other => format!("Unknown error: {}", other),
    }
}
