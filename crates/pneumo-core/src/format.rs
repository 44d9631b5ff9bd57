//! Locale-independent number and date formatting.
//!
//! Report sentences are compared byte-for-byte, so every helper here renders
//! `.` as the decimal separator regardless of the host locale.

use jiff::tz::TimeZone;
use jiff::Timestamp;

use crate::error::CoreError;

/// Round to `decimals` places (ties to even on the scaled value) and render
/// with exactly `decimals` fractional digits.
///
/// `to_fixed(0.125, 2) == "0.12"`, `to_fixed(12.0, 0) == "12"`.
pub fn to_fixed(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    format!("{rounded:.prec$}", prec = decimals as usize)
}

/// `floor(value * 10^decimals + 0.5) / 10^decimals`.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// [`round_half_up`] rendered with exactly `decimals` fractional digits.
pub fn fixed_half_up(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    format!(
        "{:.prec$}",
        round_half_up(value, decimals),
        prec = decimals as usize
    )
}

/// Shortest round-trip rendering that always carries a fractional part.
///
/// Used where a raw input is echoed back into a report line (`22` → `22.0`).
pub fn display_decimal(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Parse a user-typed decimal. Accepts `,` as the separator; empty or
/// whitespace-only text is `None`, as is anything that is not `-?digits[.digits]`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() || !is_decimal_literal(&cleaned) {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Like [`parse_decimal`] but for a field the caller cannot do without.
pub fn parse_required(field: &str, text: &str) -> Result<f64, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    parse_decimal(text).ok_or_else(|| CoreError::InvalidNumber(text.to_string()))
}

fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next().unwrap_or_default();
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    digits(whole) && digits(frac) && !(whole.is_empty() && frac.is_empty())
}

/// `dd.MM.yyyy HH:mm` in the given time zone.
pub fn format_timestamp(timestamp: Timestamp, tz: &TimeZone) -> String {
    timestamp
        .to_zoned(tz.clone())
        .strftime("%d.%m.%Y %H:%M")
        .to_string()
}

/// [`format_timestamp`] in the system time zone.
pub fn format_timestamp_local(timestamp: Timestamp) -> String {
    format_timestamp(timestamp, &TimeZone::system())
}
