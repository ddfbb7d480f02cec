//! Locale-aware numeric and duration parsing.
//!
//! Documents print money the pt-BR way (`1.234,56`) and durations as `HH:MM`.
//! Both parsers degrade to zero instead of failing: documents are noisy and a
//! partial record is still useful.

use rust_decimal::Decimal;
use std::str::FromStr;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Parses a pt-BR formatted number.
///
/// Thousands separators (`.`) are removed and the decimal comma becomes a
/// point. Empty or unparsable input yields zero.
///
/// # Examples
///
/// ```
/// use payroll_import::extraction::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal("1.234,56"), Decimal::new(123456, 2));
/// assert_eq!(parse_decimal("800,00"), Decimal::from(800));
/// assert_eq!(parse_decimal(""), Decimal::ZERO);
/// assert_eq!(parse_decimal("n/a"), Decimal::ZERO);
/// ```
pub fn parse_decimal(raw: &str) -> Decimal {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(cleaned).unwrap_or(Decimal::ZERO)
}

/// Converts captured hour and minute groups into decimal hours.
///
/// Unparsable parts count as zero, so the result is never negative.
///
/// # Examples
///
/// ```
/// use payroll_import::extraction::parse_duration;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_duration("08", "30"), Decimal::new(85, 1));
/// assert_eq!(parse_duration("10", "00"), Decimal::from(10));
/// ```
pub fn parse_duration(hours: &str, minutes: &str) -> Decimal {
    let hours = hours.trim().parse::<u32>().unwrap_or(0);
    let minutes = minutes.trim().parse::<u32>().unwrap_or(0);
    Decimal::from(hours) + Decimal::from(minutes) / MINUTES_PER_HOUR
}

/// Parses a plain integer count (`3` absences). Unparsable input yields zero.
pub fn parse_count(raw: &str) -> Decimal {
    raw.trim()
        .parse::<u32>()
        .map(Decimal::from)
        .unwrap_or(Decimal::ZERO)
}

/// Trims a captured name and collapses internal whitespace runs.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
