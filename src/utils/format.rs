// src/utils/format.rs

//! Price and date formatting for listing cards.

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

/// Label used when a record carries no usable date.
pub const RECENTLY: &str = "Recently";

/// Largest amount grouped digit by digit; beyond it cents are no longer
/// exact in an `f64`.
const MAX_GROUPED_AMOUNT: f64 = 1e15;

/// Amounts written as text, optionally with thousands separators.
static NUMERIC_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d[\d,]*(\.\d+)?$").expect("numeric pattern is valid"));

/// Currency formatting rules.
#[derive(Debug, Clone)]
pub struct PriceFormat<'a> {
    pub symbol: &'a str,
    pub indian_grouping: bool,
}

impl PriceFormat<'_> {
    /// Format a price field.
    ///
    /// Numbers and numeric strings become `"<symbol> <grouped amount>"`,
    /// other text passes through unchanged, and a missing value yields
    /// `missing`.
    pub fn format(&self, value: Option<&Value>, missing: &str) -> String {
        match value {
            Some(Value::Number(n)) => n
                .as_f64()
                .and_then(|amount| self.amount(amount))
                .unwrap_or_else(|| format!("{} {}", self.symbol, n)),
            Some(Value::String(s)) => {
                let text = s.trim();
                if text.is_empty() {
                    return missing.to_string();
                }
                if NUMERIC_TEXT.is_match(text) {
                    if let Some(formatted) = text
                        .replace(',', "")
                        .parse::<f64>()
                        .ok()
                        .and_then(|amount| self.amount(amount))
                    {
                        return formatted;
                    }
                }
                text.to_string()
            }
            _ => missing.to_string(),
        }
    }

    fn amount(&self, amount: f64) -> Option<String> {
        let grouped = group_amount(amount, self.indian_grouping)?;
        Some(format!("{} {}", self.symbol, grouped))
    }
}

/// Render an amount with digit grouping and at most two decimals.
///
/// Returns `None` for amounts too large (or not finite) to group exactly.
pub fn group_amount(amount: f64, indian: bool) -> Option<String> {
    if !amount.is_finite() || amount.abs() > MAX_GROUPED_AMOUNT {
        return None;
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let grouped = if indian {
        group_indian(&whole)
    } else {
        group_by(&whole, 3)
    };

    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction > 0 {
        let decimals = format!("{fraction:02}");
        out.push('.');
        out.push_str(decimals.trim_end_matches('0'));
    }
    Some(out)
}

fn group_by(digits: &str, size: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 12,34,567: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{},{}", group_by(head, 2), tail)
}

/// Parse the timestamp shapes the backend emits: RFC 3339, naive
/// date-times, plain dates, or epoch milliseconds.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    text.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

/// Format a timestamp with a chrono format string, or `"Recently"`.
pub fn format_date(timestamp: Option<DateTime<Utc>>, pattern: &str) -> String {
    let Some(t) = timestamp else {
        return RECENTLY.to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", t.format(pattern)) {
        Ok(()) => out,
        Err(_) => {
            log::debug!("Invalid date format pattern {:?}", pattern);
            t.format("%Y-%m-%d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const RUPEE: PriceFormat<'static> = PriceFormat {
        symbol: "₹",
        indian_grouping: true,
    };

    #[test]
    fn test_number_price() {
        assert_eq!(RUPEE.format(Some(&json!(1500)), "Not provided"), "₹ 1,500");
        assert_eq!(RUPEE.format(Some(&json!(250)), "Not provided"), "₹ 250");
        assert_eq!(RUPEE.format(Some(&json!(99.5)), "Not provided"), "₹ 99.5");
    }

    #[test]
    fn test_numeric_string_price() {
        assert_eq!(RUPEE.format(Some(&json!(" 12000 ")), "Not provided"), "₹ 12,000");
        assert_eq!(RUPEE.format(Some(&json!("1,500")), "Not provided"), "₹ 1,500");
    }

    #[test]
    fn test_text_price_passes_through() {
        assert_eq!(RUPEE.format(Some(&json!("Free")), "Not provided"), "Free");
        assert_eq!(
            RUPEE.format(Some(&json!("500/month")), "Not provided"),
            "500/month"
        );
    }

    #[test]
    fn test_missing_price() {
        assert_eq!(RUPEE.format(None, "Not provided"), "Not provided");
        assert_eq!(RUPEE.format(Some(&Value::Null), "Not provided"), "Not provided");
        assert_eq!(RUPEE.format(Some(&json!("")), "Not provided"), "Not provided");
    }

    #[test]
    fn test_grouping_styles() {
        assert_eq!(group_amount(1234567.0, true).unwrap(), "12,34,567");
        assert_eq!(group_amount(1234567.0, false).unwrap(), "1,234,567");
        assert_eq!(group_amount(100000.0, true).unwrap(), "1,00,000");
        assert_eq!(group_amount(999.0, true).unwrap(), "999");
        assert_eq!(group_amount(-4500.25, false).unwrap(), "-4,500.25");
    }

    #[test]
    fn test_huge_amounts_are_not_grouped() {
        assert_eq!(group_amount(1e20, true), None);
        assert_eq!(group_amount(f64::NAN, true), None);

        let text = "123456789012345678901234";
        assert_eq!(RUPEE.format(Some(&json!(text)), "Not provided"), text);

        let huge = json!(u64::MAX);
        assert_eq!(
            RUPEE.format(Some(&huge), "Not provided"),
            "₹ 18446744073709551615"
        );
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        assert!(parse_timestamp("2026-03-01T10:15:00.000Z").is_some());
        assert!(parse_timestamp("2026-03-01T10:15:00").is_some());
        assert!(parse_timestamp("2026-03-01").is_some());
        assert_eq!(
            parse_timestamp("1767225600000"),
            DateTime::from_timestamp_millis(1_767_225_600_000)
        );
        assert!(parse_timestamp("next week").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_format_date() {
        let t = parse_timestamp("2026-03-01T10:15:00Z");
        assert_eq!(format_date(t, "%d/%m/%Y"), "01/03/2026");
        assert_eq!(format_date(None, "%d/%m/%Y"), "Recently");
    }
}
