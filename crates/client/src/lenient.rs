//! Lenient field decoding.
//!
//! The API is inconsistent about scalar encodings: amounts come as numbers or
//! numeric strings, dates as plain dates or timestamps, references as strings
//! or integers. Unusable values decode to `None` rather than failing the item;
//! the aggregation engine reports records left without amount or date.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses a decimal from a JSON number or a numeric string.
///
/// Strings may carry spaces, a currency symbol and either mark as the
/// decimal separator: `"1 234,50 $"`, `"$1,234.50"` and `"1.234,50"` all
/// read as `1234.50`. A lone comma followed by three digits (`"1,234"`) is
/// ambiguous and reads as `None`.
#[must_use]
pub fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(&normalize_amount(s)?).ok(),
        _ => None,
    }
}

/// Rewrites a human-formatted amount with `.` as the only separator.
fn normalize_amount(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();

    let decimal_mark = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                ','
            } else {
                '.'
            }
        }
        (Some(_), None) => {
            let groups: Vec<&str> = cleaned.split(',').collect();
            let fraction = groups.last()?;
            if groups.len() == 2 && (1..=2).contains(&fraction.len()) {
                ','
            } else if groups.len() > 2 && groups[1..].iter().all(|g| g.len() == 3) {
                return Some(cleaned.replace(',', ""));
            } else {
                return None;
            }
        }
        _ => return Some(cleaned),
    };

    let grouping = if decimal_mark == ',' { '.' } else { ',' };
    let (integer, fraction) = cleaned.rsplit_once(decimal_mark)?;
    if fraction.contains(grouping) || integer.contains(decimal_mark) {
        return None;
    }
    Some(format!("{}.{fraction}", integer.replace(grouping, "")))
}

/// Parses a date from `YYYY-MM-DD`, an RFC 3339 timestamp or a naive
/// `YYYY-MM-DDTHH:MM:SS` timestamp.
#[must_use]
pub fn date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.date())
}

/// Reads a string, accepting numbers; blank strings become `None`.
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `deserialize_with` adapter for optional decimals.
pub fn opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(decimal))
}

/// `deserialize_with` adapter for optional dates.
pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(date))
}

/// `deserialize_with` adapter for optional strings.
pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(text))
}

/// `deserialize_with` adapter for optional ids given as strings or integers.
pub fn opt_id<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(opt_text(d)?.map(T::from))
}
