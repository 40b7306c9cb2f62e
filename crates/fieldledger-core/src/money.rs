//! Money coercion and display formatting.
//!
//! The backend is inconsistent about amount types: the same field may arrive
//! as a JSON number, a numeric string (sometimes with thousands separators),
//! or be missing entirely. Everything is coerced to whole `i64` units at the
//! decode boundary so display code never has to deal with junk values.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a raw JSON value into a whole-unit amount.
///
/// Numbers are truncated toward zero, numeric strings are parsed after
/// stripping thousands separators, and anything else becomes 0.
pub fn coerce_amount(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Serde adapter for amount fields. Used with `deserialize_with` on wire
/// schemas so a malformed amount decodes to 0 instead of failing the record.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&raw))
}

/// Formats an amount with thousands separators, e.g. `1234567` -> `1,234,567`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats an amount prefixed with a currency code, e.g. `UGX 1,234,567`.
///
/// An empty currency code renders the bare grouped amount.
pub fn format_currency(amount: i64, currency: &str) -> String {
    let code = currency.trim();
    if code.is_empty() {
        format_amount(amount)
    } else {
        format!("{code} {}", format_amount(amount))
    }
}
