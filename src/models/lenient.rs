//! Tolerant field decoders for records written by other pages.
//!
//! Stored blobs carry no schema: numbers show up as strings, strings as
//! numbers, and any field may be `null`. These helpers coerce what is
//! unambiguous and default the rest.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any scalar rendered as text; `null`/missing/containers become `""`.
pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(d)?).unwrap_or_default())
}

/// Like [`string`] but empty and `null` collapse to `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(d)?).filter(|s| !s.is_empty()))
}

/// Numeric value; numeric strings are parsed, anything else is `0`.
pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let n = match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if n.is_finite() { n } else { 0.0 })
}

/// Integer value, truncating fractions; non-numeric becomes `None`.
pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(&s),
        _ => None,
    })
}

fn scalar_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the leading base-10 integer of `input`, ignoring leading whitespace
/// and any trailing garbage (`"15%"` is 15, `"abc"` is `None`).
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_accepts_leading_digits() {
        assert_eq!(parse_int_prefix("15"), Some(15));
        assert_eq!(parse_int_prefix("  50 €"), Some(50));
        assert_eq!(parse_int_prefix("12.9"), Some(12));
        assert_eq!(parse_int_prefix("-3x"), Some(-3));
    }

    #[test]
    fn int_prefix_rejects_non_numeric() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        sales: f64,
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "string")]
        name: String,
    }

    #[test]
    fn coerces_mixed_scalars() {
        let p: Probe = serde_json::from_str(r#"{"sales":"120.5","id":7,"name":null}"#).unwrap();
        assert_eq!(p.sales, 120.5);
        assert_eq!(p.id.as_deref(), Some("7"));
        assert_eq!(p.name, "");

        let p: Probe = serde_json::from_str(r#"{"sales":true,"id":""}"#).unwrap();
        assert_eq!(p.sales, 0.0);
        assert!(p.id.is_none());
    }
}
