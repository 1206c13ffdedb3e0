//! Serialization helpers for the report's JSON shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Largest magnitude at which every integral f64 is exactly an i64.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Serialize an amount as a JSON integer when it has no fractional part,
/// as a float otherwise, and as `null` when it is not finite.
pub fn serialize_amount<S>(val: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !val.is_finite() {
        s.serialize_none()
    } else if val.fract() == 0.0 && val.abs() <= EXACT_INT_LIMIT {
        s.serialize_i64(*val as i64)
    } else {
        s.serialize_f64(*val)
    }
}

/// Serialize a UTC instant as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn serialize_millis<S>(val: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&val.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Render an amount for human-readable messages: `15000`, `12.5`, `Infinity`.
pub fn display_amount(val: f64) -> String {
    if val.is_infinite() {
        if val > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else {
        format!("{val}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "serialize_amount")]
        amount: f64,
    }

    fn render(amount: f64) -> String {
        serde_json::to_string(&Wrapper { amount }).unwrap()
    }

    #[test]
    fn whole_amounts_have_no_decimal_point() {
        assert_eq!(render(15000.0), r#"{"amount":15000}"#);
        assert_eq!(render(0.0), r#"{"amount":0}"#);
        assert_eq!(render(-20.0), r#"{"amount":-20}"#);
        assert_eq!(render(12.5), r#"{"amount":12.5}"#);
        assert_eq!(render(f64::INFINITY), r#"{"amount":null}"#);
    }

    #[test]
    fn display_matches_message_format() {
        assert_eq!(display_amount(9999.0), "9999");
        assert_eq!(display_amount(0.5), "0.5");
        assert_eq!(display_amount(f64::INFINITY), "Infinity");
    }
}
