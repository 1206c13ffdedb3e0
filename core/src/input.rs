//! Query coercion: turns raw, possibly missing or malformed request
//! parameters into a `TransactionInput`.
//!
//! Nothing here fails. Bad values collapse to defaults:
//!   - name      → "Anonymous"
//!   - amount    → 0
//!   - timestamp → now (marked `defaulted` or `invalid`)

use crate::{clock::Clock, types::Amount};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_NAME: &str = "Anonymous";

pub const PARAM_NAME: &str = "name";
pub const PARAM_AMOUNT: &str = "amount";
pub const PARAM_TIMESTAMP: &str = "timestamp";

/// Offset-bearing forms RFC 3339 rejects: minute precision, or a basic
/// `+hhmm` / bare `+hh` offset.
const ZONED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
];

/// Offset-less forms, all read as UTC. Also tried with a trailing `Z` removed.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

// ── Data Structures ──────────────────────────────────────────────────────────

/// Where the evaluated timestamp came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Parsed from the request.
    Provided,
    /// Parameter absent or empty; the clock supplied it.
    Defaulted,
    /// Parameter present but unparseable; the clock supplied it.
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub name: String,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub timestamp_source: TimestampSource,
}

impl TransactionInput {
    /// An already-typed input. The timestamp counts as provided.
    pub fn new(name: impl Into<String>, amount: Amount, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            amount,
            timestamp,
            timestamp_source: TimestampSource::Provided,
        }
    }

    /// Coerce the three optional raw parameters.
    pub fn from_params(
        name: Option<&str>,
        amount: Option<&str>,
        timestamp: Option<&str>,
        clock: &dyn Clock,
    ) -> Self {
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => DEFAULT_NAME.to_string(),
        };

        let amount = amount.map(parse_amount).unwrap_or(0.0);

        let (timestamp, timestamp_source) = match timestamp.map(str::trim) {
            None | Some("") => (clock.now(), TimestampSource::Defaulted),
            Some(raw) => match parse_timestamp(raw) {
                Some(ts) => (ts, TimestampSource::Provided),
                None => {
                    log::warn!("Unparseable timestamp {raw:?}, falling back to now");
                    (clock.now(), TimestampSource::Invalid)
                }
            },
        };

        Self {
            name,
            amount,
            timestamp,
            timestamp_source,
        }
    }

    /// Coerce from decoded query pairs. The first occurrence of a key wins.
    pub fn from_query_pairs(pairs: &[(String, String)], clock: &dyn Clock) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        Self::from_params(
            first(PARAM_NAME),
            first(PARAM_AMOUNT),
            first(PARAM_TIMESTAMP),
            clock,
        )
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse the longest leading numeric prefix of `raw`.
///
/// `"150abc"` is 150, `"1e4"` is 10000, `"abc"` and `""` are 0.
/// NaN and negative zero also come back as 0.
pub fn parse_amount(raw: &str) -> Amount {
    let value = numeric_prefix(raw.trim_start())
        .and_then(|p| p.parse::<f64>().ok())
        .unwrap_or(0.0);

    if value.is_nan() || value == 0.0 {
        0.0
    } else {
        value
    }
}

fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(&s[..end + "Infinity".len()]);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339, ISO-8601 date-times with minute precision or a basic
/// offset, offset-less date-times (read as UTC, optional `Z`) and bare dates
/// (UTC midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ZONED_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
