//! Timestamp input and output for document lifecycle fields.
//!
//! Timestamps are kept at millisecond precision and rendered as
//! `YYYY-MM-DDTHH:MM:SS.sssZ` (`±YYYYY-...` outside years 0 to 9999), so
//! rendering then parsing is lossless.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;

/// Current time, truncated to milliseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render as an ISO-8601 string with millisecond precision.
pub fn to_iso(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Interpret a JSON value as a point in time.
///
/// Accepts RFC 3339 strings (including signed extended years), zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` strings and `YYYY-MM-DD` dates (both read as
/// UTC), and integer epoch milliseconds.
/// Anything else yields `None`.
pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
    let at = match value {
        Value::String(s) => parse_str(s.trim())?,
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?)?,
        _ => return None,
    };
    Some(at.trunc_subsecs(3))
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    if s.starts_with(['+', '-']) {
        return parse_extended(s);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

// `+10000-01-01T00:00:00.000Z`: the date is parsed in a leap year and the
// year swapped in before converting to UTC.
fn parse_extended(s: &str) -> Option<DateTime<Utc>> {
    let (sign, rest) = s.split_at(1);
    let (year, rest) = rest.split_once('-')?;
    if year.len() < 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let year = if sign == "-" { -year } else { year };

    let at = DateTime::parse_from_rfc3339(&format!("2000-{rest}")).ok()?;
    Some(at.with_year(year)?.with_timezone(&Utc))
}

/// Resolve an optional lifecycle input: missing or unusable input becomes now.
pub fn or_now(field: &str, value: Option<&Value>) -> DateTime<Utc> {
    match value {
        None | Some(Value::Null) => now(),
        Some(v) => parse(v).unwrap_or_else(|| {
            tracing::warn!(field, value = %v, "unusable timestamp, defaulting to now");
            now()
        }),
    }
}

/// Resolve the `revoked` input. Falsy input means not revoked, `true` means
/// revoked now, anything else is parsed (unusable input becomes now).
pub fn revoked(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(true) => Some(now()),
        v => Some(or_now("revoked", Some(v))),
    }
}
