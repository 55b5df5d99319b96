// src/utils/time.rs

//! Lenient timestamp parsing for API payloads.
//!
//! The server emits ISO 8601 with or without an offset, and the editor
//! sometimes stores a bare date. Everything is normalized to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a timestamp; `None` for empty or unrecognized input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter: `Option<DateTime<Utc>>` from a nullable, lenient string.
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-02-01T10:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_timestamp("2024-02-01T10:00:00.123456").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(
            parse_timestamp("2024-02-01T10:00"),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_bare_date() {
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
