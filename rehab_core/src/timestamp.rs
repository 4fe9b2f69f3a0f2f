//! Timestamp parsing for request bodies.
//!
//! Accepted forms:
//! - RFC 3339 / ISO 8601 with an offset (`2024-05-01T09:30:00+09:00`, `...Z`)
//! - Naive date-time without an offset, read as UTC (`2024-05-01T09:30:00.123456`)
//! - Bare date, read as midnight UTC (`1990-01-01`)

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

/// Parse any accepted timestamp form into UTC
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = raw.parse::<DateTime<FixedOffset>>() {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` adapter for `DateTime<Utc>` fields
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_converted_to_utc() {
        let parsed = parse("2024-05-01T09:30:00+09:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T00:30:00+00:00");
    }

    #[test]
    fn test_zulu_suffix() {
        assert_eq!(
            parse("2024-05-01T09:30:00Z").unwrap().to_rfc3339(),
            "2024-05-01T09:30:00+00:00"
        );
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        assert_eq!(
            parse("1990-01-01T00:00:00").unwrap().to_rfc3339(),
            "1990-01-01T00:00:00+00:00"
        );
        assert_eq!(
            parse("2024-05-01 09:30:00").unwrap().to_rfc3339(),
            "2024-05-01T09:30:00+00:00"
        );
    }

    #[test]
    fn test_fractional_seconds_kept() {
        let parsed = parse("2024-05-01T09:30:00.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            parse("1990-01-01").unwrap().to_rfc3339(),
            "1990-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse("yesterday").is_none());
        assert!(parse("1990-13-01").is_none());
        assert!(parse("").is_none());
    }
}
