// Timestamp parsing for event input
//
// Clients send either RFC 3339 timestamps or zone-less local date-times
// ("2000-01-01T01:00:00", as produced by the field monitor firmware).
// Zone-less values are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Zone-less formats accepted in addition to RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp string into UTC.
pub fn parse(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let input = input.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(input) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or(rfc3339_err)
}

/// Deserialize an optional timestamp. `null` and a missing field both yield `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_option")]
        timestamp: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let parsed = parse("2000-01-01T03:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2000, 1, 1, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_zoneless_is_utc() {
        let parsed = parse("2000-02-02T02:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2000, 2, 2, 2, 0, 0).unwrap());

        let spaced = parse("2000-02-02 02:00:00").unwrap();
        assert_eq!(spaced, parsed);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let parsed = parse("2000-03-03T03:00:00.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_deserialize_missing_and_null() {
        let missing: Probe = serde_json::from_str("{}").unwrap();
        assert!(missing.timestamp.is_none());

        let null: Probe = serde_json::from_str(r#"{"timestamp": null}"#).unwrap();
        assert!(null.timestamp.is_none());

        let set: Probe = serde_json::from_str(r#"{"timestamp": "2000-01-01T01:00:00"}"#).unwrap();
        assert_eq!(
            set.timestamp,
            Some(Utc.with_ymd_and_hms(2000, 1, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_deserialize_invalid_is_error() {
        let result = serde_json::from_str::<Probe>(r#"{"timestamp": "not a time"}"#);
        assert!(result.is_err());
    }
}
