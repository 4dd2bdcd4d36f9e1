use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::FineError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 date or date-time.
///
/// Offsets are honoured and converted to UTC. Timestamps without an offset
/// are taken to be UTC already, and a bare date means midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FineError> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| FineError::InvalidTimestamp {
            value: value.to_string(),
            reason: "expected an ISO-8601 date or date-time".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-01-01T05:30:00+05:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parses_naive_datetime_as_utc() {
        let parsed = parse_timestamp("2024-03-10T14:15:16.123456").unwrap();
        assert_eq!(parsed.timestamp(), Utc.with_ymd_and_hms(2024, 3, 10, 14, 15, 16).unwrap().timestamp());

        let spaced = parse_timestamp("2024-03-10 14:15:16").unwrap();
        assert_eq!(spaced, Utc.with_ymd_and_hms(2024, 3, 10, 14, 15, 16).unwrap());
    }

    #[test]
    fn test_parses_bare_date_as_midnight() {
        let parsed = parse_timestamp(" 2024-01-20 ").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        let err = parse_timestamp("01/20/2024").unwrap_err();
        assert!(matches!(err, FineError::InvalidTimestamp { ref value, .. } if value == "01/20/2024"));
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2024-02-30").is_err());
    }
}
