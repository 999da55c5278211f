use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Offset-less formats accepted from booking forms, interpreted as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string into an absolute instant
///
/// RFC 3339 input keeps its offset. Date-times without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
}

/// Render an instant in the machine-sortable form sent to the calendar API
pub fn format_event_time(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        // RFC 3339
        assert_eq!(parse_timestamp("2025-06-01T09:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-01T09:00:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-01T17:00:00+08:00"), Some(expected));
        assert_eq!(parse_timestamp("  2025-06-01T09:00:00Z  "), Some(expected));

        // Without offset
        assert_eq!(parse_timestamp("2025-06-01T09:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-01T09:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-06-01 09:00"), Some(expected));

        // Invalid
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("tomorrow at nine"), None);
        assert_eq!(parse_timestamp("2025-13-01T09:00:00Z"), None);
        assert_eq!(parse_timestamp("2025-06-31T09:00:00Z"), None);
    }

    #[test]
    fn test_format_event_time() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        assert_eq!(format_event_time(&instant), "2025-06-01T09:30:00.000Z");

        // Offsets are normalized before formatting
        let instant = parse_timestamp("2025-06-01T17:30:00+08:00").unwrap();
        assert_eq!(format_event_time(&instant), "2025-06-01T09:30:00.000Z");
    }
}
