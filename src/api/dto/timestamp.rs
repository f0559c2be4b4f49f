//! Millisecond-precision timestamp serialization.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Formats a timestamp as `2026-01-01T00:00:00.000Z`.
pub fn to_iso_millis(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter for [`to_iso_millis`].
pub fn iso_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_iso_millis(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_whole_seconds_keep_millis() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_iso_millis(&ts), "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_sub_millisecond_precision_is_truncated() {
        let ts = Utc.timestamp_opt(1_767_225_600, 123_456_789).unwrap();
        assert_eq!(to_iso_millis(&ts), "2026-01-01T00:00:00.123Z");
    }
}
