//! Timestamp parsing and wire formatting
//!
//! Every timestamp in the API is a naive date-time rendered without an
//! offset, e.g. `2024-05-15T00:00:00`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

/// Wire format for all timestamps
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed timestamp, remembering whether the input carried a time part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// Input was a bare calendar date (`2024-05-15`)
    Date(NaiveDate),
    /// Input carried a time of day
    DateTime(NaiveDateTime),
}

impl ParsedDate {
    /// Midnight for bare dates, the value itself otherwise
    pub fn start(self) -> NaiveDateTime {
        match self {
            ParsedDate::Date(date) => date.and_time(NaiveTime::MIN),
            ParsedDate::DateTime(dt) => dt,
        }
    }

    /// Last representable instant of the day for bare dates, the value itself otherwise
    pub fn end(self) -> NaiveDateTime {
        match self {
            ParsedDate::Date(date) => date
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .unwrap_or_else(|| date.and_time(NaiveTime::MIN)),
            ParsedDate::DateTime(dt) => dt,
        }
    }
}

/// Parse a user-supplied date or date-time
///
/// RFC 3339 values with an offset are normalized to UTC.
pub fn parse(input: &str) -> Option<ParsedDate> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(ParsedDate::DateTime(dt.with_timezone(&Utc).naive_utc()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ParsedDate::DateTime(dt));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(ParsedDate::Date)
}

/// Current UTC time at the precision the API exposes
pub fn now() -> NaiveDateTime {
    truncate(Utc::now().naive_utc())
}

/// Drop sub-second precision
pub fn truncate(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Render a timestamp in [`WIRE_FORMAT`]
pub fn format(dt: &NaiveDateTime) -> String {
    dt.format(WIRE_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` fields
pub mod wire {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw)
            .map(|parsed| parsed.start())
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields
pub mod wire_option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        dt: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(|parsed| Some(parsed.start()))
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw))),
            None => Ok(None),
        }
    }
}
