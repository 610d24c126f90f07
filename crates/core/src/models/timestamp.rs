//! Wire format for history timestamps.
//!
//! The app writes instants the way `Date.toISOString()` does
//! (`2024-01-01T00:00:00.000Z`) and the widget parses them with fractional
//! seconds required. Both sides live in different processes and may be built
//! separately, so this format is part of the shared contract.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Length of `YYYY-MM-DDTHH:MM:SS`; a strict timestamp has `.` right after it.
const SECONDS_END: usize = 19;

/// Format an instant as UTC ISO-8601 with millisecond precision.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 / RFC 3339 timestamp that carries fractional seconds.
///
/// Returns `None` for anything else, including otherwise valid timestamps
/// without a fraction (`2024-01-01T00:00:00Z`). Offsets are normalized to UTC.
pub fn parse_strict(raw: &str) -> Option<DateTime<Utc>> {
    let bytes = raw.as_bytes();
    if bytes.len() <= SECONDS_END + 1 || bytes[SECONDS_END] != b'.' {
        return None;
    }
    if !bytes[SECONDS_END + 1].is_ascii_digit() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapter: `#[serde(with = "crate::models::timestamp")]`.
pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_strict(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("Invalid date format: {raw}")))
}
