//! Canonical timestamp handling.
//!
//! Invitation timestamps travel as second-precision RFC 3339 UTC strings
//! (`2026-08-23T10:00:00Z`). The form is fixed-width, so lexicographic order
//! equals chronological order; backends rely on that for index keys.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Truncate to whole seconds so the canonical string form round-trips.
pub fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}

/// Render the canonical wire/index form.
pub fn to_canonical(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse the canonical form back, normalizing any RFC 3339 offset to UTC.
pub fn from_canonical(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapter for the canonical form, for `#[serde(with = ...)]` fields.
pub mod canonical {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_canonical(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::from_canonical(&s).map_err(de::Error::custom)
    }
}
