//! Optional timestamp serde helpers.
//!
//! - Serialize: `Option<DateTime<Utc>>` -> RFC3339 string or `null`
//! - Deserialize: RFC3339 string or Unix timestamp (seconds or milliseconds)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `Option<DateTime<Utc>>` as an optional RFC3339 string.
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserializes an RFC3339 string or a Unix timestamp.
///
/// Vercel reports `createdAt` in milliseconds, GitHub uses RFC3339.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// Values above 10^11 are treated as milliseconds.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, with = "super")]
        at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[test]
    fn millis_timestamp() {
        let w: Wrapper = serde_json::from_str(r#"{"at":1700000000000}"#).unwrap();
        assert_eq!(w.at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn rfc3339_string() {
        let w: Wrapper = serde_json::from_str(r#"{"at":"2024-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(w.at.unwrap().timestamp(), 1_714_557_600);
    }

    #[test]
    fn null_and_missing() {
        let w: Wrapper = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(w.at.is_none());
        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert!(w.at.is_none());
    }
}
