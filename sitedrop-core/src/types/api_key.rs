//! Publishing API key types

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::utils::datetime;

/// Key document: key name -> metadata, ordered by name.
pub type ApiKeyMap = BTreeMap<String, ApiKey>;

/// Issuance and expiry of one publishing key.
///
/// Stored as `{"created_at": "<RFC3339>", "expires_at": "<RFC3339>|permanent"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(with = "datetime")]
    pub created_at: DateTime<Utc>,
    pub expires_at: KeyExpiry,
}

impl ApiKey {
    /// A key is usable while permanent or strictly before its expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            KeyExpiry::Permanent => true,
            KeyExpiry::At(expires_at) => now < expires_at,
        }
    }
}

/// Expiry of a key: a timestamp or the `permanent` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExpiry {
    Permanent,
    At(DateTime<Utc>),
}

const PERMANENT: &str = "permanent";

impl Serialize for KeyExpiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Permanent => serializer.serialize_str(PERMANENT),
            Self::At(dt) => serializer.serialize_str(&datetime::format_timestamp(dt)),
        }
    }
}

impl<'de> Deserialize<'de> for KeyExpiry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == PERMANENT {
            return Ok(Self::Permanent);
        }
        datetime::parse_timestamp(&raw)
            .map(Self::At)
            .map_err(|e| serde::de::Error::custom(format!("Invalid expires_at '{raw}': {e}")))
    }
}

/// Unit of a key lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
}

impl DurationUnit {
    /// `start + amount units`; `None` on overflow. Months follow the calendar
    /// (Jan 31 + 1 month = Feb 28/29).
    #[must_use]
    pub fn add_to(self, start: DateTime<Utc>, amount: u32) -> Option<DateTime<Utc>> {
        match self {
            Self::Days => start.checked_add_signed(TimeDelta::try_days(i64::from(amount))?),
            Self::Weeks => start.checked_add_signed(TimeDelta::try_weeks(i64::from(amount))?),
            Self::Months => start.checked_add_months(Months::new(amount)),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(Self::Days),
            "weeks" => Ok(Self::Weeks),
            "months" => Ok(Self::Months),
            other => Err(CoreError::ValidationError(format!(
                "Unknown duration unit '{other}', expected days, weeks or months"
            ))),
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        })
    }
}

/// Requested lifetime of a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLifetime {
    Permanent,
    For { amount: u32, unit: DurationUnit },
}

/// Validated input of `createKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateKeyRequest {
    pub key: String,
    pub lifetime: KeyLifetime,
}

/// Opaque revision token of the stored key document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(String);

impl Revision {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key document together with the revision it was read at.
///
/// `revision` is `None` when the document does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct VersionedKeys {
    pub keys: ApiKeyMap,
    pub revision: Option<Revision>,
}
