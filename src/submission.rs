//! Submission record and raw form values
//!
//! Persisted as a JSON array in LocalStorage, one object per accepted form
//! submission.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Values read from the form at submit time, already trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl FormValues {
    /// Trim all four raw values
    pub fn new(name: &str, email: &str, phone: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// True if every field has content
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && !self.phone.is_empty()
            && !self.message.is_empty()
    }
}

/// A single accepted contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    /// As typed (trimmed), separators kept
    pub phone: String,
    pub message: String,
    /// Creation time, ISO-8601 with millisecond precision
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl Submission {
    /// Build a record from validated form values.
    ///
    /// The timestamp is truncated to milliseconds so the stored text
    /// round-trips to an equal value.
    pub fn new(values: FormValues, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: values.name,
            email: values.email,
            phone: values.phone,
            message: values.message,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}

/// `2024-05-01T10:20:30.123Z`, the same text `Date.toISOString()` produces
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
