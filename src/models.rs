// Data models for tasklist

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item
///
/// Field names serialize in camelCase (`createdAt`) and instants as ISO-8601
/// strings with millisecond precision, so a stored collection reads the same
/// as one written by a browser's `JSON.stringify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "iso_millis::option")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub important: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh, pending, non-important task
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            deadline,
            completed: false,
            important: false,
            created_at,
        }
    }

    /// True if the deadline is set and already passed at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        crate::display::is_overdue(self.deadline, now)
    }
}

/// Source of the current instant
///
/// Any `Fn() -> DateTime<Utc>` is a clock, which lets tests pin time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Serde adapter: `DateTime<Utc>` <-> `2024-01-01T09:30:00.000Z`
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
