use anyhow::{bail, Result};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// A task as delivered by the remote API. Read-only from this crate's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// 1 = low, 2 = medium, 3 = high. Other values are kept as-is.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Only the time-of-day of this timestamp is meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "categoryID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<String>,
}

impl Task {
    pub fn priority_level(&self) -> Option<Priority> {
        Priority::from_level(self.priority)
    }

    /// Start time-of-day as seen in `tz`.
    pub fn start_time_of_day<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveTime> {
        self.start_time.map(|t| t.with_timezone(tz).time())
    }

    /// Returns display icon for the priority: ! high, - medium, . low
    pub fn icon(&self) -> &'static str {
        match self.priority_level() {
            Some(Priority::High) => "!",
            Some(Priority::Medium) => "-",
            Some(Priority::Low) => ".",
            None => "?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => bail!("invalid priority '{s}': must be low, medium, or high"),
        }
    }

    pub fn level(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderType {
    /// Offset from a task field.
    Relative,
    /// Anchored to an explicit date and time.
    Absolute,
}

/// A candidate notification trigger. Persisting, deduplicating and firing
/// it, and flipping `sent`, belong to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub trigger_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ReminderType,
    pub sent: bool,
    pub after_start: bool,
    pub before_start: bool,
    pub before_deadline: bool,
    pub after_deadline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default)]
    pub vibration: bool,
}

impl Reminder {
    /// A reminder with every phase flag cleared and `sent == false`.
    pub fn new(trigger_time: DateTime<Utc>, kind: ReminderType) -> Self {
        Reminder {
            trigger_time,
            kind,
            sent: false,
            after_start: false,
            before_start: false,
            before_deadline: false,
            after_deadline: false,
            custom_message: None,
            sound: None,
            vibration: false,
        }
    }
}
