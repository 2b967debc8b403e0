use anyhow::{bail, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{day_in, same_week};
use crate::model::{Priority, Task};

/// Which priority buckets are active. All false means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityFilter {
    pub low: bool,
    pub medium: bool,
    pub high: bool,
}

impl PriorityFilter {
    pub fn is_active(&self) -> bool {
        self.low || self.medium || self.high
    }

    pub fn contains(&self, priority: Priority) -> bool {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }

    pub fn set(&mut self, priority: Priority, on: bool) {
        match priority {
            Priority::Low => self.low = on,
            Priority::Medium => self.medium = on,
            Priority::High => self.high = on,
        }
    }

    fn labels(&self) -> Vec<&'static str> {
        [
            (Priority::Low, "Low"),
            (Priority::Medium, "Medium"),
            (Priority::High, "High"),
        ]
        .into_iter()
        .filter(|(p, _)| self.contains(*p))
        .map(|(_, label)| label)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBucket {
    Overdue,
    Today,
    ThisWeek,
    Future,
    NoDeadline,
}

impl DeadlineBucket {
    pub const ALL: [DeadlineBucket; 5] = [
        Self::Overdue,
        Self::Today,
        Self::ThisWeek,
        Self::Future,
        Self::NoDeadline,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "this-week" | "thisWeek" => Ok(Self::ThisWeek),
            "future" => Ok(Self::Future),
            "none" => Ok(Self::NoDeadline),
            _ => bail!(
                "invalid deadline bucket '{s}': must be overdue, today, this-week, future, or none"
            ),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::Future => "Future",
            Self::NoDeadline => "No Deadline",
        }
    }

    /// Whether a task with this deadline falls in the bucket, judged on
    /// calendar days in `now`'s time zone.
    pub fn holds<Tz: TimeZone>(self, deadline: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> bool {
        let Some(deadline) = deadline else {
            return self == Self::NoDeadline;
        };
        let tz = now.timezone();
        let today = now.date_naive();
        let day = day_in(deadline, &tz);
        let now_utc = now.with_timezone(&Utc);
        match self {
            Self::NoDeadline => false,
            Self::Overdue => *deadline < now_utc && day != today,
            Self::Today => day == today,
            Self::ThisWeek => same_week(day, today),
            Self::Future => *deadline > now_utc && day != today && !same_week(day, today),
        }
    }
}

/// Which deadline buckets are active. All false means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeadlineFilter {
    pub overdue: bool,
    pub today: bool,
    pub this_week: bool,
    pub future: bool,
    pub none: bool,
}

impl DeadlineFilter {
    pub fn is_active(&self) -> bool {
        DeadlineBucket::ALL.iter().any(|b| self.contains(*b))
    }

    pub fn contains(&self, bucket: DeadlineBucket) -> bool {
        match bucket {
            DeadlineBucket::Overdue => self.overdue,
            DeadlineBucket::Today => self.today,
            DeadlineBucket::ThisWeek => self.this_week,
            DeadlineBucket::Future => self.future,
            DeadlineBucket::NoDeadline => self.none,
        }
    }

    pub fn set(&mut self, bucket: DeadlineBucket, on: bool) {
        match bucket {
            DeadlineBucket::Overdue => self.overdue = on,
            DeadlineBucket::Today => self.today = on,
            DeadlineBucket::ThisWeek => self.this_week = on,
            DeadlineBucket::Future => self.future = on,
            DeadlineBucket::NoDeadline => self.none = on,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = DeadlineBucket> + '_ {
        DeadlineBucket::ALL.into_iter().filter(|b| self.contains(*b))
    }
}

/// Persisted per-workspace filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub priorities: PriorityFilter,
    pub deadlines: DeadlineFilter,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        self.priorities.is_active() || self.deadlines.is_active()
    }

    pub fn matches_priority(&self, task: &Task) -> bool {
        if !self.priorities.is_active() {
            return true;
        }
        task.priority_level()
            .is_some_and(|p| self.priorities.contains(p))
    }

    pub fn matches_deadline<Tz: TimeZone>(&self, task: &Task, now: &DateTime<Tz>) -> bool {
        if !self.deadlines.is_active() {
            return true;
        }
        self.deadlines
            .active()
            .any(|bucket| bucket.holds(task.deadline.as_ref(), now))
    }

    pub fn matches<Tz: TimeZone>(&self, task: &Task, now: &DateTime<Tz>) -> bool {
        self.matches_priority(task) && self.matches_deadline(task, now)
    }

    /// Human-readable summary, e.g. `Priority: Low, High • Deadline: Today`.
    /// `None` when no bucket is active.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        let priorities = self.priorities.labels();
        if !priorities.is_empty() {
            parts.push(format!("Priority: {}", priorities.join(", ")));
        }
        let deadlines: Vec<&str> = self.deadlines.active().map(DeadlineBucket::label).collect();
        if !deadlines.is_empty() {
            parts.push(format!("Deadline: {}", deadlines.join(", ")));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" • "))
        }
    }
}

/// Keep the tasks matching `filters`, preserving order. A missing or
/// inactive filter returns every task.
pub fn apply_filters<Tz: TimeZone>(
    filters: Option<&FilterState>,
    tasks: &[Task],
    now: &DateTime<Tz>,
) -> Vec<Task> {
    match filters {
        Some(f) if f.is_active() => tasks.iter().filter(|t| f.matches(t, now)).cloned().collect(),
        _ => tasks.to_vec(),
    }
}

/// [`apply_filters`] against the local wall clock.
pub fn apply_filters_now(filters: Option<&FilterState>, tasks: &[Task]) -> Vec<Task> {
    apply_filters(filters, tasks, &Local::now())
}
