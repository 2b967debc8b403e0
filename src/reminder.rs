//! Reminder trigger computation.
//!
//! Everything here is pure: no clock reads, no I/O. An absent anchor field
//! yields `None`, never an error.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Days, Duration, NaiveTime, Offset, TimeZone, Utc};

use crate::model::{Reminder, ReminderType, Task};

/// Lead times for the built-in reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub deadline_lead: Duration,
    pub start_lead: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        ReminderPolicy {
            deadline_lead: Duration::hours(1),
            start_lead: Duration::minutes(15),
        }
    }
}

impl ReminderPolicy {
    /// RELATIVE reminder `deadline_lead` before the deadline.
    pub fn deadline_reminder<Tz: TimeZone>(&self, deadline: Option<&DateTime<Tz>>) -> Option<Reminder> {
        let deadline = deadline?.with_timezone(&Utc);
        let mut reminder = Reminder::new(earlier(deadline, self.deadline_lead), ReminderType::Relative);
        reminder.before_deadline = true;
        Some(reminder)
    }

    /// RELATIVE reminder `start_lead` before the scheduled start.
    pub fn start_time_reminder<Tz: TimeZone>(
        &self,
        start_date: Option<&DateTime<Tz>>,
        start_time: Option<NaiveTime>,
    ) -> Option<Reminder> {
        let base = start_instant(start_date?, start_time);
        let mut reminder = Reminder::new(earlier(base, self.start_lead), ReminderType::Relative);
        reminder.before_start = true;
        Some(reminder)
    }
}

/// Reminder one hour before `deadline`.
pub fn deadline_reminder<Tz: TimeZone>(deadline: Option<&DateTime<Tz>>) -> Option<Reminder> {
    ReminderPolicy::default().deadline_reminder(deadline)
}

/// ABSOLUTE reminder at the start date, moved to `start_time` if given.
pub fn start_date_reminder<Tz: TimeZone>(
    start_date: Option<&DateTime<Tz>>,
    start_time: Option<NaiveTime>,
) -> Option<Reminder> {
    let at = start_instant(start_date?, start_time);
    Some(Reminder::new(at, ReminderType::Absolute))
}

/// Reminder fifteen minutes before the scheduled start.
pub fn start_time_reminder<Tz: TimeZone>(
    start_date: Option<&DateTime<Tz>>,
    start_time: Option<NaiveTime>,
) -> Option<Reminder> {
    ReminderPolicy::default().start_time_reminder(start_date, start_time)
}

/// Calendar date of `date` (in its own zone) at `time`.
///
/// A wall-clock time skipped by a DST transition is resolved with the
/// offset `date` itself carries.
pub fn combine_date_and_time<Tz: TimeZone>(date: &DateTime<Tz>, time: NaiveTime) -> DateTime<Utc> {
    let local = date.date_naive().and_time(time);
    if let Some(t) = date.timezone().from_local_datetime(&local).earliest() {
        return t.with_timezone(&Utc);
    }
    date.offset()
        .fix()
        .from_local_datetime(&local)
        .single()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| date.with_timezone(&Utc))
}

fn start_instant<Tz: TimeZone>(start_date: &DateTime<Tz>, start_time: Option<NaiveTime>) -> DateTime<Utc> {
    match start_time {
        Some(time) => combine_date_and_time(start_date, time),
        None => start_date.with_timezone(&Utc),
    }
}

fn earlier(t: DateTime<Utc>, lead: Duration) -> DateTime<Utc> {
    t.checked_sub_signed(lead).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Task field a relative reminder is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadUnit {
    Minutes,
    Hours,
    Days,
}

/// A user-chosen relative reminder such as "30 minutes before start".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeSpec {
    pub amount: u32,
    pub unit: LeadUnit,
    pub direction: Direction,
    pub anchor: Anchor,
}

impl RelativeSpec {
    /// Parse `"<amount><m|h|d> <before|after> <start|deadline>"`,
    /// e.g. `"30m before start"` or `"2d after deadline"`.
    pub fn parse(s: &str) -> Result<Self> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let [offset, direction, anchor] = words.as_slice() else {
            bail!("invalid reminder '{s}': expected e.g. '30m before start'");
        };
        let split = offset
            .find(|c: char| !c.is_ascii_digit())
            .with_context(|| format!("invalid offset '{offset}': missing unit (m, h, or d)"))?;
        let (digits, unit) = offset.split_at(split);
        let amount: u32 = digits
            .parse()
            .with_context(|| format!("invalid offset '{offset}'"))?;
        let unit = match unit {
            "m" => LeadUnit::Minutes,
            "h" => LeadUnit::Hours,
            "d" => LeadUnit::Days,
            _ => bail!("invalid unit '{unit}': must be m, h, or d"),
        };
        let direction = match *direction {
            "before" => Direction::Before,
            "after" => Direction::After,
            _ => bail!("invalid direction '{direction}': must be before or after"),
        };
        let anchor = match *anchor {
            "start" => Anchor::Start,
            "deadline" => Anchor::Deadline,
            _ => bail!("invalid anchor '{anchor}': must be start or deadline"),
        };
        Ok(RelativeSpec {
            amount,
            unit,
            direction,
            anchor,
        })
    }

    /// Build the reminder, or `None` when the anchor field is absent.
    ///
    /// Day offsets move by calendar days in the anchor's zone, so
    /// "1d before" keeps the wall-clock time across a DST change.
    pub fn reminder<Tz: TimeZone>(
        &self,
        start_date: Option<&DateTime<Tz>>,
        start_time: Option<NaiveTime>,
        deadline: Option<&DateTime<Tz>>,
    ) -> Option<Reminder> {
        let base = match self.anchor {
            Anchor::Start => start_instant(start_date?, start_time),
            Anchor::Deadline => deadline?.with_timezone(&Utc),
        };
        let tz = match self.anchor {
            Anchor::Start => start_date?.timezone(),
            Anchor::Deadline => deadline?.timezone(),
        };
        let at = self.shift(base, &tz)?;

        let mut reminder = Reminder::new(at, ReminderType::Relative);
        match (self.anchor, self.direction) {
            (Anchor::Start, Direction::Before) => reminder.before_start = true,
            (Anchor::Start, Direction::After) => reminder.after_start = true,
            (Anchor::Deadline, Direction::Before) => reminder.before_deadline = true,
            (Anchor::Deadline, Direction::After) => reminder.after_deadline = true,
        }
        Some(reminder)
    }

    fn shift<Tz: TimeZone>(&self, base: DateTime<Utc>, tz: &Tz) -> Option<DateTime<Utc>> {
        let amount = i64::from(self.amount);
        let delta = match self.unit {
            LeadUnit::Minutes => Duration::minutes(amount),
            LeadUnit::Hours => Duration::hours(amount),
            LeadUnit::Days => {
                let local = base.with_timezone(tz);
                let days = Days::new(u64::from(self.amount));
                let moved = match self.direction {
                    Direction::Before => local.checked_sub_days(days),
                    Direction::After => local.checked_add_days(days),
                };
                return moved.map(|t| t.with_timezone(&Utc));
            }
        };
        match self.direction {
            Direction::Before => base.checked_sub_signed(delta),
            Direction::After => base.checked_add_signed(delta),
        }
    }
}

/// Built-in reminders for a task: before the deadline, at the start, and
/// shortly before the start. Start time-of-day is read in `tz`.
pub fn task_reminders<Tz: TimeZone>(task: &Task, tz: &Tz, policy: &ReminderPolicy) -> Vec<Reminder> {
    let start_date = task.start_date.map(|t| t.with_timezone(tz));
    let start_time = task.start_time_of_day(tz);
    [
        policy.deadline_reminder(task.deadline.as_ref()),
        start_date_reminder(start_date.as_ref(), start_time),
        policy.start_time_reminder(start_date.as_ref(), start_time),
    ]
    .into_iter()
    .flatten()
    .collect()
}
