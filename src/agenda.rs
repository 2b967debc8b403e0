//! Daily agenda sections. Every comparison is on calendar days in the
//! supplied zone.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

use crate::calendar::day_in;
use crate::model::Task;

/// Tasks that touch `date`: starting on it, due on it, or spanning it.
/// Spans are compared by calendar day, not instant, so a task due at 17:00
/// still covers the whole of its last day.
pub fn for_date<Tz: TimeZone>(tasks: &[Task], date: NaiveDate, tz: &Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            let start = task.start_date.as_ref().map(|t| day_in(t, tz));
            let due = task.deadline.as_ref().map(|t| day_in(t, tz));
            match (start, due) {
                (Some(s), _) if s == date => true,
                (_, Some(d)) if d == date => true,
                (Some(s), Some(d)) => s <= date && date <= d,
                _ => false,
            }
        })
        .cloned()
        .collect()
}

/// Tasks with an explicit start time, for placement on a timeline.
pub fn with_start_time(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.start_time.is_some()).cloned().collect()
}

pub fn without_start_time(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.start_time.is_none()).cloned().collect()
}

/// Neither a start date nor a deadline.
pub fn unscheduled(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.start_date.is_none() && t.deadline.is_none())
        .cloned()
        .collect()
}

/// Starting after `today`, due after `today` with no start, or already
/// started and due after `today`.
pub fn upcoming<Tz: TimeZone>(tasks: &[Task], today: NaiveDate, tz: &Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            let start = task.start_date.as_ref().map(|t| day_in(t, tz));
            let due = task.deadline.as_ref().map(|t| day_in(t, tz));
            match (start, due) {
                (Some(s), _) if s > today => true,
                (None, Some(d)) => d > today,
                (Some(_), Some(d)) => d > today,
                _ => false,
            }
        })
        .cloned()
        .collect()
}

/// Started before `today` and open-ended.
pub fn past<Tz: TimeZone>(tasks: &[Task], today: NaiveDate, tz: &Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            task.deadline.is_none()
                && task
                    .start_date
                    .as_ref()
                    .is_some_and(|t| day_in(t, tz) < today)
        })
        .cloned()
        .collect()
}

/// Due on a day before `today`.
pub fn overdue<Tz: TimeZone>(tasks: &[Task], today: NaiveDate, tz: &Tz) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| {
            task.deadline
                .as_ref()
                .is_some_and(|t| day_in(t, tz) < today)
        })
        .cloned()
        .collect()
}

/// Every section for one selected day, plus the list-view sections
/// relative to `now`.
#[derive(Debug, Clone, Serialize)]
pub struct Agenda {
    pub date: NaiveDate,
    pub timed: Vec<Task>,
    pub untimed: Vec<Task>,
    pub upcoming: Vec<Task>,
    pub past: Vec<Task>,
    pub overdue: Vec<Task>,
    pub unscheduled: Vec<Task>,
}

impl Agenda {
    pub fn build<Tz: TimeZone>(tasks: &[Task], date: NaiveDate, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let day = for_date(tasks, date, &tz);
        Agenda {
            date,
            timed: with_start_time(&day),
            untimed: without_start_time(&day),
            upcoming: upcoming(tasks, today, &tz),
            past: past(tasks, today, &tz),
            overdue: overdue(tasks, today, &tz),
            unscheduled: unscheduled(tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn task(id: &str, start: Option<u32>, due: Option<u32>) -> Task {
        Task {
            id: id.into(),
            content: String::new(),
            priority: 1,
            deadline: due.map(|d| at(d, 17)),
            start_date: start.map(|d| at(d, 0)),
            start_time: None,
            category_id: None,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task("starts-10", Some(10), None),
            task("due-10", None, Some(10)),
            task("spans-10", Some(8), Some(12)),
            task("before-10", Some(5), Some(7)),
            task("floating", None, None),
            task("started-long-ago", Some(1), None),
        ]
    }

    #[test]
    fn for_date_matches_start_due_and_span() {
        assert_eq!(
            ids(&for_date(&sample(), day(10), &Utc)),
            ["starts-10", "due-10", "spans-10"]
        );
    }

    #[test]
    fn timed_split_uses_start_time() {
        let mut tasks = sample();
        tasks[0].start_time = Some(at(1, 9));
        let day_tasks = for_date(&tasks, day(10), &Utc);
        assert_eq!(ids(&with_start_time(&day_tasks)), ["starts-10"]);
        assert_eq!(ids(&without_start_time(&day_tasks)), ["due-10", "spans-10"]);
    }

    #[test]
    fn list_sections_relative_to_today() {
        let tasks = sample();
        let today = day(9);
        assert_eq!(
            ids(&upcoming(&tasks, today, &Utc)),
            ["starts-10", "due-10", "spans-10"]
        );
        assert_eq!(ids(&past(&tasks, today, &Utc)), ["started-long-ago"]);
        assert_eq!(ids(&overdue(&tasks, today, &Utc)), ["before-10"]);
        assert_eq!(ids(&unscheduled(&tasks)), ["floating"]);
    }

    #[test]
    fn due_today_is_neither_upcoming_nor_overdue() {
        let tasks = vec![task("due-today", None, Some(9))];
        assert!(upcoming(&tasks, day(9), &Utc).is_empty());
        assert!(overdue(&tasks, day(9), &Utc).is_empty());
    }

    #[test]
    fn agenda_build_fills_every_section() {
        let now = at(9, 12);
        let agenda = Agenda::build(&sample(), day(10), &now);
        assert_eq!(agenda.date, day(10));
        assert_eq!(agenda.untimed.len(), 3);
        assert!(agenda.timed.is_empty());
        assert_eq!(agenda.upcoming.len(), 3);
        assert_eq!(ids(&agenda.past), ["started-long-ago"]);
        assert_eq!(ids(&agenda.overdue), ["before-10"]);
        assert_eq!(ids(&agenda.unscheduled), ["floating"]);
    }
}
