use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::agenda::Agenda;
use crate::filter::FilterState;
use crate::model::{Reminder, ReminderType, Task};

#[derive(Serialize)]
pub struct TaskReminders<'a> {
    pub id: &'a str,
    pub reminders: &'a [Reminder],
}

fn stamp<Tz: TimeZone>(t: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

fn task_line<Tz: TimeZone>(task: &Task, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut line = format!("{} {}", task.icon(), task.id);
    if !task.content.is_empty() {
        line.push_str(&format!("  {}", task.content));
    }
    if let Some(ref d) = task.deadline {
        line.push_str(&format!("  (due {})", stamp(d, tz)));
    }
    line
}

pub fn format_task_list<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    for task in tasks {
        out.push_str(&task_line(task, tz));
        out.push('\n');
    }
    out
}

pub fn format_filters(filters: Option<&FilterState>) -> String {
    match filters.and_then(FilterState::describe) {
        Some(desc) => format!("{desc}\n"),
        None => "No filters\n".to_string(),
    }
}

fn phase(r: &Reminder) -> &'static str {
    if r.before_deadline {
        "before deadline"
    } else if r.after_deadline {
        "after deadline"
    } else if r.before_start {
        "before start"
    } else if r.after_start {
        "after start"
    } else {
        "at start"
    }
}

pub fn format_reminders<Tz: TimeZone>(task: &Task, reminders: &[Reminder], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = format!("{}\n", task_line(task, tz));
    if reminders.is_empty() {
        out.push_str("  (no reminders)\n");
    }
    for r in reminders {
        let kind = match r.kind {
            ReminderType::Relative => "relative",
            ReminderType::Absolute => "absolute",
        };
        out.push_str(&format!(
            "  {}  {:<8} {}\n",
            stamp(&r.trigger_time, tz),
            kind,
            phase(r)
        ));
    }
    out
}

fn section<Tz: TimeZone>(out: &mut String, title: &str, tasks: &[Task], tz: &Tz)
where
    Tz::Offset: std::fmt::Display,
{
    if tasks.is_empty() {
        return;
    }
    out.push_str(&format!("{title}:\n"));
    for task in tasks {
        out.push_str(&format!("  {}\n", task_line(task, tz)));
    }
}

pub fn format_agenda(agenda: &Agenda) -> String {
    let tz = Local;
    let mut out = format!("Agenda for {}\n", agenda.date);
    section(&mut out, "Scheduled", &agenda.timed, &tz);
    section(&mut out, "Any time", &agenda.untimed, &tz);
    section(&mut out, "Overdue", &agenda.overdue, &tz);
    section(&mut out, "Upcoming", &agenda.upcoming, &tz);
    section(&mut out, "Started, no deadline", &agenda.past, &tz);
    section(&mut out, "Unscheduled", &agenda.unscheduled, &tz);
    out
}
