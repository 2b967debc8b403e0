use std::cmp::Ordering;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Orders categories by how many tasks they hold; task order is untouched.
    TaskCount,
    Alphabetical,
    DueDate,
    StartDate,
    Priority,
}

impl SortOption {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "task-count" => Ok(Self::TaskCount),
            "alphabetical" => Ok(Self::Alphabetical),
            "due-date" => Ok(Self::DueDate),
            "start-date" => Ok(Self::StartDate),
            "priority" => Ok(Self::Priority),
            _ => bail!(
                "invalid sort '{s}': must be task-count, alphabetical, due-date, start-date, or priority"
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCount => "task-count",
            Self::Alphabetical => "alphabetical",
            Self::DueDate => "due-date",
            Self::StartDate => "start-date",
            Self::Priority => "priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TaskCount => "Sorted by Task Count",
            Self::Alphabetical => "Sorted Alphabetically",
            Self::DueDate => "Sorted by Due Date",
            Self::StartDate => "Sorted by Start Date",
            Self::Priority => "Sorted by Priority",
        }
    }

    /// Direction used when none is stored. Priority lists high first.
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Priority => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// `Sorted by Due Date (Asc)`; the suffix only appears when a
    /// direction was chosen explicitly.
    pub fn describe(self, direction: Option<SortDirection>) -> String {
        match direction {
            Some(d) => format!("{} ({})", self.label(), d.short_label()),
            None => self.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => bail!("invalid direction '{s}': must be ascending or descending"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    fn short_label(self) -> &'static str {
        match self {
            Self::Ascending => "Asc",
            Self::Descending => "Desc",
        }
    }
}

/// Compare optional keys with `None` always last, whatever the direction.
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort. Ties keep their original relative order.
pub fn sort_tasks(tasks: &mut [Task], sort: SortOption, direction: Option<SortDirection>) {
    let direction = direction.unwrap_or_else(|| sort.default_direction());
    match sort {
        SortOption::TaskCount => {}
        SortOption::Alphabetical => tasks.sort_by(|a, b| {
            let ord = a.content.to_lowercase().cmp(&b.content.to_lowercase());
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }),
        SortOption::DueDate => tasks.sort_by(|a, b| missing_last(a.deadline, b.deadline, direction)),
        SortOption::StartDate => {
            tasks.sort_by(|a, b| missing_last(a.start_date, b.start_date, direction))
        }
        SortOption::Priority => tasks.sort_by(|a, b| {
            missing_last(a.priority_level(), b.priority_level(), direction)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, content: &str, priority: i64, due_day: Option<u32>) -> Task {
        Task {
            id: id.into(),
            content: content.into(),
            priority,
            deadline: due_day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()),
            start_date: None,
            start_time: None,
            category_id: None,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn due_date_missing_last_both_directions() {
        let mut tasks = vec![
            task("none", "", 1, None),
            task("late", "", 1, Some(20)),
            task("early", "", 1, Some(2)),
        ];
        sort_tasks(&mut tasks, SortOption::DueDate, None);
        assert_eq!(ids(&tasks), ["early", "late", "none"]);
        sort_tasks(&mut tasks, SortOption::DueDate, Some(SortDirection::Descending));
        assert_eq!(ids(&tasks), ["late", "early", "none"]);
    }

    #[test]
    fn priority_defaults_to_high_first() {
        let mut tasks = vec![
            task("low", "", 1, None),
            task("bad", "", 0, None),
            task("high", "", 3, None),
            task("mid", "", 2, None),
        ];
        sort_tasks(&mut tasks, SortOption::Priority, None);
        assert_eq!(ids(&tasks), ["high", "mid", "low", "bad"]);
    }

    #[test]
    fn alphabetical_ignores_case_and_is_stable() {
        let mut tasks = vec![
            task("b", "banana", 1, None),
            task("a1", "Apple", 1, None),
            task("a2", "apple", 1, None),
        ];
        sort_tasks(&mut tasks, SortOption::Alphabetical, None);
        assert_eq!(ids(&tasks), ["a1", "a2", "b"]);
    }

    #[test]
    fn task_count_leaves_order() {
        let mut tasks = vec![task("z", "z", 3, Some(9)), task("a", "a", 1, Some(1))];
        sort_tasks(&mut tasks, SortOption::TaskCount, Some(SortDirection::Ascending));
        assert_eq!(ids(&tasks), ["z", "a"]);
    }

    #[test]
    fn describe_with_and_without_direction() {
        assert_eq!(SortOption::DueDate.describe(None), "Sorted by Due Date");
        assert_eq!(
            SortOption::Alphabetical.describe(Some(SortDirection::Descending)),
            "Sorted Alphabetically (Desc)"
        );
    }

    #[test]
    fn parse_names_round_trip() {
        for s in ["task-count", "alphabetical", "due-date", "start-date", "priority"] {
            assert_eq!(SortOption::parse(s).unwrap().as_str(), s);
        }
        assert!(SortOption::parse("random").is_err());
        assert_eq!(SortDirection::parse("desc").unwrap(), SortDirection::Descending);
        assert!(SortDirection::parse("sideways").is_err());
    }
}
