use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::filter::{apply_filters, FilterState};
use crate::model::Task;
use crate::sort::{sort_tasks, SortDirection, SortOption};

const IDLE_MESSAGE: &str = "Treat yourself to a cup of coffee and a good book. You deserve it.";

/// Everything a workspace view persists about how it shows its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub filters: Option<FilterState>,
    pub sort: Option<SortOption>,
    pub sort_direction: Option<SortDirection>,
    pub is_public: bool,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        WorkspaceState {
            filters: None,
            sort: None,
            sort_direction: None,
            is_public: true,
        }
    }
}

impl WorkspaceState {
    pub fn has_active_state(&self) -> bool {
        self.filters.is_some() || self.sort.is_some()
    }

    pub fn filter_description(&self) -> Option<String> {
        self.filters.as_ref().and_then(FilterState::describe)
    }

    pub fn sort_description(&self) -> Option<String> {
        self.sort.map(|s| s.describe(self.sort_direction))
    }

    /// One-line summary: visibility, then filters and sort, or a
    /// placeholder when neither is set.
    pub fn describe(&self) -> String {
        let mut parts = vec![if self.is_public { "Public" } else { "Private" }.to_string()];
        let filters = self.filter_description();
        let sort = self.sort_description();
        if filters.is_none() && sort.is_none() {
            parts.push(IDLE_MESSAGE.to_string());
        }
        parts.extend(filters);
        parts.extend(sort);
        parts.join(" • ")
    }

    /// Filter, then sort if a sort option is stored.
    pub fn arrange<Tz: TimeZone>(&self, tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
        let mut out = apply_filters(self.filters.as_ref(), tasks, now);
        if let Some(sort) = self.sort {
            sort_tasks(&mut out, sort, self.sort_direction);
        }
        out
    }
}
