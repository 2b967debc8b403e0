//! Shared workspace view state with change notification.
//!
//! Every write through [`Workspaces`] persists to the store and then tells
//! each subscriber which workspace changed. Views reload only when their
//! own workspace is named. Writes from other processes are picked up via
//! [`crate::watch::watch_db`].

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use rusqlite::Connection;

use crate::filter::{apply_filters, FilterState};
use crate::model::Task;
use crate::sort::{SortDirection, SortOption};
use crate::state::WorkspaceState;
use crate::store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChanged {
    pub workspace: String,
}

pub struct Workspaces {
    conn: Connection,
    subscribers: Vec<Sender<StateChanged>>,
}

impl Workspaces {
    pub fn new(conn: Connection) -> Self {
        Workspaces {
            conn,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<StateChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn state(&self, workspace: &str) -> Result<WorkspaceState> {
        store::load_state(&self.conn, workspace)
    }

    pub fn filters(&self, workspace: &str) -> Result<Option<FilterState>> {
        store::load_filters(&self.conn, workspace)
    }

    /// Store `filters`, or clear them with `None`.
    pub fn set_filters(&mut self, workspace: &str, filters: Option<&FilterState>) -> Result<()> {
        match filters {
            Some(f) => store::save_filters(&self.conn, workspace, f)?,
            None => {
                store::clear_filters(&self.conn, workspace)?;
            }
        }
        self.notify(workspace);
        Ok(())
    }

    pub fn set_sort(
        &mut self,
        workspace: &str,
        sort: Option<SortOption>,
        direction: Option<SortDirection>,
    ) -> Result<()> {
        store::save_sort(&self.conn, workspace, sort, direction)?;
        self.notify(workspace);
        Ok(())
    }

    pub fn set_visibility(&mut self, workspace: &str, public: bool) -> Result<()> {
        store::save_visibility(&self.conn, workspace, public)?;
        self.notify(workspace);
        Ok(())
    }

    /// Tell subscribers about `workspace`, dropping any whose receiver is gone.
    fn notify(&mut self, workspace: &str) {
        let event = StateChanged {
            workspace: workspace.to_string(),
        };
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} closed subscriber(s)");
        }
    }
}

/// One workspace's most recently loaded state.
#[derive(Debug, Clone)]
pub struct WorkspaceView {
    name: String,
    state: WorkspaceState,
}

impl WorkspaceView {
    pub fn load(workspaces: &Workspaces, name: &str) -> Result<Self> {
        Ok(WorkspaceView {
            name: name.to_string(),
            state: workspaces.state(name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Re-read from the store. Returns true if anything changed.
    pub fn reload(&mut self, workspaces: &Workspaces) -> Result<bool> {
        let fresh = workspaces.state(&self.name)?;
        let changed = fresh != self.state;
        self.state = fresh;
        Ok(changed)
    }

    /// Reload if `event` names this view's workspace.
    pub fn refresh_on(&mut self, workspaces: &Workspaces, event: &StateChanged) -> Result<bool> {
        if event.workspace != self.name {
            return Ok(false);
        }
        self.reload(workspaces)
    }

    /// Filter `tasks` with this workspace's current filters.
    pub fn apply_filters<Tz: TimeZone>(&self, tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
        apply_filters(self.state.filters.as_ref(), tasks, now)
    }

    /// Filter, then sort by the stored sort option.
    pub fn arrange<Tz: TimeZone>(&self, tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
        self.state.arrange(tasks, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn workspaces() -> Workspaces {
        Workspaces::new(store::open_memory().unwrap())
    }

    fn task(id: &str, priority: i64) -> Task {
        Task {
            id: id.into(),
            content: String::new(),
            priority,
            deadline: None,
            start_date: None,
            start_time: None,
            category_id: None,
        }
    }

    #[test]
    fn writes_notify_subscribers() {
        let mut ws = workspaces();
        let rx = ws.subscribe();
        ws.set_visibility("Home", false).unwrap();
        ws.set_filters("Work", None).unwrap();
        assert_eq!(rx.try_recv().unwrap().workspace, "Home");
        assert_eq!(rx.try_recv().unwrap().workspace, "Work");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_subscribers_are_dropped() {
        let mut ws = workspaces();
        let rx = ws.subscribe();
        drop(ws.subscribe());
        ws.set_visibility("Home", true).unwrap();
        assert_eq!(ws.subscribers.len(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn view_refreshes_only_for_its_workspace() {
        let mut ws = workspaces();
        let rx = ws.subscribe();
        let mut home = WorkspaceView::load(&ws, "Home").unwrap();
        assert!(home.state().filters.is_none());

        let mut high = FilterState::default();
        high.priorities.high = true;
        ws.set_filters("Work", Some(&high)).unwrap();
        let event = rx.try_recv().unwrap();
        assert!(!home.refresh_on(&ws, &event).unwrap());
        assert!(home.state().filters.is_none());

        ws.set_filters("Home", Some(&high)).unwrap();
        let event = rx.try_recv().unwrap();
        assert!(home.refresh_on(&ws, &event).unwrap());
        assert_eq!(home.state().filters.as_ref(), Some(&high));
    }

    #[test]
    fn view_applies_bound_filters() {
        let mut ws = workspaces();
        let tasks = vec![task("l", 1), task("h", 3)];

        let mut view = WorkspaceView::load(&ws, "Home").unwrap();
        assert_eq!(view.apply_filters(&tasks, &Utc::now()), tasks);

        let mut low = FilterState::default();
        low.priorities.low = true;
        ws.set_filters("Home", Some(&low)).unwrap();
        view.reload(&ws).unwrap();
        let kept = view.apply_filters(&tasks, &Utc::now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "l");
    }

    #[test]
    fn reload_reports_no_change() {
        let ws = workspaces();
        let mut view = WorkspaceView::load(&ws, "Home").unwrap();
        assert!(!view.reload(&ws).unwrap());
        assert_eq!(view.name(), "Home");
    }
}
