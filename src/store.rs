//! Local key-value persistence for workspace view state.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::filter::FilterState;
use crate::sort::{SortDirection, SortOption};
use crate::state::WorkspaceState;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);
";

const UPSERT: &str = "
INSERT INTO kv (key, value) VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
";

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("failed to open {path}"))?;
    set_pragmas(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    set_pragmas(&conn)?;
    init(&conn)?;
    Ok(conn)
}

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;
    Ok(value)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(UPSERT, rusqlite::params![key, value])?;
    Ok(())
}

/// Returns true if a value was removed.
pub fn remove(conn: &Connection, key: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
    Ok(rows > 0)
}

pub fn filters_key(workspace: &str) -> String {
    format!("workspace-filters-{workspace}")
}

pub fn sort_key(workspace: &str) -> String {
    format!("workspace-sort-{workspace}")
}

pub fn sort_direction_key(workspace: &str) -> String {
    format!("workspace-sort-direction-{workspace}")
}

pub fn visibility_key(workspace: &str) -> String {
    format!("workspace-visibility-{workspace}")
}

/// Stored filters for `workspace`. Unparseable contents count as no filter.
pub fn load_filters(conn: &Connection, workspace: &str) -> Result<Option<FilterState>> {
    let key = filters_key(workspace);
    let Some(raw) = get(conn, &key)? else {
        log::debug!("no filters stored for workspace '{workspace}'");
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(filters) => Ok(Some(filters)),
        Err(e) => {
            log::warn!("ignoring malformed filters under '{key}': {e}");
            Ok(None)
        }
    }
}

pub fn save_filters(conn: &Connection, workspace: &str, filters: &FilterState) -> Result<()> {
    let json = serde_json::to_string(filters)?;
    set(conn, &filters_key(workspace), &json)
}

pub fn clear_filters(conn: &Connection, workspace: &str) -> Result<bool> {
    remove(conn, &filters_key(workspace))
}

/// Passing `None` for `sort` clears both the option and the direction.
pub fn save_sort(
    conn: &Connection,
    workspace: &str,
    sort: Option<SortOption>,
    direction: Option<SortDirection>,
) -> Result<()> {
    match sort {
        Some(s) => set(conn, &sort_key(workspace), s.as_str())?,
        None => {
            remove(conn, &sort_key(workspace))?;
        }
    }
    match direction.filter(|_| sort.is_some()) {
        Some(d) => set(conn, &sort_direction_key(workspace), d.as_str())?,
        None => {
            remove(conn, &sort_direction_key(workspace))?;
        }
    }
    Ok(())
}

pub fn save_visibility(conn: &Connection, workspace: &str, public: bool) -> Result<()> {
    let value = if public { "public" } else { "private" };
    set(conn, &visibility_key(workspace), value)
}

/// Full view state. Unknown sort strings are treated as unset, like
/// malformed filters.
pub fn load_state(conn: &Connection, workspace: &str) -> Result<WorkspaceState> {
    let filters = load_filters(conn, workspace)?;
    let sort = get(conn, &sort_key(workspace))?.and_then(|s| {
        SortOption::parse(&s)
            .map_err(|e| log::warn!("ignoring stored sort for '{workspace}': {e}"))
            .ok()
    });
    let sort_direction = get(conn, &sort_direction_key(workspace))?.and_then(|s| {
        SortDirection::parse(&s)
            .map_err(|e| log::warn!("ignoring stored sort direction for '{workspace}': {e}"))
            .ok()
    });
    let is_public = get(conn, &visibility_key(workspace))?
        .map(|v| v == "public")
        .unwrap_or(true);
    Ok(WorkspaceState {
        filters,
        sort,
        sort_direction,
        is_public,
    })
}
