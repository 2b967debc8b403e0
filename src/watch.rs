use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::workspace::{WorkspaceView, Workspaces};

/// Watches the state database so that writes from other processes reach
/// this one without polling. The watcher must be kept alive for events to
/// be received.
///
/// SQLite writes through `-wal` and `-shm` siblings, so the parent
/// directory is watched and events are kept only for files whose name
/// starts with the database filename.
pub fn watch_db(db_path: &str) -> Result<(RecommendedWatcher, Receiver<()>)> {
    let (tx, rx) = mpsc::channel();

    let db_filename = Path::new(db_path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else {
            return;
        };
        // Reads by any process fire access events; they never change state.
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }
        let ours = event.paths.iter().any(|p| {
            p.file_name()
                .map(|f| f.to_string_lossy().starts_with(&*db_filename))
                .unwrap_or(false)
        });
        if ours {
            let _ = tx.send(());
        }
    })
    .context("failed to create file watcher")?;

    let path = Path::new(db_path);
    let watch_path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    watcher
        .watch(watch_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_path.display()))?;

    Ok((watcher, rx))
}

/// Waits for a change event with timeout.
/// Returns true if an event was received, false on timeout.
pub fn wait_for_change(rx: &Receiver<()>, timeout: Duration) -> bool {
    rx.recv_timeout(timeout).is_ok()
}

/// Drains any pending events from the receiver.
pub fn drain_events(rx: &Receiver<()>) {
    while rx.try_recv().is_ok() {}
}

/// Blocks until the database changes (or `fallback` elapses), then reloads
/// `view`. Returns true if the view's workspace state differs afterwards.
///
/// Events queued during the wait are folded into one reload.
pub fn refresh_view(
    rx: &Receiver<()>,
    fallback: Duration,
    view: &mut WorkspaceView,
    workspaces: &Workspaces,
) -> Result<bool> {
    if !wait_for_change(rx, fallback) {
        log::trace!("no database events within {fallback:?}, reloading anyway");
    }
    drain_events(rx);
    view.reload(workspaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;

    #[test]
    fn wait_times_out_without_events() {
        let (_tx, rx) = mpsc::channel::<()>();
        assert!(!wait_for_change(&rx, Duration::from_millis(10)));
    }

    #[test]
    fn drain_empties_queue() {
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        drain_events(&rx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn store_write_wakes_watcher() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let path = path.to_str().unwrap();
        let conn = store::open(path).unwrap();
        store::init(&conn).unwrap();

        let (_watcher, rx) = watch_db(path).unwrap();
        drain_events(&rx);
        store::save_visibility(&conn, "Home", false).unwrap();
        assert!(wait_for_change(&rx, Duration::from_secs(5)));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let (_watcher, rx) = watch_db(path.to_str().unwrap()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        assert!(!wait_for_change(&rx, Duration::from_millis(300)));
    }

    #[test]
    fn refresh_view_picks_up_other_connection_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let path = path.to_str().unwrap();
        let ours = store::open(path).unwrap();
        store::init(&ours).unwrap();
        let workspaces = Workspaces::new(ours);
        let mut view = WorkspaceView::load(&workspaces, "Home").unwrap();

        let (_watcher, rx) = watch_db(path).unwrap();
        drain_events(&rx);
        let theirs = store::open(path).unwrap();
        store::save_visibility(&theirs, "Home", false).unwrap();

        assert!(refresh_view(&rx, Duration::from_secs(5), &mut view, &workspaces).unwrap());
        assert!(!view.state().is_public);
        assert!(!refresh_view(&rx, Duration::from_millis(50), &mut view, &workspaces).unwrap());
    }
}
