use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::bookmarks::store::WriteStamp;
use crate::event::Event;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Watches the bookmark store file and reports edits made by other programs.
pub struct StoreWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl StoreWatcher {
    /// Watch `store_path` for changes.
    ///
    /// The parent directory is watched (non-recursively) because editors and
    /// browsers usually replace the file rather than write it in place.
    /// Changes whose modification time matches `own_writes` are dropped.
    pub fn new(
        store_path: &Path,
        debounce_duration: Duration,
        own_writes: WriteStamp,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let active_clone = active.clone();
        let target = store_path.to_path_buf();
        let dir = store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                if !active_clone.load(Ordering::Relaxed) {
                    return;
                }

                match result {
                    Ok(events) => {
                        let touched = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .any(|e| is_store_path(&e.path, &target));
                        if !touched || own_writes.is_own_write(&target) {
                            return;
                        }
                        tracing::info!(path = %target.display(), "bookmark store changed on disk");
                        let _ = event_tx.send(Event::StoreChanged(target.clone()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "store watcher error");
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        Ok(Self {
            active,
            _debouncer: debouncer,
        })
    }

    /// Pause event forwarding.
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Resume event forwarding.
    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Whether an event path refers to the store file.
///
/// Compared by file name within the same directory, since event paths may be
/// canonicalized differently from the path the user gave.
pub fn is_store_path(event_path: &Path, store_path: &Path) -> bool {
    if event_path == store_path {
        return true;
    }
    match (event_path.file_name(), store_path.file_name()) {
        (Some(a), Some(b)) if a == b => {
            let canon = |p: &Path| -> Option<PathBuf> { p.parent()?.canonicalize().ok() };
            match (canon(event_path), canon(store_path)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn identical_paths_match() {
        let p = Path::new("/home/user/bookmarks.json");
        assert!(is_store_path(p, p));
    }

    #[test]
    fn sibling_files_do_not_match() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("bookmarks.json");
        let other = dir.path().join("bookmarks.json.tmp");
        assert!(!is_store_path(&other, &store));
    }

    #[test]
    fn same_name_in_other_dir_does_not_match() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        assert!(!is_store_path(
            &a.path().join("bookmarks.json"),
            &b.path().join("bookmarks.json")
        ));
    }

    #[test]
    fn non_canonical_parent_matches() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let store = dir.path().join("bookmarks.json");
        let roundabout = dir.path().join("sub").join("..").join("bookmarks.json");
        assert!(is_store_path(&roundabout, &store));
    }

    #[tokio::test]
    async fn pause_and_resume_toggle_state() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("bookmarks.json");
        std::fs::write(&store, "{}").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let watcher = StoreWatcher::new(
            &store,
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            WriteStamp::default(),
            tx,
        )
        .unwrap();
        assert!(watcher.is_active());
        watcher.pause();
        assert!(!watcher.is_active());
        watcher.resume();
        assert!(watcher.is_active());
    }
}
