//! Debounced file watching for snippet folders and the settings file.
//!
//! Filesystem events arrive in bursts (a pull alone touches dozens of
//! paths), so raw events are coalesced: paths accumulate until the watched
//! tree has been quiet for the debounce window, then surface as one batch.
//! Version-control-internal paths are excluded up front — without that, the
//! reload's own pull would re-trigger the reload.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{Error, Result};

/// Watches a set of paths and reports changes as debounced batches.
pub struct DebouncedWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    debounce: Duration,
    last_event: Option<Instant>,
    pending: HashSet<PathBuf>,
}

impl DebouncedWatcher {
    /// Watch directories recursively. Paths that do not exist are skipped.
    pub fn recursive(roots: &[PathBuf], debounce: Duration) -> Result<Self> {
        Self::with_mode(roots, RecursiveMode::Recursive, debounce)
    }

    /// Watch individual files or flat directories.
    pub fn non_recursive(paths: &[PathBuf], debounce: Duration) -> Result<Self> {
        Self::with_mode(paths, RecursiveMode::NonRecursive, debounce)
    }

    fn with_mode(paths: &[PathBuf], mode: RecursiveMode, debounce: Duration) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher =
            RecommendedWatcher::new(move |res| { let _ = tx.send(res); }, notify::Config::default())
                .map_err(|e| Error::Watch {
                    message: e.to_string(),
                })?;

        for path in paths {
            if path.exists() {
                watcher.watch(path, mode).map_err(|e| Error::Watch {
                    message: format!("{}: {}", path.display(), e),
                })?;
            } else {
                log::debug!("Not watching missing path: {}", path.display());
            }
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            debounce,
            last_event: None,
            pending: HashSet::new(),
        })
    }

    /// Drain pending events and return a batch of changed paths once the
    /// debounce window has elapsed since the last relevant event.
    ///
    /// Returns `None` while the tree is quiet or still within the window.
    pub fn poll(&mut self) -> Option<Vec<PathBuf>> {
        let mut saw_event = false;

        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if !is_relevant(&event) {
                        continue;
                    }
                    for path in &event.paths {
                        if is_scm_internal(path) {
                            continue;
                        }
                        self.pending.insert(path.clone());
                        saw_event = true;
                    }
                }
                Ok(Err(error)) => {
                    log::warn!("File watcher error: {}", error);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        if saw_event {
            self.last_event = Some(Instant::now());
        }

        match self.last_event {
            Some(last) if !self.pending.is_empty() && last.elapsed() >= self.debounce => {
                let mut batch: Vec<PathBuf> = self.pending.drain().collect();
                batch.sort();
                self.last_event = None;
                Some(batch)
            }
            _ => None,
        }
    }
}

/// Whether a path sits inside a version-control metadata directory.
pub fn is_scm_internal(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == ".git")
}

/// Change, create and delete events matter; access events do not.
fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scm_internal_paths_detected() {
        assert!(is_scm_internal(Path::new("/repos/a/.git/FETCH_HEAD")));
        assert!(is_scm_internal(Path::new(".git/index")));
        assert!(!is_scm_internal(Path::new("/repos/a/snippets/x.json")));
        assert!(!is_scm_internal(Path::new("/repos/a/gitignore.json")));
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let watcher = DebouncedWatcher::recursive(
            &[PathBuf::from("/definitely/not/a/real/path")],
            Duration::from_millis(50),
        );
        assert!(watcher.is_ok());
    }

    #[test]
    fn test_changes_surface_after_debounce_window() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("demo.code-snippets");
        fs::write(&file, "{}").unwrap();

        let mut watcher = DebouncedWatcher::recursive(
            &[temp_dir.path().to_path_buf()],
            Duration::from_millis(100),
        )
        .unwrap();

        fs::write(&file, r#"{"A": {"prefix": "a", "body": "a"}}"#).unwrap();

        // Within the window nothing surfaces yet.
        std::thread::sleep(Duration::from_millis(30));
        assert!(watcher.poll().is_none());

        // After the window the batch arrives; poll a few times since event
        // delivery timing varies by platform backend.
        let mut batch = None;
        for _ in 0..20 {
            std::thread::sleep(Duration::from_millis(50));
            batch = watcher.poll();
            if batch.is_some() {
                break;
            }
        }
        let batch = batch.expect("no batch after debounce window");
        assert!(batch.iter().any(|p| p.ends_with("demo.code-snippets")));

        // The batch is drained; the watcher goes quiet again.
        assert!(watcher.poll().is_none());
    }
}
