//! Published state and the consumer-boundary traits.
//!
//! The publication pipeline exclusively owns the current aggregate table and
//! status set. Readers receive an immutable snapshot that is replaced
//! wholesale at the end of a successful cycle — a reader never observes a
//! partially-updated aggregate. The two consumer boundaries (completion
//! registration and status display) are traits so editor hosts, CLIs and
//! tests can plug in their own sinks.

use std::sync::{Arc, RwLock};

use crate::aggregate::SourceStatus;
use crate::table::SnippetTable;

/// One cycle's published output: the aggregate table plus per-source
/// statuses, replaced as a unit.
#[derive(Debug, Default)]
pub struct PublishedState {
    pub table: SnippetTable,
    pub statuses: Vec<SourceStatus>,
}

impl PublishedState {
    /// The cleared state published at startup, on shutdown, and when no
    /// sources resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total_snippets(&self) -> usize {
        self.statuses.iter().map(|s| s.snippet_count).sum()
    }

    pub fn error_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| s.last_error.is_some())
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Shared handle to the currently-published state.
///
/// Cloning the handle is cheap; every clone observes the same swaps.
#[derive(Clone, Default)]
pub struct SharedPublished {
    inner: Arc<RwLock<Arc<PublishedState>>>,
}

impl SharedPublished {
    /// A handle holding the empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state. The snapshot stays valid across later
    /// swaps.
    pub fn current(&self) -> Arc<PublishedState> {
        Arc::clone(&self.inner.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Replace the published state in one step, returning the new snapshot.
    pub fn replace(&self, next: PublishedState) -> Arc<PublishedState> {
        let next = Arc::new(next);
        let mut slot = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *slot = Arc::clone(&next);
        next
    }
}

/// Completion-registration boundary: re-derives completion sources from a
/// freshly published table. Called only after the swap.
pub trait CompletionSink: Send + Sync {
    fn replace_all(&self, state: &PublishedState);
}

/// Status/notification boundary.
pub trait StatusSink: Send + Sync {
    /// Refresh the always-visible indicator after a publish.
    fn update(&self, state: &PublishedState);

    /// Pop a one-shot summary. Invoked only for notifying cycle triggers.
    fn notify(&self, summary: &str);
}

/// No-op sinks for headless or test use.
pub struct NullSink;

impl CompletionSink for NullSink {
    fn replace_all(&self, _state: &PublishedState) {}
}

impl StatusSink for NullSink {
    fn update(&self, _state: &PublishedState) {}
    fn notify(&self, _summary: &str) {}
}
