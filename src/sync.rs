//! # Repository Synchronizer
//!
//! Brings one source's working copy up to date before its snippets are
//! loaded. The synchronizer never throws: every failure is folded into a
//! [`SyncOutcome`] so the publication pipeline can record it per source and
//! keep going.
//!
//! ## Design
//!
//! Git access goes through the [`GitOperations`] trait so the decision logic
//! can be tested without a real repository or network. The default
//! implementation wraps the system `git` command (see [`crate::git`]).

use std::path::Path;
use std::time::Duration;

use crate::error::Error;
use crate::git::{self, PullOutput};
use crate::registry::SourceDescriptor;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Whether `path` exists and carries a version-control marker.
    fn is_version_controlled(&self, path: &Path) -> bool;

    /// Fast-forward-only pull of `branch` against the default remote,
    /// bounded by `timeout`.
    fn pull_ff_only(
        &self,
        path: &Path,
        branch: &str,
        timeout: Duration,
    ) -> crate::error::Result<PullOutput>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn is_version_controlled(&self, path: &Path) -> bool {
        git::is_version_controlled(path)
    }

    fn pull_ff_only(
        &self,
        path: &Path,
        branch: &str,
        timeout: Duration,
    ) -> crate::error::Result<PullOutput> {
        git::pull_ff_only(path, branch, timeout)
    }
}

/// Outcome of synchronizing one source.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Whether the source may be loaded. `false` means the precondition
    /// failed and the source is skipped for this cycle.
    pub ok: bool,
    /// Recorded error text, if any. May be set alongside `ok == true` when a
    /// pull failed but loading should proceed against on-disk state.
    pub error: Option<String>,
}

impl SyncOutcome {
    fn skipped(error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
        }
    }

    fn loadable(error: Option<String>) -> Self {
        Self { ok: true, error }
    }
}

/// Synchronize one source.
///
/// The root must exist and look version-controlled; otherwise the source is
/// skipped without attempting a pull. A pull runs only when both the caller
/// and the source allow it, and a failed or timed-out pull is non-fatal.
pub fn sync_one(
    git_ops: &dyn GitOperations,
    source: &SourceDescriptor,
    allow_pull: bool,
    timeout: Duration,
) -> SyncOutcome {
    if !git_ops.is_version_controlled(&source.root_path) {
        let error = Error::NotARepository {
            path: source.root_path.clone(),
        };
        log::warn!("{}: {}", source.display_name, error);
        return SyncOutcome::skipped(error.to_string());
    }

    if allow_pull && source.sync_enabled {
        match git_ops.pull_ff_only(&source.root_path, &source.branch, timeout) {
            Ok(output) => {
                let combined = output.combined();
                log::debug!(
                    "{}: pulled {} ({})",
                    source.display_name,
                    source.branch,
                    if combined.is_empty() { "no output" } else { &combined }
                );
            }
            Err(error) => {
                log::warn!("{}: {}", source.display_name, error);
                return SyncOutcome::loadable(Some(error.to_string()));
            }
        }
    }

    SyncOutcome::loadable(None)
}
