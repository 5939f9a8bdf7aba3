//! # Publication Pipeline
//!
//! Orchestrates one full cycle across all configured sources:
//!
//! 1. Resolve the settings into source descriptors
//! 2. Per source, strictly in configuration order: synchronize the working
//!    copy, check the snippets folder, load and group its snippets
//! 3. Aggregate the per-source results into one table plus status set
//! 4. Publish the new aggregate as a single swap
//! 5. Notify, for triggers that warrant it
//!
//! When no sources resolve, the aggregate and status set are cleared and
//! published as empty — a valid terminal state, not an error. Per-source and
//! per-file failures are contained: a cycle always completes and always
//! publishes a (possibly reduced) result.
//!
//! Cycles are serialized with a single-flight guard: a trigger firing while
//! a cycle is in flight blocks until the lock frees, then runs against fresh
//! on-disk state. Publishes can therefore never interleave.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::aggregate::{self, SourceResult, SourceStatus};
use crate::config::Settings;
use crate::defaults::PULL_TIMEOUT;
use crate::error::Error;
use crate::loader;
use crate::publish::{CompletionSink, PublishedState, SharedPublished, StatusSink};
use crate::registry;
use crate::sync::{self, DefaultGitOperations, GitOperations};

/// What started a cycle. Determines whether a summary notification pops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTrigger {
    /// Explicitly requested by the user.
    Manual,
    /// Periodic timer tick.
    Timer,
    /// Debounced file-change reload.
    FileChange,
    /// Settings change.
    ConfigChange,
}

impl CycleTrigger {
    /// Silent cycles (timer ticks, file-change reloads) never pop a
    /// notification; they only update the indicator.
    pub fn notifies(self) -> bool {
        matches!(self, CycleTrigger::Manual | CycleTrigger::ConfigChange)
    }
}

impl fmt::Display for CycleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleTrigger::Manual => "manual",
            CycleTrigger::Timer => "timer",
            CycleTrigger::FileChange => "file-change",
            CycleTrigger::ConfigChange => "config-change",
        };
        f.write_str(label)
    }
}

/// Outcome of one completed cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub trigger: CycleTrigger,
    pub total_snippets: usize,
    pub error_count: usize,
    /// File-level parse warnings surfaced during loading.
    pub warning_count: usize,
    pub statuses: Vec<SourceStatus>,
}

impl CycleReport {
    /// One-line summary for the notification boundary.
    pub fn summary(&self) -> String {
        if self.statuses.is_empty() {
            return "No snippet sources configured".to_string();
        }

        let mut summary = format!(
            "Synced {} snippet{} from {} source{}",
            self.total_snippets,
            if self.total_snippets == 1 { "" } else { "s" },
            self.statuses.len(),
            if self.statuses.len() == 1 { "" } else { "s" },
        );
        if self.error_count > 0 {
            summary.push_str(&format!(
                " ({} source{} reported errors)",
                self.error_count,
                if self.error_count == 1 { "" } else { "s" },
            ));
        }
        summary
    }
}

/// The merge-and-refresh engine. Owns the published state and runs cycles.
pub struct SyncEngine {
    workspace_root: PathBuf,
    git_ops: Box<dyn GitOperations>,
    published: SharedPublished,
    cycle_guard: Mutex<()>,
    pull_timeout: Duration,
}

impl SyncEngine {
    /// Engine with the system git, resolving relative source paths against
    /// `workspace_root`.
    pub fn new(workspace_root: PathBuf) -> Self {
        Self::with_git(workspace_root, Box::new(DefaultGitOperations))
    }

    /// Engine with custom git operations, primarily for tests.
    pub fn with_git(workspace_root: PathBuf, git_ops: Box<dyn GitOperations>) -> Self {
        Self {
            workspace_root,
            git_ops,
            published: SharedPublished::new(),
            cycle_guard: Mutex::new(()),
            pull_timeout: PULL_TIMEOUT,
        }
    }

    /// Handle to the currently-published state.
    pub fn published(&self) -> &SharedPublished {
        &self.published
    }

    /// Run one full cycle and publish its result.
    ///
    /// Never fails: all source- and file-level errors are contained in the
    /// report. `allow_pull` is the caller-level pull switch; each source's
    /// own `enableGitPull` still applies.
    pub fn run_cycle(
        &self,
        settings: &Settings,
        allow_pull: bool,
        trigger: CycleTrigger,
        completions: &dyn CompletionSink,
        status: &dyn StatusSink,
    ) -> CycleReport {
        let _cycle = self.cycle_guard.lock().unwrap_or_else(|e| e.into_inner());
        log::debug!("Starting {} cycle", trigger);

        let descriptors = registry::resolve_sources(settings, &self.workspace_root);
        if descriptors.is_empty() {
            log::info!("No snippet sources resolved; publishing empty state");
            return self.publish(Vec::new(), 0, trigger, completions, status);
        }

        let mut results = Vec::with_capacity(descriptors.len());
        let mut warning_count = 0;

        for source in descriptors {
            let outcome = sync::sync_one(self.git_ops.as_ref(), &source, allow_pull, self.pull_timeout);
            if !outcome.ok {
                results.push(SourceResult {
                    descriptor: source,
                    load: None,
                    error: outcome.error,
                    synced_at: None,
                });
                continue;
            }

            let folder = source.snippets_dir();
            if !folder.is_dir() {
                let error = Error::SnippetsFolderMissing { path: folder };
                log::warn!("{}: {}", source.display_name, error);
                results.push(SourceResult {
                    descriptor: source,
                    load: None,
                    error: Some(error.to_string()),
                    synced_at: None,
                });
                continue;
            }

            let load = loader::load_folder(&folder, source.include_json);
            for warning in &load.warnings {
                log::warn!(
                    "{}: {}: {}",
                    source.display_name,
                    warning.path.display(),
                    warning.message
                );
            }
            warning_count += load.warnings.len();

            log::debug!(
                "{}: loaded {} entries from {} files",
                source.display_name,
                load.entry_count(),
                load.files_loaded
            );

            results.push(SourceResult {
                descriptor: source,
                load: Some(load),
                error: outcome.error,
                synced_at: Some(SystemTime::now()),
            });
        }

        self.publish(results, warning_count, trigger, completions, status)
    }

    /// Aggregate, swap the published state, and drive the consumer sinks.
    fn publish(
        &self,
        results: Vec<SourceResult>,
        warning_count: usize,
        trigger: CycleTrigger,
        completions: &dyn CompletionSink,
        status: &dyn StatusSink,
    ) -> CycleReport {
        let (table, statuses) = aggregate::aggregate(results);
        let state = self.published.replace(PublishedState { table, statuses });

        completions.replace_all(&state);
        status.update(&state);

        let report = CycleReport {
            trigger,
            total_snippets: state.total_snippets(),
            error_count: state.error_count(),
            warning_count,
            statuses: state.statuses.clone(),
        };

        if trigger.notifies() {
            status.notify(&report.summary());
        }

        log::info!(
            "Cycle complete ({}): {} snippets, {} errors, {} warnings",
            trigger,
            report.total_snippets,
            report.error_count,
            report.warning_count
        );

        report
    }
}
