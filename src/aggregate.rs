//! # Aggregation Engine
//!
//! Merges per-source load results into one global table plus the per-source
//! status set. Sources that failed their precondition contribute an empty
//! bucket set and a status carrying the recorded error; they never halt the
//! processing of their siblings. Duplicates across sources are additive —
//! there is no identity-based deduplication and no precedence rule.

use std::time::SystemTime;

use crate::loader::FolderLoad;
use crate::registry::SourceDescriptor;
use crate::table::SnippetTable;

/// Per-source, per-cycle health record. Statuses from a previous cycle are
/// fully replaced, never merged.
#[derive(Debug, Clone)]
pub struct SourceStatus {
    pub id: String,
    pub display_name: String,
    pub last_sync: Option<SystemTime>,
    pub last_error: Option<String>,
    /// Entries across this source's own buckets: a snippet targeting N
    /// languages counts once per language.
    pub snippet_count: usize,
}

/// One source's contribution to a cycle, as produced by the pipeline.
#[derive(Debug)]
pub struct SourceResult {
    pub descriptor: SourceDescriptor,
    /// `None` when the precondition failed or the snippets folder is absent.
    pub load: Option<FolderLoad>,
    pub error: Option<String>,
    pub synced_at: Option<SystemTime>,
}

/// Merge the per-source results, preserving source iteration order.
pub fn aggregate(results: Vec<SourceResult>) -> (SnippetTable, Vec<SourceStatus>) {
    let mut table = SnippetTable::new();
    let mut statuses = Vec::with_capacity(results.len());

    for result in results {
        let snippet_count = result
            .load
            .as_ref()
            .map(FolderLoad::entry_count)
            .unwrap_or(0);

        if let Some(load) = result.load {
            table.extend_from(load.buckets);
        }

        statuses.push(SourceStatus {
            id: result.descriptor.id,
            display_name: result.descriptor.display_name,
            last_sync: result.synced_at,
            last_error: result.error,
            snippet_count,
        });
    }

    (table, statuses)
}
