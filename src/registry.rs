//! # Source Registry
//!
//! Resolves raw configuration entries into validated, normalized
//! [`SourceDescriptor`]s. This is the boundary where loosely-typed settings
//! become strongly-typed data: entries without a usable path are silently
//! dropped, absent fields take their documented defaults, and relative paths
//! are resolved against the workspace root. No I/O happens here beyond path
//! normalization.
//!
//! An empty result is a valid, reportable state — callers must not treat
//! "no sources" as an error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{RawSourceConfig, Settings};
use crate::defaults::{DEFAULT_BRANCH, DEFAULT_SNIPPETS_DIR};

/// One configured snippet source, fully validated and defaulted.
///
/// Descriptors are created fresh each publication cycle from the current
/// settings; the derived `id` is the only identity carried across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Stable identifier, derived from the explicit name or config position.
    /// Unique within a run.
    pub id: String,
    pub display_name: String,
    /// Resolved absolute (or workspace-rooted) repository path.
    pub root_path: PathBuf,
    pub branch: String,
    /// Snippets folder, relative to `root_path`.
    pub snippets_path: String,
    /// Whether plain `.json` files are eligible in addition to `.code-snippets`.
    pub include_json: bool,
    /// Whether a pull may be attempted for this source.
    pub sync_enabled: bool,
}

impl SourceDescriptor {
    /// Absolute path of the configured snippets folder.
    pub fn snippets_dir(&self) -> PathBuf {
        self.root_path.join(&self.snippets_path)
    }
}

/// Resolve the configured sources into descriptors, in configuration order.
///
/// If the explicit source list is non-empty it is used entry by entry;
/// otherwise a single legacy-style descriptor is synthesized from the flat
/// top-level fields when they carry a path.
pub fn resolve_sources(settings: &Settings, workspace_root: &Path) -> Vec<SourceDescriptor> {
    let mut used_ids = HashSet::new();

    if !settings.sources.is_empty() {
        let mut descriptors = Vec::new();
        for (index, raw) in settings.sources.iter().enumerate() {
            match resolve_entry(raw, index, workspace_root, &mut used_ids) {
                Some(descriptor) => descriptors.push(descriptor),
                None => {
                    log::debug!("Dropping source entry {} without a path", index + 1);
                }
            }
        }
        return descriptors;
    }

    resolve_entry(&settings.legacy, 0, workspace_root, &mut used_ids)
        .into_iter()
        .collect()
}

fn resolve_entry(
    raw: &RawSourceConfig,
    index: usize,
    workspace_root: &Path,
    used_ids: &mut HashSet<String>,
) -> Option<SourceDescriptor> {
    let path_as_given = raw
        .local_repo_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())?;

    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let display_name = name
        .map(str::to_string)
        .unwrap_or_else(|| format!("Repo {} ({})", index + 1, path_as_given));

    let id = unique_id(
        name.map(str::to_string)
            .unwrap_or_else(|| format!("source-{}", index + 1)),
        index,
        used_ids,
    );

    let branch = raw
        .branch
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BRANCH)
        .to_string();

    let snippets_path = raw
        .snippets_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SNIPPETS_DIR)
        .to_string();

    Some(SourceDescriptor {
        id,
        display_name,
        root_path: resolve_path(path_as_given, workspace_root),
        branch,
        snippets_path,
        include_json: raw.include_json_files.unwrap_or(true),
        sync_enabled: raw.enable_git_pull.unwrap_or(true),
    })
}

/// An absolute path is used as-is; a relative path is resolved against the
/// workspace root.
fn resolve_path(path: &str, workspace_root: &Path) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        workspace_root.join(path)
    }
}

/// Keep ids unique within a run by suffixing the config position on collision.
fn unique_id(candidate: String, index: usize, used_ids: &mut HashSet<String>) -> String {
    let id = if used_ids.contains(&candidate) {
        format!("{}-{}", candidate, index + 1)
    } else {
        candidate
    };
    used_ids.insert(id.clone());
    id
}
