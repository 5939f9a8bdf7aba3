//! # Snippet Loader
//!
//! Walks one source's snippets folder, parses each eligible file as a
//! mapping of named entries, normalizes the entries and groups them by
//! target-language key.
//!
//! ## Ordering
//!
//! Enumeration is recursive and lexically ordered per directory level
//! (`walkdir` sorted by file name). Combined with order-preserving JSON
//! maps, this makes bucket order reproducible: file order, then in-file
//! order. That order flows all the way into completion lists, so it is a
//! tested property, not an accident.
//!
//! ## Containment
//!
//! A file that fails to read or parse produces a [`LoadWarning`] and is
//! skipped; it never aborts the folder scan. Empty and whitespace-only files
//! are skipped silently.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::snippet::{NormalizedSnippet, RawSnippetEntry};

/// File suffix that is always eligible.
pub const SNIPPET_FILE_SUFFIX: &str = ".code-snippets";

/// File suffix eligible only when the source opts in.
pub const JSON_FILE_SUFFIX: &str = ".json";

/// Language key to ordered snippet sequence, for one folder.
pub type LanguageBuckets = BTreeMap<String, Vec<Arc<NormalizedSnippet>>>;

/// A contained, file-level problem encountered during a folder scan.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Result of scanning one snippets folder.
#[derive(Debug, Default)]
pub struct FolderLoad {
    pub buckets: LanguageBuckets,
    /// Files successfully parsed (not counting skipped or empty ones).
    pub files_loaded: usize,
    pub warnings: Vec<LoadWarning>,
}

impl FolderLoad {
    /// Total entries across all buckets. A snippet targeting N languages
    /// counts N times, matching its bucket presence.
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Scan `dir` recursively and load every eligible snippet file.
pub fn load_folder(dir: &Path, include_json: bool) -> FolderLoad {
    let mut load = FolderLoad::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf());
                load.warnings.push(LoadWarning {
                    path,
                    message: error.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_eligible(entry.path(), include_json) {
            continue;
        }

        let path = entry.into_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                load.warnings.push(LoadWarning {
                    path,
                    message: error.to_string(),
                });
                continue;
            }
        };

        if content.trim().is_empty() {
            continue;
        }

        match parse_snippet_file(&path, &content) {
            Ok(snippets) => {
                load.files_loaded += 1;
                for snippet in snippets {
                    let snippet = Arc::new(snippet);
                    // One shared value lands in every bucket it targets.
                    for language in &snippet.target_languages {
                        load.buckets
                            .entry(language.clone())
                            .or_default()
                            .push(Arc::clone(&snippet));
                    }
                }
            }
            Err(error) => {
                load.warnings.push(LoadWarning {
                    path,
                    message: error.to_string(),
                });
            }
        }
    }

    load
}

/// Whether a file path is eligible for loading.
pub fn is_eligible(path: &Path, include_json: bool) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(SNIPPET_FILE_SUFFIX) || (include_json && name.ends_with(JSON_FILE_SUFFIX))
}

/// Parse one snippet file: a JSON object of name -> entry.
fn parse_snippet_file(path: &Path, content: &str) -> Result<Vec<NormalizedSnippet>> {
    let entries: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|e| Error::SnippetFileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut snippets = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        let raw: RawSnippetEntry =
            serde_json::from_value(value).map_err(|e| Error::SnippetFileParse {
                path: path.to_path_buf(),
                message: format!("entry \"{}\": {}", name, e),
            })?;
        let snippet =
            NormalizedSnippet::from_raw(&name, raw).map_err(|message| Error::SnippetFileParse {
                path: path.to_path_buf(),
                message: format!("entry \"{}\": {}", name, message),
            })?;
        snippets.push(snippet);
    }
    Ok(snippets)
}
