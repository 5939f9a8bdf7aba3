//! # Settings Schema and Parsing
//!
//! This module defines the data structures that represent the snippet-sync
//! settings document, as well as the logic for parsing it. The document is an
//! editor-style settings object: a `repositories` array of source entries
//! plus scalar settings, with legacy flat equivalents of a single source's
//! fields honored at the document root.
//!
//! ## Parsing
//!
//! Settings arrive loosely typed: users hand-edit them, and a value of the
//! wrong JSON type must not sink the whole document. The parser therefore
//! hand-walks raw `serde_json::Value` maps and coerces field by field —
//! strings of the wrong type are discarded (treated as absent), booleans of
//! the wrong type fall back to their defaults downstream. Only the
//! strongly-typed [`Settings`] ever reaches the resolver and the pipeline.

use std::path::Path;

use serde_json::Value;

use crate::defaults::DEFAULT_AUTO_SYNC_INTERVAL_MINUTES;
use crate::error::{Error, Result};

/// One raw source entry, fields as configured and not yet validated.
///
/// `None` means the field was absent or carried a value of the wrong type;
/// defaulting happens in the source registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSourceConfig {
    pub name: Option<String>,
    pub local_repo_path: Option<String>,
    pub branch: Option<String>,
    pub snippets_path: Option<String>,
    pub include_json_files: Option<bool>,
    pub enable_git_pull: Option<bool>,
}

impl RawSourceConfig {
    /// Whether any field is configured at all.
    pub fn is_configured(&self) -> bool {
        *self != Self::default()
    }
}

/// Parsed settings document.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Explicit source list (`repositories`). May be empty.
    pub sources: Vec<RawSourceConfig>,
    /// Legacy flat single-source fields read from the document root.
    pub legacy: RawSourceConfig,
    /// Minutes between timer-triggered cycles; `0` disables the timer.
    pub auto_sync_interval_minutes: u64,
    /// Gates verbose per-source output.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            legacy: RawSourceConfig::default(),
            auto_sync_interval_minutes: DEFAULT_AUTO_SYNC_INTERVAL_MINUTES,
            debug: false,
        }
    }
}

/// Parses a JSON string into [`Settings`].
pub fn parse(content: &str) -> Result<Settings> {
    let value: Value = serde_json::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
    })?;

    let root = value.as_object().ok_or_else(|| Error::ConfigParse {
        message: "Settings document must be a JSON object".to_string(),
    })?;

    let sources = match root.get("repositories") {
        Some(Value::Array(entries)) => entries.iter().map(source_from_value).collect(),
        _ => Vec::new(),
    };

    Ok(Settings {
        sources,
        legacy: source_from_value(&value),
        auto_sync_interval_minutes: root
            .get("autoSyncIntervalMinutes")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_AUTO_SYNC_INTERVAL_MINUTES),
        debug: root.get("debug").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Reads and parses a settings file.
pub fn from_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Extract one source entry from a raw JSON value.
///
/// A non-object entry yields an entirely-unset config, which the registry
/// later drops for lacking a path.
fn source_from_value(value: &Value) -> RawSourceConfig {
    let map = match value.as_object() {
        Some(map) => map,
        None => return RawSourceConfig::default(),
    };

    RawSourceConfig {
        name: string_field(map, "name"),
        local_repo_path: string_field(map, "localRepoPath"),
        branch: string_field(map, "branch"),
        snippets_path: string_field(map, "snippetsPath"),
        include_json_files: bool_field(map, "includeJsonFiles"),
        enable_git_pull: bool_field(map, "enableGitPull"),
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn bool_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}
