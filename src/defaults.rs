//! Default values for snippet-sync configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;
use std::time::Duration;

/// Settings file name looked up in the working directory.
pub const DEFAULT_SETTINGS_FILENAME: &str = ".snippet-sync.json";

/// Branch pulled when a source does not configure one.
pub const DEFAULT_BRANCH: &str = "main";

/// Relative snippets folder used when a source does not configure one.
pub const DEFAULT_SNIPPETS_DIR: &str = "snippets";

/// Hard deadline for a single `git pull` invocation.
pub const PULL_TIMEOUT: Duration = Duration::from_secs(60);

/// Quiet window for coalescing bursts of file-change events.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(750);

/// Minutes between timer-triggered cycles when the setting is absent.
pub const DEFAULT_AUTO_SYNC_INTERVAL_MINUTES: u64 = 30;

/// Returns the user-level settings file path.
///
/// Uses the platform-appropriate configuration directory:
/// - Linux: `~/.config/snippet-sync/settings.json` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/snippet-sync/settings.json`
/// - Windows: `{FOLDERID_RoamingAppData}\snippet-sync\settings.json`
///
/// Falls back to `.snippet-sync.json` in the current directory if the
/// platform config directory cannot be determined.
pub fn user_settings_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("snippet-sync").join("settings.json"),
        None => PathBuf::from(DEFAULT_SETTINGS_FILENAME),
    }
}

/// Resolve the settings file to read.
///
/// Order: an explicit path (CLI flag or `SNIPPET_SYNC_CONFIG`), then
/// `.snippet-sync.json` in the current directory if present, then the
/// user-level settings file.
pub fn discover_settings_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(DEFAULT_SETTINGS_FILENAME);
    if local.exists() {
        return local;
    }
    user_settings_path()
}
