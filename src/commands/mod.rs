//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `snippet-sync` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `snippet_sync` library for the core
//!   engine.

pub mod completions;
pub mod ls;
pub mod sync;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;

use snippet_sync::config::{self, Settings};
use snippet_sync::defaults;
use snippet_sync::output::{emoji, status_line, OutputConfig};
use snippet_sync::publish::{PublishedState, StatusSink};

/// Resolve and load the settings file shared by the engine-driving commands.
pub(crate) fn load_settings(explicit: Option<PathBuf>) -> Result<(PathBuf, Settings)> {
    let path = defaults::discover_settings_path(explicit);
    if !path.exists() {
        anyhow::bail!("Settings file not found: {}", path.display());
    }
    let settings = config::from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load settings from {}: {}", path.display(), e))?;
    Ok((path, settings))
}

/// Status sink that renders to the terminal.
///
/// `show_updates` makes every publish print the indicator line (used by
/// `watch`, where silent cycles are otherwise invisible); notifications are
/// printed for notifying triggers unless `quiet`.
pub(crate) struct ConsoleStatus {
    output: OutputConfig,
    quiet: bool,
    show_updates: bool,
}

impl ConsoleStatus {
    pub(crate) fn new(output: OutputConfig, quiet: bool) -> Self {
        Self {
            output,
            quiet,
            show_updates: false,
        }
    }

    pub(crate) fn with_updates(output: OutputConfig, quiet: bool) -> Self {
        Self {
            output,
            quiet,
            show_updates: true,
        }
    }
}

impl StatusSink for ConsoleStatus {
    fn update(&self, state: &PublishedState) {
        if self.show_updates && !self.quiet {
            let symbol = if state.has_errors() {
                emoji(&self.output, "⚠️", "[WARN]")
            } else {
                emoji(&self.output, "✅", "[OK]")
            };
            println!("{} {}", symbol, status_line(state));
        }
    }

    fn notify(&self, summary: &str) {
        if !self.quiet {
            println!("{} {}", emoji(&self.output, "🔔", "[SYNC]"), summary);
        }
    }
}

/// Print the per-source status lines below a cycle's summary.
pub(crate) fn print_source_statuses(
    statuses: &[snippet_sync::aggregate::SourceStatus],
    output: &OutputConfig,
) {
    for status in statuses {
        match &status.last_error {
            Some(error) => println!(
                "   {} {}: {}",
                emoji(output, "❌", "[ERR]"),
                status.display_name,
                error
            ),
            None => println!(
                "   {} {}: {} snippet{}",
                emoji(output, "📦", "[SRC]"),
                status.display_name,
                status.snippet_count,
                if status.snippet_count == 1 { "" } else { "s" }
            ),
        }
    }
}
