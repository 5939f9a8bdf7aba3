//! Sync command implementation
//!
//! Runs one manually-triggered publication cycle: resolve sources, pull each
//! enabled source fast-forward-only, load and aggregate the snippets, and
//! print the resulting per-source status. Per-source errors are reported but
//! never fail the command; a cycle always completes and always publishes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use snippet_sync::output::{emoji, OutputConfig};
use snippet_sync::pipeline::{CycleTrigger, SyncEngine};
use snippet_sync::publish::NullSink;

use super::{load_settings, print_source_statuses, ConsoleStatus};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", env = "SNIPPET_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace root for resolving relative source paths
    /// (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Skip `git pull` and load whatever is on disk
    #[arg(long)]
    pub no_pull: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, output: &OutputConfig) -> Result<()> {
    let (settings_path, settings) = load_settings(args.config)?;
    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if !args.quiet {
        println!(
            "{} Syncing snippet sources ({})",
            emoji(output, "🔄", "[SYNC]"),
            settings_path.display()
        );
    }

    let engine = SyncEngine::new(workspace);
    let reporter = ConsoleStatus::new(output.clone(), args.quiet);
    let report = engine.run_cycle(
        &settings,
        !args.no_pull,
        CycleTrigger::Manual,
        &NullSink,
        &reporter,
    );

    if !args.quiet && (settings.debug || report.error_count > 0) {
        print_source_statuses(&report.statuses, output);
    }

    Ok(())
}
