//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists the aggregated
//! snippet table. It runs a load-only cycle (no pull) and prints each
//! language bucket, or — with `--language` — the merged completion view a
//! host would register for that language (global bucket followed by the
//! language's own bucket) together with its derived trigger characters.
//!
//! This command is a safe, read-only operation apart from the load itself.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use snippet_sync::output::{emoji, status_line, OutputConfig};
use snippet_sync::pipeline::{CycleTrigger, SyncEngine};
use snippet_sync::publish::NullSink;
use snippet_sync::snippet::NormalizedSnippet;

use super::{load_settings, print_source_statuses};

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", env = "SNIPPET_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace root for resolving relative source paths
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Show the merged completion view for one language
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Use long listing format including descriptions and bodies
    #[arg(short = 'l', long)]
    pub long: bool,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, output: &OutputConfig) -> Result<()> {
    let (_, settings) = load_settings(args.config)?;
    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    // Load-only: no pull, silent trigger, no notification.
    let engine = SyncEngine::new(workspace);
    let report = engine.run_cycle(&settings, false, CycleTrigger::Timer, &NullSink, &NullSink);
    let state = engine.published().current();

    if report.error_count > 0 {
        print_source_statuses(&report.statuses, output);
    }

    match args.language {
        Some(language) => {
            let merged = state.table.completions_for(&language);
            println!("{} ({} snippets)", language.to_lowercase(), merged.len());
            for snippet in &merged {
                print_snippet(snippet, args.long);
            }
            let triggers: String = state.table.trigger_characters(&language).iter().collect();
            println!("trigger characters: {}", triggers);
        }
        None => {
            for key in state.table.language_keys() {
                let bucket = state.table.bucket(key);
                println!("{} ({})", key, bucket.len());
                for snippet in bucket {
                    print_snippet(snippet, args.long);
                }
            }
            println!("{} {}", emoji(output, "📦", "[SUM]"), status_line(&state));
        }
    }

    Ok(())
}

fn print_snippet(snippet: &NormalizedSnippet, long: bool) {
    println!("  {}  {}", snippet.prefixes.join(", "), snippet.name);
    if long {
        if let Some(description) = &snippet.description {
            println!("      {}", description);
        }
        for line in &snippet.body_lines {
            println!("      | {}", line);
        }
    }
}
