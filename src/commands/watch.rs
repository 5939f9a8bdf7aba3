//! Watch command implementation
//!
//! Long-running mode: after an initial cycle, the command keeps the
//! published table current from three trigger producers:
//!
//! - debounced file-change events under the sources' snippets folders
//!   (version-control-internal paths excluded, so the cycle's own pull
//!   cannot re-trigger it),
//! - a periodic timer (`autoSyncIntervalMinutes`; `0` disables it),
//! - changes to the settings file itself, which re-resolve the sources and
//!   re-scope the watcher.
//!
//! Timer and file-change cycles are silent (indicator line only); settings
//! changes notify like a manual sync.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;

use snippet_sync::config::{self, Settings};
use snippet_sync::defaults::WATCH_DEBOUNCE;
use snippet_sync::output::{emoji, OutputConfig};
use snippet_sync::pipeline::{CycleTrigger, SyncEngine};
use snippet_sync::publish::NullSink;
use snippet_sync::registry;
use snippet_sync::watch::DebouncedWatcher;

use super::{load_settings, ConsoleStatus};

/// How often the trigger producers are polled.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", env = "SNIPPET_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace root for resolving relative source paths
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Skip `git pull` on every cycle
    #[arg(long)]
    pub no_pull: bool,

    /// Override autoSyncIntervalMinutes (0 disables the timer)
    #[arg(long, value_name = "MINUTES")]
    pub interval: Option<u64>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `watch` command. Runs until interrupted.
pub fn execute(args: WatchArgs, output: &OutputConfig) -> Result<()> {
    let (settings_path, mut settings) = load_settings(args.config)?;
    apply_interval_override(&mut settings, args.interval);
    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let allow_pull = !args.no_pull;

    if !args.quiet {
        println!(
            "{} Watching snippet sources ({})",
            emoji(output, "👀", "[WATCH]"),
            settings_path.display()
        );
    }

    let engine = SyncEngine::new(workspace.clone());
    let reporter = ConsoleStatus::with_updates(output.clone(), args.quiet);

    engine.run_cycle(&settings, allow_pull, CycleTrigger::Manual, &NullSink, &reporter);
    let mut last_cycle = Instant::now();

    let mut source_watcher = build_source_watcher(&settings, &workspace)?;
    let mut settings_watcher =
        DebouncedWatcher::non_recursive(&[settings_path.clone()], WATCH_DEBOUNCE)?;

    loop {
        thread::sleep(POLL_INTERVAL);

        if settings_watcher.poll().is_some() {
            match config::from_file(&settings_path) {
                Ok(mut reloaded) => {
                    apply_interval_override(&mut reloaded, args.interval);
                    settings = reloaded;
                    source_watcher = build_source_watcher(&settings, &workspace)?;
                    engine.run_cycle(
                        &settings,
                        allow_pull,
                        CycleTrigger::ConfigChange,
                        &NullSink,
                        &reporter,
                    );
                    last_cycle = Instant::now();
                }
                Err(error) => {
                    log::warn!("Keeping previous settings; reload failed: {}", error);
                }
            }
            continue;
        }

        if source_watcher.poll().is_some() {
            engine.run_cycle(
                &settings,
                allow_pull,
                CycleTrigger::FileChange,
                &NullSink,
                &reporter,
            );
            last_cycle = Instant::now();
            continue;
        }

        let interval_minutes = settings.auto_sync_interval_minutes;
        if interval_minutes > 0
            && last_cycle.elapsed() >= Duration::from_secs(interval_minutes * 60)
        {
            engine.run_cycle(
                &settings,
                allow_pull,
                CycleTrigger::Timer,
                &NullSink,
                &reporter,
            );
            last_cycle = Instant::now();
        }
    }
}

fn apply_interval_override(settings: &mut Settings, interval: Option<u64>) {
    if let Some(minutes) = interval {
        settings.auto_sync_interval_minutes = minutes;
    }
}

/// Watch each resolved source's snippets folder recursively.
fn build_source_watcher(settings: &Settings, workspace: &Path) -> Result<DebouncedWatcher> {
    let roots: Vec<PathBuf> = registry::resolve_sources(settings, workspace)
        .iter()
        .map(|descriptor| descriptor.snippets_dir())
        .collect();
    Ok(DebouncedWatcher::recursive(&roots, WATCH_DEBOUNCE)?)
}
