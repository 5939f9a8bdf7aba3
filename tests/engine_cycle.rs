//! End-to-end cycle tests for the merge-and-refresh engine.
//!
//! These drive the library directly: temp workspaces with fake
//! version-controlled sources (a `.git` marker directory is all the
//! precondition checks), pulls disabled or mocked so no network or git
//! binary is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use snippet_sync::config::{self, Settings};
use snippet_sync::git::PullOutput;
use snippet_sync::pipeline::{CycleTrigger, SyncEngine};
use snippet_sync::publish::{CompletionSink, NullSink, PublishedState};
use snippet_sync::snippet::GLOBAL_LANGUAGE;
use snippet_sync::sync::GitOperations;

/// Create a fake source repository under the workspace: `.git` marker plus
/// an empty snippets folder.
fn source_repo(workspace: &Path, name: &str) -> PathBuf {
    let repo = workspace.join(name);
    fs::create_dir_all(repo.join(".git")).unwrap();
    fs::create_dir_all(repo.join("snippets")).unwrap();
    repo
}

fn write_snippet(repo: &Path, file: &str, content: &str) {
    fs::write(repo.join("snippets").join(file), content).unwrap();
}

/// Settings with one entry per repo name, pulls disabled.
fn settings_for(names: &[&str]) -> Settings {
    let entries: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "localRepoPath": name,
                "includeJsonFiles": true,
                "enableGitPull": false
            })
        })
        .collect();
    let document = serde_json::json!({ "repositories": entries });
    config::parse(&document.to_string()).unwrap()
}

fn run(engine: &SyncEngine, settings: &Settings) -> snippet_sync::pipeline::CycleReport {
    engine.run_cycle(settings, false, CycleTrigger::Manual, &NullSink, &NullSink)
}

#[test]
fn test_single_source_end_to_end() {
    let workspace = TempDir::new().unwrap();
    let repo = source_repo(workspace.path(), "team-snippets");
    write_snippet(
        &repo,
        "demo.code-snippets",
        r#"{"Log": {"prefix": "logv", "body": ["console.log(${1});"], "scope": "javascript"}}"#,
    );

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let report = run(&engine, &settings_for(&["team-snippets"]));

    assert_eq!(report.total_snippets, 1);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.warning_count, 0);

    let state = engine.published().current();
    let bucket = state.table.bucket("javascript");
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].prefixes, vec!["logv"]);
    assert_eq!(bucket[0].body_lines, vec!["console.log(${1});"]);
}

#[test]
fn test_identical_cycles_publish_identical_tables() {
    let workspace = TempDir::new().unwrap();
    let repo = source_repo(workspace.path(), "team-snippets");
    write_snippet(
        &repo,
        "a.code-snippets",
        r#"{"One": {"prefix": "one", "body": "1"}, "Two": {"prefix": "two", "body": "2", "scope": "rust"}}"#,
    );
    write_snippet(
        &repo,
        "b.code-snippets",
        r#"{"Three": {"prefix": "three", "body": "3", "scope": "rust, go"}}"#,
    );

    let settings = settings_for(&["team-snippets"]);
    let engine_a = SyncEngine::new(workspace.path().to_path_buf());
    let engine_b = SyncEngine::new(workspace.path().to_path_buf());
    run(&engine_a, &settings);
    run(&engine_b, &settings);

    let state_a = engine_a.published().current();
    let state_b = engine_b.published().current();
    assert_eq!(state_a.table, state_b.table);
}

#[test]
fn test_global_and_scoped_snippets_merge_per_language() {
    let workspace = TempDir::new().unwrap();
    let alpha = source_repo(workspace.path(), "alpha");
    let beta = source_repo(workspace.path(), "beta");
    write_snippet(
        &alpha,
        "global.code-snippets",
        r#"{"Note": {"prefix": "note", "body": "// NOTE"}}"#,
    );
    write_snippet(
        &beta,
        "js.code-snippets",
        r#"{"Log": {"prefix": "logv", "body": "log", "scope": "javascript"}}"#,
    );

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    run(&engine, &settings_for(&["alpha", "beta"]));

    let state = engine.published().current();
    let merged = state.table.completions_for("javascript");
    let javascript: Vec<&str> = merged.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(javascript, vec!["Note", "Log"]);

    // A language with no scoped snippets anywhere receives only the globals.
    let merged = state.table.completions_for("python");
    let python: Vec<&str> = merged.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(python, vec!["Note"]);
}

#[test]
fn test_bucket_order_follows_source_then_file_order() {
    let workspace = TempDir::new().unwrap();
    let alpha = source_repo(workspace.path(), "alpha");
    let beta = source_repo(workspace.path(), "beta");
    write_snippet(&alpha, "z.code-snippets", r#"{"A2": {"prefix": "a2", "body": ""}}"#);
    write_snippet(&alpha, "a.code-snippets", r#"{"A1": {"prefix": "a1", "body": ""}}"#);
    write_snippet(&beta, "a.code-snippets", r#"{"B1": {"prefix": "b1", "body": ""}}"#);

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    run(&engine, &settings_for(&["alpha", "beta"]));

    let state = engine.published().current();
    let names: Vec<&str> = state
        .table
        .bucket(GLOBAL_LANGUAGE)
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["A1", "A2", "B1"]);
}

#[test]
fn test_duplicates_across_sources_are_both_kept() {
    let workspace = TempDir::new().unwrap();
    let alpha = source_repo(workspace.path(), "alpha");
    let beta = source_repo(workspace.path(), "beta");
    let same = r#"{"Same": {"prefix": "dup", "body": "x"}}"#;
    write_snippet(&alpha, "s.code-snippets", same);
    write_snippet(&beta, "s.code-snippets", same);

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let report = run(&engine, &settings_for(&["alpha", "beta"]));

    assert_eq!(report.total_snippets, 2);
    let state = engine.published().current();
    assert_eq!(state.table.bucket(GLOBAL_LANGUAGE).len(), 2);
}

/// Git operations that report honestly on the marker but panic if a pull is
/// ever attempted.
struct PanicOnPull;

impl GitOperations for PanicOnPull {
    fn is_version_controlled(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    fn pull_ff_only(
        &self,
        _path: &Path,
        _branch: &str,
        _timeout: Duration,
    ) -> snippet_sync::error::Result<PullOutput> {
        panic!("pull must not be attempted for a non-version-controlled source");
    }
}

#[test]
fn test_source_without_git_marker_errors_without_pull_and_siblings_load() {
    let workspace = TempDir::new().unwrap();
    // `broken` has a snippets folder but no .git marker.
    let broken = workspace.path().join("broken");
    fs::create_dir_all(broken.join("snippets")).unwrap();
    let healthy = source_repo(workspace.path(), "healthy");
    write_snippet(
        &healthy,
        "ok.code-snippets",
        r#"{"Works": {"prefix": "ok", "body": "fine"}}"#,
    );

    // Pulls allowed and enabled: the precondition must still keep git away
    // from the broken source, and `healthy` has pulls disabled per-source.
    let document = serde_json::json!({
        "repositories": [
            {"localRepoPath": "broken"},
            {"localRepoPath": "healthy", "enableGitPull": false}
        ]
    });
    let settings = config::parse(&document.to_string()).unwrap();

    let engine = SyncEngine::with_git(workspace.path().to_path_buf(), Box::new(PanicOnPull));
    let report = engine.run_cycle(&settings, true, CycleTrigger::Manual, &NullSink, &NullSink);

    assert_eq!(report.error_count, 1);
    assert_eq!(report.total_snippets, 1);

    let state = engine.published().current();
    assert_eq!(state.statuses.len(), 2);
    let broken_status = &state.statuses[0];
    assert!(broken_status
        .last_error
        .as_deref()
        .unwrap()
        .contains("Not a version-controlled path"));
    assert_eq!(broken_status.snippet_count, 0);
    assert!(broken_status.last_sync.is_none());
    assert_eq!(state.statuses[1].snippet_count, 1);
    assert!(state.statuses[1].last_error.is_none());
}

#[test]
fn test_malformed_file_warns_but_source_stays_healthy() {
    let workspace = TempDir::new().unwrap();
    let repo = source_repo(workspace.path(), "team-snippets");
    write_snippet(&repo, "a.code-snippets", r#"{"A": {"prefix": "a", "body": "a"}}"#);
    write_snippet(&repo, "b.code-snippets", "{ not json");
    write_snippet(&repo, "c.code-snippets", r#"{"C": {"prefix": "c", "body": "c"}}"#);

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let report = run(&engine, &settings_for(&["team-snippets"]));

    assert_eq!(report.warning_count, 1);
    assert_eq!(report.total_snippets, 2);
    // Parse warnings are file-level, not source-fatal.
    assert_eq!(report.error_count, 0);
    assert!(report.statuses[0].last_error.is_none());
}

#[test]
fn test_missing_snippets_folder_is_a_source_error() {
    let workspace = TempDir::new().unwrap();
    let repo = workspace.path().join("bare");
    fs::create_dir_all(repo.join(".git")).unwrap();

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let report = run(&engine, &settings_for(&["bare"]));

    assert_eq!(report.error_count, 1);
    assert!(report.statuses[0]
        .last_error
        .as_deref()
        .unwrap()
        .contains("Snippets folder missing"));
    assert_eq!(report.statuses[0].snippet_count, 0);
}

#[test]
fn test_empty_configuration_publishes_empty_state() {
    let workspace = TempDir::new().unwrap();
    let settings = config::parse(r#"{"repositories": []}"#).unwrap();

    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let report = run(&engine, &settings);

    assert_eq!(report.total_snippets, 0);
    assert_eq!(report.error_count, 0);
    assert!(report.statuses.is_empty());
    assert_eq!(report.summary(), "No snippet sources configured");

    let state = engine.published().current();
    assert!(state.table.is_empty());
    assert!(state.statuses.is_empty());
}

#[test]
fn test_statuses_are_replaced_not_merged_across_cycles() {
    let workspace = TempDir::new().unwrap();
    let repo = workspace.path().join("repo");
    fs::create_dir_all(repo.join("snippets")).unwrap();
    write_snippet(&repo, "ok.code-snippets", r#"{"A": {"prefix": "a", "body": "a"}}"#);

    let settings = settings_for(&["repo"]);
    let engine = SyncEngine::new(workspace.path().to_path_buf());

    // First cycle: no .git marker, so the source errors out.
    let report = run(&engine, &settings);
    assert_eq!(report.error_count, 1);

    // The repository becomes version-controlled; the next cycle's status set
    // fully replaces the old one.
    fs::create_dir_all(repo.join(".git")).unwrap();
    let report = run(&engine, &settings);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.total_snippets, 1);

    let state = engine.published().current();
    assert_eq!(state.statuses.len(), 1);
    assert!(state.statuses[0].last_error.is_none());
    assert!(state.statuses[0].last_sync.is_some());
}

/// Completion sink that records every published total.
struct CollectingSink {
    totals: Mutex<Vec<usize>>,
}

impl CompletionSink for CollectingSink {
    fn replace_all(&self, state: &PublishedState) {
        self.totals.lock().unwrap().push(state.total_snippets());
    }
}

#[test]
fn test_completion_sink_sees_every_publish_after_the_swap() {
    let workspace = TempDir::new().unwrap();
    let repo = source_repo(workspace.path(), "repo");
    write_snippet(&repo, "ok.code-snippets", r#"{"A": {"prefix": "a", "body": "a"}}"#);

    let settings = settings_for(&["repo"]);
    let engine = SyncEngine::new(workspace.path().to_path_buf());
    let sink = CollectingSink {
        totals: Mutex::new(Vec::new()),
    };

    engine.run_cycle(&settings, false, CycleTrigger::Timer, &sink, &NullSink);
    engine.run_cycle(&settings, false, CycleTrigger::Timer, &sink, &NullSink);

    assert_eq!(*sink.totals.lock().unwrap(), vec![1, 1]);
}
