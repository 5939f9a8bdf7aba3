//! # Snippet Sync Library
//!
//! This library provides the core functionality for merging code snippets
//! sourced from multiple local version-controlled repositories into a single
//! aggregated, language-keyed completion table. It is designed to be used by
//! the `snippet-sync` command-line tool but can also be embedded in other
//! hosts (an editor integration, a language server) that bring their own
//! completion-registration and status surfaces.
//!
//! ## Quick Example
//!
//! ```
//! use snippet_sync::config;
//! use snippet_sync::pipeline::{CycleTrigger, SyncEngine};
//! use snippet_sync::publish::NullSink;
//!
//! // Parse a settings document (here: one with no sources).
//! let settings = config::parse(r#"{"repositories": []}"#).unwrap();
//!
//! // Run one publication cycle. With nothing configured this publishes the
//! // empty state, which is a valid terminal state rather than an error.
//! let engine = SyncEngine::new(std::env::current_dir().unwrap());
//! let report = engine.run_cycle(&settings, false, CycleTrigger::Manual, &NullSink, &NullSink);
//! assert_eq!(report.total_snippets, 0);
//! assert_eq!(report.error_count, 0);
//! ```
//!
//! ## Core Concepts
//!
//! - **Settings (`config`)**: the loosely-typed settings document, coerced
//!   into typed data at the boundary.
//! - **Source Registry (`registry`)**: resolves settings entries into
//!   validated [`registry::SourceDescriptor`]s with defaulting and path
//!   resolution.
//! - **Repository Synchronizer (`sync`, `git`)**: per-source
//!   fast-forward-only pull with a hard timeout, behind a mockable trait.
//! - **Snippet Loader (`loader`, `snippet`)**: walks a snippets folder in
//!   stable order, parses and normalizes entries, groups them by target
//!   language.
//! - **Aggregation (`aggregate`, `table`)**: merges per-source buckets into
//!   one [`table::SnippetTable`] plus per-source statuses.
//! - **Publication (`pipeline`, `publish`)**: runs the whole cycle and swaps
//!   the published state atomically for its consumers.
//! - **Watching (`watch`)**: debounced file-change detection feeding
//!   file-change-triggered cycles.
//!
//! ## Execution Flow
//!
//! Each cycle runs resolve → sync → load → aggregate → publish, strictly
//! sequentially over sources. Cycles are independent and idempotent: a run
//! never mutates the previously published state until it completes, and two
//! cycles over identical configuration and disk content publish identical
//! tables.

pub mod aggregate;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod registry;
pub mod snippet;
pub mod sync;
pub mod table;
pub mod watch;
