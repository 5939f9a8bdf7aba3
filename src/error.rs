//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `snippet-sync`. It uses the `thiserror` library to create a comprehensive
//! `Error` enum covering all anticipated failure modes, providing clear and
//! descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum representing all errors that can occur within
//!   the engine. Each variant corresponds to a specific failure and carries
//!   contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library to simplify function signatures.
//!
//! Most failures are contained at the source or file level: the publication
//! pipeline renders them into per-source status text rather than aborting a
//! cycle. The variants here are the typed form those messages come from.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for snippet-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the settings file.
    #[error("Settings parsing error: {message}")]
    ConfigParse { message: String },

    /// A source root is missing or lacks a version-control marker.
    ///
    /// The source is skipped for the cycle; no pull is attempted.
    #[error("Not a version-controlled path: {}", path.display())]
    NotARepository { path: PathBuf },

    /// A fast-forward-only pull exited non-zero or timed out.
    ///
    /// Carries the combined stdout/stderr of the `git` invocation. Non-fatal:
    /// loading proceeds against whatever is on disk.
    #[error("Pull failed for {} on branch {branch}: {output}", path.display())]
    PullFailed {
        path: PathBuf,
        branch: String,
        output: String,
    },

    /// The `git` subprocess could not be launched at all.
    #[error("Git command failed: {command}: {message}")]
    GitCommand { command: String, message: String },

    /// The configured snippets folder is absent after a (possibly failed) pull.
    #[error("Snippets folder missing: {}", path.display())]
    SnippetsFolderMissing { path: PathBuf },

    /// One snippet file's content is not a valid snippet mapping.
    ///
    /// The file is skipped; the rest of the source's files still load.
    #[error("Snippet file parse error in {}: {message}", path.display())]
    SnippetFileParse { path: PathBuf, message: String },

    /// An error occurred while setting up or running a file watcher.
    #[error("File watch error: {message}")]
    Watch { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
