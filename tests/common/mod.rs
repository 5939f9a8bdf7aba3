//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::{configs, TestFixture};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_settings(configs::SINGLE_SOURCE)
//!         .with_source_repo("team-snippets");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Common settings documents and snippet files for testing.
#[allow(dead_code)]
pub mod configs {
    /// One source named `team-snippets`, relative to the workspace root.
    pub const SINGLE_SOURCE: &str = r#"{
  "repositories": [
    {
      "localRepoPath": "team-snippets",
      "snippetsPath": "snippets",
      "includeJsonFiles": true,
      "enableGitPull": false
    }
  ]
}"#;

    /// Two sources, `alpha` then `beta`, pulls disabled.
    pub const TWO_SOURCES: &str = r#"{
  "repositories": [
    {"name": "alpha", "localRepoPath": "alpha", "enableGitPull": false},
    {"name": "beta", "localRepoPath": "beta", "enableGitPull": false}
  ]
}"#;

    /// No sources at all.
    pub const EMPTY: &str = r#"{"repositories": []}"#;

    /// A snippet file with one JavaScript-scoped entry.
    pub const LOG_SNIPPET: &str = r#"{
  "Log": {
    "prefix": "logv",
    "body": ["console.log(${1});"],
    "scope": "javascript"
  }
}"#;

    /// A snippet file with one globally-scoped entry.
    pub const GLOBAL_SNIPPET: &str = r#"{
  "Note": {
    "prefix": "note",
    "body": "// NOTE: $1",
    "description": "Leave a note"
  }
}"#;

    /// Not valid JSON.
    pub const MALFORMED_SNIPPET: &str = "{ this is not json";
}

/// A test fixture providing a temporary workspace with a settings file and
/// fake version-controlled source repositories.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.snippet-sync.json` settings file with the given content.
    pub fn with_settings(self, content: &str) -> Self {
        self.temp_dir
            .child(".snippet-sync.json")
            .write_str(content)
            .expect("Failed to write settings file");
        self
    }

    /// Add a fake source repository: a directory carrying a `.git` marker
    /// and an empty `snippets/` folder.
    pub fn with_source_repo(self, name: &str) -> Self {
        self.temp_dir
            .child(name)
            .child(".git")
            .create_dir_all()
            .expect("Failed to create .git marker");
        self.temp_dir
            .child(name)
            .child("snippets")
            .create_dir_all()
            .expect("Failed to create snippets folder");
        self
    }

    /// Add a file with the given workspace-relative path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the settings file.
    pub fn settings_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".snippet-sync.json")
    }

    /// Create a command configured to run in this fixture's workspace.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("snippet-sync")
            .expect("snippet-sync binary should build");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
