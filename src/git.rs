//! Git plumbing for source repositories.
//!
//! This uses the system git command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! The only mutation performed is a fast-forward-only pull: the local branch
//! advances only if it can do so without divergence or a merge. Every pull is
//! bounded by a hard deadline; a pull that outlives it is killed and reported
//! as a failure, never left running.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// How often a running pull is checked against its deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Whether a path exists and carries a version-control marker.
pub fn is_version_controlled(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Captured output of a finished pull.
#[derive(Debug, Clone, Default)]
pub struct PullOutput {
    pub stdout: String,
    pub stderr: String,
}

impl PullOutput {
    /// Combined stdout/stderr for diagnostics.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !combined.is_empty() {
                combined.push('\n');
            }
            combined.push_str(stderr);
        }
        combined
    }
}

/// Run `git pull --ff-only origin <branch>` in `repo_path`.
///
/// Blocks the caller for up to `timeout`. A non-zero exit yields
/// [`Error::PullFailed`] carrying the combined output; on timeout the child
/// is killed and the same variant is returned with a timeout note.
pub fn pull_ff_only(repo_path: &Path, branch: &str, timeout: Duration) -> Result<PullOutput> {
    let mut child = Command::new("git")
        .args(["pull", "--ff-only", "origin", branch])
        .current_dir(repo_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitCommand {
            command: format!("git pull --ff-only origin {}", branch),
            message: e.to_string(),
        })?;

    // Drain both pipes off-thread so a chatty pull can't block on a full pipe
    // while we poll for exit.
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match wait_with_deadline(&mut child, timeout)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            let output = PullOutput {
                stdout: join_reader(stdout_reader),
                stderr: join_reader(stderr_reader),
            };
            return Err(Error::PullFailed {
                path: repo_path.to_path_buf(),
                branch: branch.to_string(),
                output: timeout_message(timeout, &output),
            });
        }
    };

    let output = PullOutput {
        stdout: join_reader(stdout_reader),
        stderr: join_reader(stderr_reader),
    };

    if status.success() {
        Ok(output)
    } else {
        Err(Error::PullFailed {
            path: repo_path.to_path_buf(),
            branch: branch.to_string(),
            output: output.combined(),
        })
    }
}

/// Poll the child until it exits or the deadline passes.
///
/// Returns `Ok(None)` on timeout; the caller owns the kill.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut source) = source {
            let _ = source.read_to_string(&mut buffer);
        }
        buffer
    })
}

fn join_reader(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

fn timeout_message(timeout: Duration, output: &PullOutput) -> String {
    let combined = output.combined();
    if combined.is_empty() {
        format!("timed out after {} seconds", timeout.as_secs())
    } else {
        format!(
            "timed out after {} seconds; partial output: {}",
            timeout.as_secs(),
            combined
        )
    }
}
