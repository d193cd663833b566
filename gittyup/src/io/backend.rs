//! Version-control backend abstraction.
//!
//! The [`Backend`] trait decouples the action handlers from the actual
//! version-control engine. Every failure comes back as a [`BackendFailure`]
//! tagged with the operation that produced it, so callers can tell "failed"
//! apart from "succeeded with nothing to report". Tests use a scripted backend
//! that records calls without touching a repository.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::core::snapshot::StatusSnapshot;
use crate::core::types::Selection;
use crate::io::git::Git;

/// Backend primitive a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Status,
    Add,
    Reset,
    Commit,
    Push,
    Pull,
}

impl Operation {
    fn gerund(self) -> &'static str {
        match self {
            Operation::Status => "reading status",
            Operation::Add => "adding",
            Operation::Reset => "unstaging",
            Operation::Commit => "committing",
            Operation::Push => "pushing",
            Operation::Pull => "pulling",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Status => "status",
            Operation::Add => "add",
            Operation::Reset => "reset",
            Operation::Commit => "commit",
            Operation::Push => "push",
            Operation::Pull => "pull",
        };
        f.write_str(name)
    }
}

/// A backend operation was rejected or could not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error {}: {cause}", .operation.gerund())]
pub struct BackendFailure {
    pub operation: Operation,
    pub cause: String,
}

impl BackendFailure {
    pub fn new(operation: Operation, cause: impl Into<String>) -> Self {
        Self {
            operation,
            cause: cause.into(),
        }
    }

    fn from_anyhow(operation: Operation, err: &anyhow::Error) -> Self {
        Self::new(operation, format!("{err:#}"))
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitSummary {
    /// Short SHA of the new commit, when it could be read back.
    pub short_sha: Option<String>,
}

/// Version-control primitives used by the action handlers.
///
/// `dir` is the repository working directory. Stage and unstage take a
/// [`Selection`], which is never empty.
pub trait Backend {
    fn query_status(&self, dir: &Path) -> Result<StatusSnapshot, BackendFailure>;
    fn stage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure>;
    fn unstage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure>;
    fn commit(&self, dir: &Path, message: &str) -> Result<CommitSummary, BackendFailure>;
    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), BackendFailure>;
    fn pull(&self, dir: &Path) -> Result<(), BackendFailure>;
}

/// Backend that shells out to the `git` binary.
#[derive(Debug, Clone)]
pub struct GitBackend {
    binary: String,
}

impl GitBackend {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn git(&self, dir: &Path) -> Git {
        Git::with_binary(self.binary.as_str(), dir)
    }
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new("git")
    }
}

fn tag<T>(operation: Operation, result: anyhow::Result<T>) -> Result<T, BackendFailure> {
    result.map_err(|err| {
        let failure = BackendFailure::from_anyhow(operation, &err);
        warn!(%operation, cause = %failure.cause, "backend operation failed");
        failure
    })
}

impl Backend for GitBackend {
    #[instrument(skip_all, fields(dir = %dir.display()))]
    fn query_status(&self, dir: &Path) -> Result<StatusSnapshot, BackendFailure> {
        let status = tag(Operation::Status, self.git(dir).status())?;
        Ok(StatusSnapshot::classify(
            status.head,
            &status.entries,
            Utc::now(),
        ))
    }

    #[instrument(skip_all, fields(count = files.paths().len()))]
    fn stage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure> {
        tag(Operation::Add, self.git(dir).add(files.paths()))
    }

    #[instrument(skip_all, fields(count = files.paths().len()))]
    fn unstage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure> {
        tag(Operation::Reset, self.git(dir).reset_paths(files.paths()))
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<CommitSummary, BackendFailure> {
        let git = self.git(dir);
        tag(Operation::Commit, git.commit(message))?;
        let short_sha = match git.head_short_sha(7) {
            Ok(sha) => Some(sha),
            Err(err) => {
                warn!(err = %err, "could not read new commit sha");
                None
            }
        };
        Ok(CommitSummary { short_sha })
    }

    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), BackendFailure> {
        tag(Operation::Push, self.git(dir).push(remote, branch))
    }

    fn pull(&self, dir: &Path) -> Result<(), BackendFailure> {
        tag(Operation::Pull, self.git(dir).pull())
    }
}
