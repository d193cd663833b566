//! Collaborators a handler invocation runs against.

use std::path::{Path, PathBuf};

use crate::core::snapshot::StatusSnapshot;
use crate::io::backend::{Backend, BackendFailure};
use crate::io::config::Settings;
use crate::io::prompt::Prompter;
use crate::io::reporter::Reporter;

/// Backend, prompter, and reporter injected into every handler, plus the
/// repository directory and settings they operate with.
pub struct Session<'a, B, P, R> {
    pub backend: &'a B,
    pub prompter: &'a P,
    pub reporter: &'a R,
    pub dir: PathBuf,
    pub settings: Settings,
}

impl<'a, B: Backend, P: Prompter, R: Reporter> Session<'a, B, P, R> {
    pub fn new(
        backend: &'a B,
        prompter: &'a P,
        reporter: &'a R,
        dir: impl Into<PathBuf>,
        settings: Settings,
    ) -> Self {
        Self {
            backend,
            prompter,
            reporter,
            dir: dir.into(),
            settings,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Query a fresh snapshot. Snapshots are never reused across calls.
    pub fn fetch_status(&self) -> Result<StatusSnapshot, BackendFailure> {
        self.backend.query_status(&self.dir)
    }
}
