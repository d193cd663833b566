//! Test-only doubles for the backend, prompter, and reporter, plus a
//! throwaway git repository.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tempfile::TempDir;

use crate::core::snapshot::{StatusEntry, StatusSnapshot};
use crate::core::types::Selection;
use crate::io::backend::{Backend, BackendFailure, CommitSummary, Operation};
use crate::io::prompt::Prompter;
use crate::io::reporter::{Reporter, Section};

/// Build a snapshot from `(code, path)` pairs.
///
/// `code` is `"??"` for untracked, otherwise a porcelain XY pair such as
/// `"A."`, `".M"`, or `"MM"`.
pub fn snapshot(branch: &str, entries: &[(&str, &str)]) -> StatusSnapshot {
    let entries: Vec<StatusEntry> = entries
        .iter()
        .map(|(code, path)| {
            if *code == "??" {
                return StatusEntry::untracked(*path);
            }
            let mut chars = code.chars();
            let index = chars.next().unwrap_or('.');
            let worktree = chars.next().unwrap_or('.');
            StatusEntry::changed(index, worktree, *path)
        })
        .collect();
    StatusSnapshot::classify(branch, &entries, Utc::now())
}

/// A call recorded by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Status { dir: PathBuf },
    Stage { dir: PathBuf, files: Vec<String> },
    Unstage { dir: PathBuf, files: Vec<String> },
    Commit { dir: PathBuf, message: String },
    Push { dir: PathBuf, remote: String, branch: String },
    Pull { dir: PathBuf },
}

impl BackendCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, BackendCall::Status { .. })
    }
}

/// Backend returning queued snapshots and recording every call.
///
/// Snapshots are served in order; the last one keeps being served once the
/// queue is down to a single entry. With no snapshots, status fails.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    snapshots: RefCell<VecDeque<StatusSnapshot>>,
    failures: HashMap<Operation, String>,
    calls: RefCell<Vec<BackendCall>>,
}

impl ScriptedBackend {
    pub fn new(snapshots: Vec<StatusSnapshot>) -> Self {
        Self {
            snapshots: RefCell::new(snapshots.into()),
            ..Self::default()
        }
    }

    /// Make every call of `operation` fail with `cause`.
    pub fn failing(mut self, operation: Operation, cause: &str) -> Self {
        self.failures.insert(operation, cause.to_string());
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_mutation())
            .count()
    }

    pub fn status_count(&self) -> usize {
        self.calls.borrow().len() - self.mutation_count()
    }

    fn record(&self, operation: Operation, call: BackendCall) -> Result<(), BackendFailure> {
        self.calls.borrow_mut().push(call);
        match self.failures.get(&operation) {
            Some(cause) => Err(BackendFailure::new(operation, cause.as_str())),
            None => Ok(()),
        }
    }
}

impl Backend for ScriptedBackend {
    fn query_status(&self, dir: &Path) -> Result<StatusSnapshot, BackendFailure> {
        self.record(
            Operation::Status,
            BackendCall::Status {
                dir: dir.to_path_buf(),
            },
        )?;
        let mut snapshots = self.snapshots.borrow_mut();
        let next = if snapshots.len() > 1 {
            snapshots.pop_front()
        } else {
            snapshots.front().cloned()
        };
        next.ok_or_else(|| BackendFailure::new(Operation::Status, "no scripted snapshot"))
    }

    fn stage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure> {
        self.record(
            Operation::Add,
            BackendCall::Stage {
                dir: dir.to_path_buf(),
                files: files.paths().to_vec(),
            },
        )
    }

    fn unstage(&self, dir: &Path, files: &Selection) -> Result<(), BackendFailure> {
        self.record(
            Operation::Reset,
            BackendCall::Unstage {
                dir: dir.to_path_buf(),
                files: files.paths().to_vec(),
            },
        )
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<CommitSummary, BackendFailure> {
        self.record(
            Operation::Commit,
            BackendCall::Commit {
                dir: dir.to_path_buf(),
                message: message.to_string(),
            },
        )?;
        Ok(CommitSummary {
            short_sha: Some("abc1234".to_string()),
        })
    }

    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), BackendFailure> {
        self.record(
            Operation::Push,
            BackendCall::Push {
                dir: dir.to_path_buf(),
                remote: remote.to_string(),
                branch: branch.to_string(),
            },
        )
    }

    fn pull(&self, dir: &Path) -> Result<(), BackendFailure> {
        self.record(
            Operation::Pull,
            BackendCall::Pull {
                dir: dir.to_path_buf(),
            },
        )
    }
}

/// A prompt shown by [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCall {
    Select { message: String, labels: Vec<String> },
    MultiSelect { message: String, candidates: Vec<String> },
    Input { message: String },
}

/// Prompter answering from queued scripts. Running out of answers is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    menu: RefCell<VecDeque<Option<String>>>,
    picks: RefCell<VecDeque<Vec<String>>>,
    texts: RefCell<VecDeque<String>>,
    calls: RefCell<Vec<PromptCall>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a menu choice by label.
    pub fn choose(self, label: &str) -> Self {
        self.menu.borrow_mut().push_back(Some(label.to_string()));
        self
    }

    /// Queue a cancelled menu.
    pub fn cancel_menu(self) -> Self {
        self.menu.borrow_mut().push_back(None);
        self
    }

    /// Queue a multi-select answer by path. Paths that are not offered are ignored.
    pub fn pick(self, paths: &[&str]) -> Self {
        self.picks
            .borrow_mut()
            .push_back(paths.iter().map(|path| path.to_string()).collect());
        self
    }

    /// Queue a free-text answer.
    pub fn type_text(self, text: &str) -> Self {
        self.texts.borrow_mut().push_back(text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<PromptCall> {
        self.calls.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, labels: &[String]) -> Result<Option<usize>> {
        self.calls.borrow_mut().push(PromptCall::Select {
            message: message.to_string(),
            labels: labels.to_vec(),
        });
        let choice = self
            .menu
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted menu choice"))?;
        match choice {
            None => Ok(None),
            Some(label) => match labels.iter().position(|candidate| *candidate == label) {
                Some(index) => Ok(Some(index)),
                None => bail!("scripted choice '{label}' is not on the menu"),
            },
        }
    }

    fn multi_select(&self, message: &str, candidates: &[String]) -> Result<Vec<usize>> {
        self.calls.borrow_mut().push(PromptCall::MultiSelect {
            message: message.to_string(),
            candidates: candidates.to_vec(),
        });
        let picks = self
            .picks
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted file selection"))?;
        Ok(picks
            .iter()
            .filter_map(|pick| candidates.iter().position(|candidate| candidate == pick))
            .collect())
    }

    fn input(&self, message: &str) -> Result<String> {
        self.calls.borrow_mut().push(PromptCall::Input {
            message: message.to_string(),
        });
        self.texts
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted text input"))
    }
}

/// A message captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Banner,
    Info(String),
    Warn(String),
    Error(String),
    Files(Section, Vec<String>),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: RefCell<Vec<Report>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn banner(&self) {
        self.reports.borrow_mut().push(Report::Banner);
    }

    fn info(&self, message: &str) {
        self.reports
            .borrow_mut()
            .push(Report::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.reports
            .borrow_mut()
            .push(Report::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.reports
            .borrow_mut()
            .push(Report::Error(message.to_string()));
    }

    fn files(&self, section: Section, paths: &[String]) {
        self.reports
            .borrow_mut()
            .push(Report::Files(section, paths.to_vec()));
    }
}

/// Temporary git repository on branch `main` with a local identity.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let repo = Self { dir };
        repo.git(&["init", "-q"])?;
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"])?;
        repo.git(&["config", "user.email", "gittyup@example.com"])?;
        repo.git(&["config", "user.name", "gittyup tests"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    /// Run git in the repository and return stdout.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Stage everything and commit it.
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-q", "-m", message])?;
        Ok(())
    }
}
