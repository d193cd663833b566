//! Git adapter for the staging workflow.
//!
//! Every repository operation goes through a small, explicit wrapper around
//! `git` subprocess calls so failures carry the command and its stderr.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, instrument};

use crate::core::snapshot::{EntryCode, StatusEntry};

/// Parsed `git status --porcelain=v2 --branch -z` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PorcelainStatus {
    /// Branch name, or `HEAD` when detached.
    pub head: String,
    pub entries: Vec<StatusEntry>,
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    binary: String,
    workdir: PathBuf,
}

impl Git {
    pub fn with_binary(binary: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workdir: workdir.into(),
        }
    }

    /// Status entries (untracked directories expanded) plus the branch head.
    #[instrument(skip_all)]
    pub fn status(&self) -> Result<PorcelainStatus> {
        let out = self.run_capture(&["status", "--porcelain=v2", "--branch", "-z", "-uall"])?;
        let status = parse_porcelain_v2(&out)?;
        debug!(
            head = %status.head,
            entries = status.entries.len(),
            "parsed status"
        );
        Ok(status)
    }

    /// Stage the given paths (new or modified).
    pub fn add(&self, paths: &[String]) -> Result<()> {
        self.run_checked(&with_paths(&["add"], paths))?;
        Ok(())
    }

    /// Restore the index entries of `paths` to `HEAD`, leaving the working
    /// files alone. On an unborn branch the entries are dropped instead.
    pub fn reset_paths(&self, paths: &[String]) -> Result<()> {
        self.run_checked(&with_paths(&["reset", "-q"], paths))?;
        Ok(())
    }

    /// Commit staged changes with a message, passed through unvalidated.
    #[instrument(skip_all)]
    pub fn commit(&self, message: &str) -> Result<()> {
        debug!("committing staged changes");
        self.run_checked(&["commit", "-m", message])?;
        Ok(())
    }

    /// Return the current HEAD short SHA.
    pub fn head_short_sha(&self, len: usize) -> Result<String> {
        let arg = format!("--short={len}");
        let out = self.run_capture(&["rev-parse", &arg, "HEAD"])?;
        Ok(out.trim().to_string())
    }

    #[instrument(skip_all, fields(remote, branch))]
    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        debug!(remote, branch, "pushing");
        self.run_checked(&["push", remote, branch])?;
        Ok(())
    }

    /// Fetch and merge the upstream of the current branch.
    #[instrument(skip_all)]
    pub fn pull(&self) -> Result<()> {
        self.run_checked(&["pull"])?;
        Ok(())
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn {} {}", self.binary, args.join(" ")))
    }
}

/// `base -- paths...`, keeping paths that start with `-` from being read as options.
fn with_paths<'a>(base: &[&'a str], paths: &'a [String]) -> Vec<&'a str> {
    let mut args = base.to_vec();
    args.push("--");
    args.extend(paths.iter().map(String::as_str));
    args
}

fn parse_porcelain_v2(raw: &str) -> Result<PorcelainStatus> {
    let mut head = None;
    let mut entries = Vec::new();
    let mut records = raw.split('\0').filter(|record| !record.is_empty());

    while let Some(record) = records.next() {
        if let Some(header) = record.strip_prefix("# ") {
            if let Some(name) = header.strip_prefix("branch.head ") {
                let name = if name == "(detached)" { "HEAD" } else { name };
                head = Some(name.to_string());
            }
            continue;
        }
        match record.as_bytes()[0] {
            b'1' => {
                let fields: Vec<&str> = record.splitn(9, ' ').collect();
                if fields.len() != 9 {
                    bail!("unexpected porcelain line: '{record}'");
                }
                entries.push(changed_entry(fields[1], fields[8], record)?);
            }
            b'2' => {
                let fields: Vec<&str> = record.splitn(10, ' ').collect();
                if fields.len() != 10 {
                    bail!("unexpected porcelain line: '{record}'");
                }
                // With -z the original path of a rename follows as its own record.
                records.next();
                entries.push(changed_entry(fields[1], fields[9], record)?);
            }
            b'u' => {
                let fields: Vec<&str> = record.splitn(11, ' ').collect();
                let path = fields.last().copied().unwrap_or_default();
                debug!(path, "skipping unmerged entry");
                entries.push(StatusEntry {
                    code: EntryCode::Unmerged,
                    path: path.to_string(),
                });
            }
            b'?' | b'!' => {
                let path = record
                    .get(2..)
                    .ok_or_else(|| anyhow!("unexpected porcelain line: '{record}'"))?;
                let code = if record.starts_with('?') {
                    EntryCode::Untracked
                } else {
                    EntryCode::Ignored
                };
                entries.push(StatusEntry {
                    code,
                    path: path.to_string(),
                });
            }
            _ => bail!("unexpected porcelain line: '{record}'"),
        }
    }

    let head = head.ok_or_else(|| anyhow!("git status output missing branch.head header"))?;
    Ok(PorcelainStatus { head, entries })
}

fn changed_entry(xy: &str, path: &str, record: &str) -> Result<StatusEntry> {
    let mut chars = xy.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(index), Some(worktree), None) => Ok(StatusEntry::changed(index, worktree, path)),
        _ => Err(anyhow!("unexpected status code in porcelain line: '{record}'")),
    }
}
