//! Point-in-time classification of repository files.
//!
//! A [`StatusSnapshot`] is built once from parsed status entries and never
//! changes afterwards. Anything that mutates the repository must be followed
//! by a fresh query rather than a patch of an old snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status code of a single entry reported by `git status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryCode {
    Untracked,
    Ignored,
    /// Merge conflict; not handled by the staging workflow.
    Unmerged,
    /// Ordinary change with index (X) and worktree (Y) columns. `.` means
    /// unchanged in that column.
    Changed { index: char, worktree: char },
}

/// One path from `git status`, with renames already resolved to the new path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: EntryCode,
    pub path: String,
}

impl StatusEntry {
    pub fn untracked(path: impl Into<String>) -> Self {
        Self {
            code: EntryCode::Untracked,
            path: path.into(),
        }
    }

    pub fn changed(index: char, worktree: char, path: impl Into<String>) -> Self {
        Self {
            code: EntryCode::Changed { index, worktree },
            path: path.into(),
        }
    }
}

/// Immutable classification of repository files plus the current branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    branch: String,
    untracked: Vec<String>,
    modified_tracked: Vec<String>,
    staged_new: Vec<String>,
    staged_modified: Vec<String>,
    taken_at: DateTime<Utc>,
}

impl StatusSnapshot {
    /// Classify status entries into the workflow categories.
    ///
    /// - `Untracked` entries go to `untracked`.
    /// - Index `A` goes to `staged_new`; index `M T D R C` to `staged_modified`.
    /// - Worktree `M T D` goes to `modified_tracked`, independently of the index
    ///   column, so `MM` lands in both staged and modified.
    /// - Ignored and unmerged entries are left out.
    pub fn classify(
        branch: impl Into<String>,
        entries: &[StatusEntry],
        taken_at: DateTime<Utc>,
    ) -> Self {
        let mut snapshot = Self {
            branch: branch.into(),
            untracked: Vec::new(),
            modified_tracked: Vec::new(),
            staged_new: Vec::new(),
            staged_modified: Vec::new(),
            taken_at,
        };
        for entry in entries {
            match entry.code {
                EntryCode::Untracked => snapshot.untracked.push(entry.path.clone()),
                EntryCode::Changed { index, worktree } => {
                    match index {
                        'A' => snapshot.staged_new.push(entry.path.clone()),
                        'M' | 'T' | 'D' | 'R' | 'C' => {
                            snapshot.staged_modified.push(entry.path.clone());
                        }
                        _ => {}
                    }
                    if matches!(worktree, 'M' | 'T' | 'D') {
                        snapshot.modified_tracked.push(entry.path.clone());
                    }
                }
                EntryCode::Ignored | EntryCode::Unmerged => {}
            }
        }
        snapshot
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn untracked(&self) -> &[String] {
        &self.untracked
    }

    pub fn modified_tracked(&self) -> &[String] {
        &self.modified_tracked
    }

    pub fn staged_new(&self) -> &[String] {
        &self.staged_new
    }

    pub fn staged_modified(&self) -> &[String] {
        &self.staged_modified
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(entries: &[StatusEntry]) -> StatusSnapshot {
        StatusSnapshot::classify("main", entries, Utc::now())
    }

    #[test]
    fn records_when_it_was_taken() {
        let taken_at = Utc::now();
        let snap = StatusSnapshot::classify("dev", &[], taken_at);
        assert_eq!(snap.taken_at(), taken_at);
        assert_eq!(snap.branch(), "dev");
    }

    #[test]
    fn untracked_entries_are_untracked() {
        let snap = classify(&[StatusEntry::untracked("a.txt")]);
        assert_eq!(snap.untracked(), ["a.txt"]);
        assert!(snap.staged_new().is_empty());
        assert!(snap.modified_tracked().is_empty());
    }

    #[test]
    fn index_added_is_staged_new() {
        let snap = classify(&[StatusEntry::changed('A', '.', "new.rs")]);
        assert_eq!(snap.staged_new(), ["new.rs"]);
        assert!(snap.staged_modified().is_empty());
    }

    #[test]
    fn index_and_worktree_modified_lands_in_both() {
        let snap = classify(&[StatusEntry::changed('M', 'M', "lib.rs")]);
        assert_eq!(snap.staged_modified(), ["lib.rs"]);
        assert_eq!(snap.modified_tracked(), ["lib.rs"]);
    }

    #[test]
    fn worktree_deletion_is_modified_tracked() {
        let snap = classify(&[StatusEntry::changed('.', 'D', "gone.txt")]);
        assert_eq!(snap.modified_tracked(), ["gone.txt"]);
        assert!(snap.staged_modified().is_empty());
    }

    #[test]
    fn rename_is_staged_modified() {
        let snap = classify(&[StatusEntry::changed('R', '.', "renamed.txt")]);
        assert_eq!(snap.staged_modified(), ["renamed.txt"]);
    }

    #[test]
    fn ignored_and_unmerged_are_skipped() {
        let snap = classify(&[
            StatusEntry {
                code: EntryCode::Ignored,
                path: "target/".to_string(),
            },
            StatusEntry {
                code: EntryCode::Unmerged,
                path: "conflict.txt".to_string(),
            },
        ]);
        assert!(snap.untracked().is_empty());
        assert!(snap.modified_tracked().is_empty());
        assert!(snap.staged_new().is_empty());
        assert!(snap.staged_modified().is_empty());
    }

    #[test]
    fn preserves_entry_order_within_category() {
        let snap = classify(&[
            StatusEntry::untracked("b.txt"),
            StatusEntry::changed('A', '.', "z.rs"),
            StatusEntry::untracked("a.txt"),
        ]);
        assert_eq!(snap.untracked(), ["b.txt", "a.txt"]);
        assert_eq!(snap.branch(), "main");
    }
}
