//! Shared deterministic types for the menu workflow.
//!
//! These types define the contracts between the menu loop, the action
//! handlers, and the collaborators they call. They hold no I/O state.

use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;

/// Menu action. Each variant except [`Action::Exit`] maps to one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Action {
    Stage,
    Unstage,
    Status,
    Track,
    Untrack,
    Commit,
    SimplePush,
    SimplePull,
    #[value(skip)]
    Exit,
}

impl Action {
    /// Menu entries in display order.
    pub const MENU: [Action; 9] = [
        Action::Stage,
        Action::Unstage,
        Action::Status,
        Action::Track,
        Action::Untrack,
        Action::Commit,
        Action::SimplePush,
        Action::SimplePull,
        Action::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Stage => "Stage",
            Action::Unstage => "Unstage",
            Action::Status => "Status",
            Action::Track => "Track",
            Action::Untrack => "Untrack",
            Action::Commit => "Commit",
            Action::SimplePush => "Simple-Push",
            Action::SimplePull => "Simple-Pull",
            Action::Exit => "Exit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File category a selection handler draws its candidates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// On disk, unknown to git.
    Untracked,
    /// Tracked with unstaged edits.
    ModifiedTracked,
    /// Newly tracked and staged.
    StagedNew,
    /// Previously tracked and staged.
    StagedModified,
}

impl Category {
    /// Adjective used in "No <noun> files" warnings.
    pub fn noun(self) -> &'static str {
        match self {
            Category::Untracked => "untracked",
            Category::ModifiedTracked => "modified",
            Category::StagedNew => "newly tracked",
            Category::StagedModified => "staged",
        }
    }
}

/// Why a handler finished without mutating the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The relevant category had no files.
    EmptyCandidateSet(Category),
    /// The user picked nothing from the multi-select.
    EmptySelection,
    /// Commit was requested with nothing staged.
    NothingToCommit,
}

/// Whether the menu loop should prompt again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Terminate,
}

/// Non-empty, duplicate-free subset of a candidate list.
///
/// Only constructible from candidate indices, so a selection can never name
/// a path outside the category it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    /// Build a selection from indices into `candidates`.
    ///
    /// Out-of-range and repeated indices are dropped. Returns `None` when
    /// nothing valid remains.
    pub fn from_indices(candidates: &[String], indices: &[usize]) -> Option<Self> {
        let mut seen = HashSet::new();
        let paths: Vec<String> = indices
            .iter()
            .filter_map(|&index| candidates.get(index))
            .filter(|path| seen.insert(path.as_str()))
            .cloned()
            .collect();
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths })
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

}
