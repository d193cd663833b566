//! Category filters over a [`StatusSnapshot`].

use crate::core::snapshot::StatusSnapshot;
use crate::core::types::Category;

pub fn untracked_candidates(snap: &StatusSnapshot) -> &[String] {
    snap.untracked()
}

pub fn modified_candidates(snap: &StatusSnapshot) -> &[String] {
    snap.modified_tracked()
}

/// Everything ready to commit: newly tracked files first, then modified ones.
pub fn staged_candidates(snap: &StatusSnapshot) -> Vec<String> {
    snap.staged_new()
        .iter()
        .chain(snap.staged_modified())
        .cloned()
        .collect()
}

pub fn commit_ready(snap: &StatusSnapshot) -> bool {
    !snap.staged_new().is_empty() || !snap.staged_modified().is_empty()
}

/// Candidate list for a selection handler.
pub fn candidates_for(category: Category, snap: &StatusSnapshot) -> Vec<String> {
    match category {
        Category::Untracked => untracked_candidates(snap).to_vec(),
        Category::ModifiedTracked => modified_candidates(snap).to_vec(),
        Category::StagedNew => snap.staged_new().to_vec(),
        Category::StagedModified => snap.staged_modified().to_vec(),
    }
}
