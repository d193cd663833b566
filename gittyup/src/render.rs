//! Status rendering.

use crate::core::filters::{modified_candidates, staged_candidates, untracked_candidates};
use crate::core::snapshot::StatusSnapshot;
use crate::io::reporter::{Reporter, Section};

/// Report untracked, to-be-committed, and modified files.
///
/// Each section emits exactly one message: its listing, or its empty notice.
pub fn render<R: Reporter + ?Sized>(snapshot: &StatusSnapshot, reporter: &R) {
    render_section(reporter, Section::Untracked, untracked_candidates(snapshot));
    render_section(reporter, Section::ToBeCommitted, &staged_candidates(snapshot));
    render_section(reporter, Section::Modified, modified_candidates(snapshot));
}

fn render_section<R: Reporter + ?Sized>(reporter: &R, section: Section, paths: &[String]) {
    if paths.is_empty() {
        reporter.warn(section.empty_notice());
    } else {
        reporter.files(section, paths);
    }
}
