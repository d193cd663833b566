//! Menu action handlers.
//!
//! Selection handlers (Track, Untrack, Stage, Unstage) share one protocol:
//! fetch status, filter a category, prompt, mutate, then re-fetch and render.
//! Commit, push, and pull have their own short flows. Every handler catches
//! its own backend failures and reports them; `Err` is reserved for prompt
//! failures that leave the terminal unusable.

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::core::filters::{candidates_for, commit_ready};
use crate::core::types::{Action, Category, Selection, SkipReason};
use crate::exit_codes;
use crate::io::backend::{Backend, BackendFailure};
use crate::io::prompt::Prompter;
use crate::io::reporter::Reporter;
use crate::render::render;
use crate::session::Session;

pub const SELECT_FILES_PROMPT: &str = "Select (press space bar) files:";
pub const COMMIT_MESSAGE_PROMPT: &str = "Please provide a commit message:";

/// Result of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran to completion.
    Done,
    /// Nothing to do; no mutation was attempted.
    Skipped(SkipReason),
    /// A backend call failed and was reported.
    Failed(BackendFailure),
}

impl Outcome {
    /// Process exit code when the action runs as a one-shot command.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Done | Outcome::Skipped(_) => exit_codes::OK,
            Outcome::Failed(_) => exit_codes::FAILED,
        }
    }
}

/// Handler signature shared by every menu action.
pub type Handler<B, P, R> = fn(&Session<'_, B, P, R>) -> Result<Outcome>;

/// Handler for `action`, or `None` for Exit.
pub fn handler_for<B: Backend, P: Prompter, R: Reporter>(
    action: Action,
) -> Option<Handler<B, P, R>> {
    match action {
        Action::Status => Some(status),
        Action::Track => Some(track),
        Action::Untrack => Some(untrack),
        Action::Stage => Some(stage),
        Action::Unstage => Some(unstage),
        Action::Commit => Some(commit),
        Action::SimplePush => Some(push),
        Action::SimplePull => Some(pull),
        Action::Exit => None,
    }
}

/// Run the handler for `action` once. Returns `None` for Exit.
pub fn run_action<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
    action: Action,
) -> Result<Option<Outcome>> {
    let Some(handler) = handler_for(action) else {
        return Ok(None);
    };
    let outcome = handler(session)?;
    debug!(%action, ?outcome, "action finished");
    Ok(Some(outcome))
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Stage,
    Unstage,
}

fn report_failure<B, P, R: Reporter>(
    session: &Session<'_, B, P, R>,
    failure: BackendFailure,
) -> Outcome {
    session.reporter.error(&failure.to_string());
    Outcome::Failed(failure)
}

/// Re-query after a mutation and show the result.
fn refresh_and_render<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Outcome {
    match session.fetch_status() {
        Ok(snapshot) => {
            render(&snapshot, session.reporter);
            Outcome::Done
        }
        Err(failure) => report_failure(session, failure),
    }
}

#[instrument(skip_all, fields(category = ?category, mutation = ?mutation))]
fn select_and_apply<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
    category: Category,
    mutation: Mutation,
) -> Result<Outcome> {
    let snapshot = match session.fetch_status() {
        Ok(snapshot) => snapshot,
        Err(failure) => return Ok(report_failure(session, failure)),
    };

    let candidates = candidates_for(category, &snapshot);
    if candidates.is_empty() {
        session
            .reporter
            .warn(&format!("No {} files", category.noun()));
        return Ok(Outcome::Skipped(SkipReason::EmptyCandidateSet(category)));
    }

    let chosen = session
        .prompter
        .multi_select(SELECT_FILES_PROMPT, &candidates)?;
    let Some(selection) = Selection::from_indices(&candidates, &chosen) else {
        session.reporter.warn("No files selected");
        return Ok(Outcome::Skipped(SkipReason::EmptySelection));
    };

    debug!(count = selection.paths().len(), "applying selection");
    let applied = match mutation {
        Mutation::Stage => session.backend.stage(session.dir(), &selection),
        Mutation::Unstage => session.backend.unstage(session.dir(), &selection),
    };
    if let Err(failure) = applied {
        return Ok(report_failure(session, failure));
    }
    info!(count = selection.paths().len(), "selection applied");

    Ok(refresh_and_render(session))
}

/// Show the current status.
pub fn status<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    match session.fetch_status() {
        Ok(snapshot) => {
            render(&snapshot, session.reporter);
            Ok(Outcome::Done)
        }
        Err(failure) => Ok(report_failure(session, failure)),
    }
}

/// Start tracking untracked files.
pub fn track<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    select_and_apply(session, Category::Untracked, Mutation::Stage)
}

/// Drop newly tracked files from the index.
pub fn untrack<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    select_and_apply(session, Category::StagedNew, Mutation::Unstage)
}

/// Stage modified tracked files.
pub fn stage<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    select_and_apply(session, Category::ModifiedTracked, Mutation::Stage)
}

/// Unstage staged changes to previously tracked files.
pub fn unstage<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    select_and_apply(session, Category::StagedModified, Mutation::Unstage)
}

/// Commit everything staged with a prompted message.
///
/// With nothing staged, warns and returns without prompting or committing.
#[instrument(skip_all)]
pub fn commit<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    let snapshot = match session.fetch_status() {
        Ok(snapshot) => snapshot,
        Err(failure) => return Ok(report_failure(session, failure)),
    };
    if !commit_ready(&snapshot) {
        session.reporter.warn("No files to commit!");
        return Ok(Outcome::Skipped(SkipReason::NothingToCommit));
    }

    let message = session.prompter.input(COMMIT_MESSAGE_PROMPT)?;
    let summary = match session.backend.commit(session.dir(), &message) {
        Ok(summary) => summary,
        Err(failure) => return Ok(report_failure(session, failure)),
    };
    match summary.short_sha {
        Some(sha) => session.reporter.info(&format!("Commit complete! ({sha})")),
        None => session.reporter.info("Commit complete!"),
    }

    if session.settings.status_after_commit {
        return Ok(refresh_and_render(session));
    }
    Ok(Outcome::Done)
}

/// Push the current branch to the configured remote.
#[instrument(skip_all, fields(remote = %session.settings.remote))]
pub fn push<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    let snapshot = match session.fetch_status() {
        Ok(snapshot) => snapshot,
        Err(failure) => return Ok(report_failure(session, failure)),
    };
    let remote = session.settings.remote.as_str();
    let branch = snapshot.branch();
    session
        .reporter
        .warn(&format!("Pushing to remote {remote} on {branch} branch!"));

    if let Err(failure) = session.backend.push(session.dir(), remote, branch) {
        return Ok(report_failure(session, failure));
    }
    session.reporter.info("Push complete!");
    Ok(Outcome::Done)
}

/// Fetch and merge the current branch's upstream. Success prints nothing more.
#[instrument(skip_all)]
pub fn pull<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<Outcome> {
    session
        .reporter
        .warn("Pulling from the upstream of the current branch!");
    match session.backend.pull(session.dir()) {
        Ok(()) => Ok(Outcome::Done),
        Err(failure) => Ok(report_failure(session, failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::backend::Operation;
    use crate::io::config::Settings;
    use crate::io::reporter::Section;
    use crate::test_support::{
        BackendCall, PromptCall, RecordingReporter, Report, ScriptedBackend, ScriptedPrompter,
        snapshot,
    };
    use std::path::PathBuf;

    fn session<'a>(
        backend: &'a ScriptedBackend,
        prompter: &'a ScriptedPrompter,
        reporter: &'a RecordingReporter,
    ) -> Session<'a, ScriptedBackend, ScriptedPrompter, RecordingReporter> {
        Session::new(backend, prompter, reporter, ".", Settings::default())
    }

    type TestHandler = Handler<ScriptedBackend, ScriptedPrompter, RecordingReporter>;

    fn dot() -> PathBuf {
        PathBuf::from(".")
    }

    #[test]
    fn track_stages_selection_then_refetches_and_renders() {
        let backend = ScriptedBackend::new(vec![
            snapshot("main", &[("??", "a.txt")]),
            snapshot("main", &[("A.", "a.txt")]),
        ]);
        let prompter = ScriptedPrompter::new().pick(&["a.txt"]);
        let reporter = RecordingReporter::default();

        let outcome = track(&session(&backend, &prompter, &reporter)).expect("track");

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Status { dir: dot() },
                BackendCall::Stage {
                    dir: dot(),
                    files: vec!["a.txt".to_string()],
                },
                BackendCall::Status { dir: dot() },
            ]
        );
        assert!(reporter.reports().contains(&Report::Files(
            Section::ToBeCommitted,
            vec!["a.txt".to_string()]
        )));
        assert!(
            reporter
                .reports()
                .contains(&Report::Warn("No untracked files".to_string()))
        );
    }

    #[test]
    fn selection_handlers_never_mutate_with_empty_candidates() {
        let handlers: [(TestHandler, &str); 4] = [
            (track, "No untracked files"),
            (untrack, "No newly tracked files"),
            (stage, "No modified files"),
            (unstage, "No staged files"),
        ];
        for (handler, warning) in handlers {
            let backend = ScriptedBackend::new(vec![snapshot("main", &[])]);
            let prompter = ScriptedPrompter::new();
            let reporter = RecordingReporter::default();

            let outcome = handler(&session(&backend, &prompter, &reporter)).expect("handler");

            assert!(matches!(
                outcome,
                Outcome::Skipped(SkipReason::EmptyCandidateSet(_))
            ));
            assert_eq!(backend.mutation_count(), 0);
            assert!(prompter.calls().is_empty());
            assert_eq!(reporter.reports(), vec![Report::Warn(warning.to_string())]);
        }
    }

    #[test]
    fn empty_selection_is_a_benign_no_op() {
        let backend = ScriptedBackend::new(vec![snapshot("main", &[(".M", "lib.rs")])]);
        let prompter = ScriptedPrompter::new().pick(&[]);
        let reporter = RecordingReporter::default();

        let outcome = stage(&session(&backend, &prompter, &reporter)).expect("stage");

        assert_eq!(outcome, Outcome::Skipped(SkipReason::EmptySelection));
        assert_eq!(backend.mutation_count(), 0);
        assert_eq!(backend.status_count(), 1);
    }

    #[test]
    fn prompt_choices_are_exactly_the_category_candidates() {
        let backend = ScriptedBackend::new(vec![snapshot(
            "main",
            &[("??", "u.txt"), ("A.", "n.txt"), ("M.", "s.txt"), (".M", "m.txt")],
        )]);
        let prompter = ScriptedPrompter::new().pick(&["u.txt", "n.txt"]);
        let reporter = RecordingReporter::default();

        untrack(&session(&backend, &prompter, &reporter)).expect("untrack");

        assert_eq!(
            prompter.calls(),
            vec![PromptCall::MultiSelect {
                message: SELECT_FILES_PROMPT.to_string(),
                candidates: vec!["n.txt".to_string()],
            }]
        );
        // "u.txt" was not offered, so only "n.txt" reaches the backend.
        assert!(backend.calls().contains(&BackendCall::Unstage {
            dir: dot(),
            files: vec!["n.txt".to_string()],
        }));
    }

    #[test]
    fn unstage_offers_staged_modified_files() {
        let backend = ScriptedBackend::new(vec![
            snapshot("main", &[("A.", "n.txt"), ("M.", "s.txt")]),
            snapshot("main", &[("A.", "n.txt"), (".M", "s.txt")]),
        ]);
        let prompter = ScriptedPrompter::new().pick(&["s.txt"]);
        let reporter = RecordingReporter::default();

        let outcome = unstage(&session(&backend, &prompter, &reporter)).expect("unstage");

        assert_eq!(outcome, Outcome::Done);
        assert!(backend.calls().contains(&BackendCall::Unstage {
            dir: dot(),
            files: vec!["s.txt".to_string()],
        }));
    }

    #[test]
    fn mutation_failure_is_reported_without_refetch() {
        let backend = ScriptedBackend::new(vec![snapshot("main", &[("??", "a.txt")])])
            .failing(Operation::Add, "index.lock exists");
        let prompter = ScriptedPrompter::new().pick(&["a.txt"]);
        let reporter = RecordingReporter::default();

        let outcome = track(&session(&backend, &prompter, &reporter)).expect("track");

        assert_eq!(
            outcome,
            Outcome::Failed(BackendFailure::new(Operation::Add, "index.lock exists"))
        );
        assert_eq!(backend.status_count(), 1);
        assert_eq!(
            reporter.reports(),
            vec![Report::Error("error adding: index.lock exists".to_string())]
        );
    }

    #[test]
    fn status_failure_aborts_before_prompting() {
        let backend = ScriptedBackend::new(Vec::new());
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome = track(&session(&backend, &prompter, &reporter)).expect("track");

        assert!(matches!(outcome, Outcome::Failed(ref f) if f.operation == Operation::Status));
        assert!(prompter.calls().is_empty());
        assert_eq!(backend.mutation_count(), 0);
    }

    #[test]
    fn commit_with_nothing_staged_never_prompts_or_commits() {
        let backend = ScriptedBackend::new(vec![snapshot("main", &[("??", "a.txt")])]);
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome = commit(&session(&backend, &prompter, &reporter)).expect("commit");

        assert_eq!(outcome, Outcome::Skipped(SkipReason::NothingToCommit));
        assert!(prompter.calls().is_empty());
        assert_eq!(backend.mutation_count(), 0);
        assert_eq!(backend.status_count(), 1);
        assert_eq!(
            reporter.reports(),
            vec![Report::Warn("No files to commit!".to_string())]
        );
    }

    #[test]
    fn commit_passes_empty_message_through() {
        let backend = ScriptedBackend::new(vec![snapshot("main", &[("A.", "a.txt")])]);
        let prompter = ScriptedPrompter::new().type_text("");
        let reporter = RecordingReporter::default();

        let outcome = commit(&session(&backend, &prompter, &reporter)).expect("commit");

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(
            backend.calls().last(),
            Some(&BackendCall::Commit {
                dir: dot(),
                message: String::new(),
            })
        );
        assert_eq!(
            reporter.reports(),
            vec![Report::Info("Commit complete! (abc1234)".to_string())]
        );
    }

    #[test]
    fn commit_renders_status_when_configured() {
        let backend = ScriptedBackend::new(vec![
            snapshot("main", &[("A.", "a.txt")]),
            snapshot("main", &[]),
        ]);
        let prompter = ScriptedPrompter::new().type_text("add a");
        let reporter = RecordingReporter::default();
        let session = Session::new(
            &backend,
            &prompter,
            &reporter,
            ".",
            Settings {
                status_after_commit: true,
                ..Settings::default()
            },
        );

        let outcome = commit(&session).expect("commit");

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(backend.status_count(), 2);
        assert_eq!(reporter.reports().len(), 4);
    }

    #[test]
    fn commit_failure_is_reported() {
        let backend = ScriptedBackend::new(vec![snapshot("main", &[("A.", "a.txt")])])
            .failing(Operation::Commit, "empty commit message");
        let prompter = ScriptedPrompter::new().type_text("");
        let reporter = RecordingReporter::default();

        let outcome = commit(&session(&backend, &prompter, &reporter)).expect("commit");

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(outcome.exit_code(), exit_codes::FAILED);
    }

    #[test]
    fn push_targets_origin_and_current_branch_once() {
        let backend = ScriptedBackend::new(vec![snapshot(
            "main",
            &[("A.", "a.txt"), ("M.", "b.txt"), ("A.", "c.txt")],
        )]);
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome = push(&session(&backend, &prompter, &reporter)).expect("push");

        assert_eq!(outcome, Outcome::Done);
        let pushes: Vec<BackendCall> = backend
            .calls()
            .into_iter()
            .filter(|call| matches!(call, BackendCall::Push { .. }))
            .collect();
        assert_eq!(
            pushes,
            vec![BackendCall::Push {
                dir: dot(),
                remote: "origin".to_string(),
                branch: "main".to_string(),
            }]
        );
        assert_eq!(
            reporter.reports(),
            vec![
                Report::Warn("Pushing to remote origin on main branch!".to_string()),
                Report::Info("Push complete!".to_string()),
            ]
        );
    }

    #[test]
    fn push_uses_snapshot_branch_not_a_fixed_one() {
        let backend = ScriptedBackend::new(vec![snapshot("feature/x", &[])]);
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        push(&session(&backend, &prompter, &reporter)).expect("push");

        assert!(backend.calls().contains(&BackendCall::Push {
            dir: dot(),
            remote: "origin".to_string(),
            branch: "feature/x".to_string(),
        }));
    }

    #[test]
    fn pull_success_is_silent_after_warning() {
        let backend = ScriptedBackend::new(Vec::new());
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome = pull(&session(&backend, &prompter, &reporter)).expect("pull");

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(backend.calls(), vec![BackendCall::Pull { dir: dot() }]);
        assert_eq!(reporter.reports().len(), 1);
    }

    #[test]
    fn pull_failure_is_reported_as_error() {
        let backend =
            ScriptedBackend::new(Vec::new()).failing(Operation::Pull, "no tracking information");
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome = pull(&session(&backend, &prompter, &reporter)).expect("pull");

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(
            reporter.reports().last(),
            Some(&Report::Error(
                "error pulling: no tracking information".to_string()
            ))
        );
    }

    #[test]
    fn exit_has_no_handler() {
        let backend = ScriptedBackend::new(Vec::new());
        let prompter = ScriptedPrompter::new();
        let reporter = RecordingReporter::default();

        let outcome =
            run_action(&session(&backend, &prompter, &reporter), Action::Exit).expect("exit");

        assert_eq!(outcome, None);
        assert!(backend.calls().is_empty());
    }
}
