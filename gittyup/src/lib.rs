//! Menu-driven staging, commit, push, and pull for git repositories.
//!
//! The crate maps a repository's working-tree status into an interactive
//! staging pipeline. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (status classification, category
//!   filters, shared types). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (git, prompts, terminal output,
//!   settings), each behind a trait so tests can script them.
//!
//! Orchestration modules ([`actions`], [`menu`], [`render`]) run handlers
//! against a [`session::Session`] of injected collaborators.

pub mod actions;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod menu;
pub mod render;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
