//! Side-effecting collaborators: git, prompts, terminal output, settings.

pub mod backend;
pub mod config;
pub mod git;
pub mod prompt;
pub mod reporter;
