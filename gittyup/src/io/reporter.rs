//! User-facing output.
//!
//! Handlers never print directly; they talk to an injected [`Reporter`]. The
//! terminal implementation styles messages with `colored` so warnings, errors,
//! and status listings stay visually distinct.

use colored::Colorize;

/// Status listing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Untracked,
    ToBeCommitted,
    Modified,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Untracked => "Untracked Files",
            Section::ToBeCommitted => "Files to be committed",
            Section::Modified => "Modified Files",
        }
    }

    /// Warning shown instead of an empty listing.
    pub fn empty_notice(self) -> &'static str {
        match self {
            Section::Untracked => "No untracked files",
            Section::ToBeCommitted => "No files to be committed",
            Section::Modified => "No newly modified files",
        }
    }
}

/// Sink for everything the user sees outside of prompts.
pub trait Reporter {
    /// Separator printed before each menu prompt.
    fn banner(&self);
    fn info(&self, message: &str);
    /// Expected, benign condition.
    fn warn(&self, message: &str);
    /// Unexpected failure.
    fn error(&self, message: &str);
    /// Non-empty file listing for a status section.
    fn files(&self, section: Section, paths: &[String]);
}

/// Reporter writing listings and progress to stdout, warnings and errors to
/// stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn banner(&self) {
        println!("{}", "=========".cyan());
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }

    fn files(&self, section: Section, paths: &[String]) {
        let label = match section {
            Section::ToBeCommitted => section.label().green().bold(),
            Section::Untracked | Section::Modified => section.label().blue().bold(),
        };
        println!("{label}");
        for path in paths {
            println!("  {path}");
        }
    }
}
