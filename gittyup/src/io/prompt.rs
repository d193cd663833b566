//! Interactive prompts.
//!
//! [`Prompter`] is the seam between the handlers and the terminal. The
//! production implementation drives `dialoguer`; tests script answers.

use anyhow::{Context, Result};
use dialoguer::{Input, MultiSelect, Select};

/// Prompt surface used by the menu loop and the action handlers.
pub trait Prompter {
    /// Single choice from a fixed label set. `None` when the user cancels.
    fn select(&self, message: &str, labels: &[String]) -> Result<Option<usize>>;

    /// Zero or more indices into `candidates`. Cancelling yields no indices.
    fn multi_select(&self, message: &str, candidates: &[String]) -> Result<Vec<usize>>;

    /// Free text; empty input is allowed.
    fn input(&self, message: &str) -> Result<String>;
}

/// Prompter backed by the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, message: &str, labels: &[String]) -> Result<Option<usize>> {
        Select::new()
            .with_prompt(message)
            .items(labels)
            .default(0)
            .interact_opt()
            .context("read menu selection")
    }

    fn multi_select(&self, message: &str, candidates: &[String]) -> Result<Vec<usize>> {
        let chosen = MultiSelect::new()
            .with_prompt(message)
            .items(candidates)
            .interact_opt()
            .context("read file selection")?;
        Ok(chosen.unwrap_or_default())
    }

    fn input(&self, message: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .context("read text input")
    }
}
