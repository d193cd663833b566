//! Interactive menu loop.
//!
//! A single "awaiting selection" state: each step shows the menu, runs the
//! chosen handler, and returns to the menu. Only Exit (or cancelling the menu)
//! ends the loop; the caller decides how the process exits.

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::actions::run_action;
use crate::core::types::{Action, LoopControl};
use crate::io::backend::Backend;
use crate::io::prompt::Prompter;
use crate::io::reporter::Reporter;
use crate::session::Session;

pub const MENU_PROMPT: &str = "GittyUp!";

/// Summary of a menu session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOutcome {
    /// Handlers run before the loop ended (Exit not counted).
    pub actions_run: u32,
}

/// Show the menu once and dispatch the chosen action.
pub fn menu_step<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<LoopControl> {
    session.reporter.banner();
    let labels: Vec<String> = Action::MENU
        .iter()
        .map(|action| action.label().to_string())
        .collect();
    let Some(index) = session.prompter.select(MENU_PROMPT, &labels)? else {
        debug!("menu cancelled");
        return Ok(LoopControl::Terminate);
    };
    let action = Action::MENU
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("menu returned out-of-range choice {index}"))?;

    match run_action(session, action)? {
        Some(_) => Ok(LoopControl::Continue),
        None => Ok(LoopControl::Terminate),
    }
}

/// Run menu steps until one asks to terminate.
///
/// Backend failures are reported inside handlers and never end the loop; only
/// prompt errors propagate.
pub fn run_menu<B: Backend, P: Prompter, R: Reporter>(
    session: &Session<'_, B, P, R>,
) -> Result<MenuOutcome> {
    let mut actions_run = 0u32;
    loop {
        match menu_step(session)? {
            LoopControl::Continue => actions_run += 1,
            LoopControl::Terminate => {
                debug!(actions_run, "menu loop finished");
                return Ok(MenuOutcome { actions_run });
            }
        }
    }
}
