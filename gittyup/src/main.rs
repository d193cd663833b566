//! Menu-driven git staging tool.
//!
//! Without an action argument, opens the interactive menu and loops until
//! Exit. With one, runs that action once and exits with a code reflecting
//! its outcome.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

use gittyup::actions::run_action;
use gittyup::core::types::Action;
use gittyup::exit_codes;
use gittyup::io::backend::GitBackend;
use gittyup::io::config::{DEFAULT_CONFIG_FILE, load_settings};
use gittyup::io::prompt::TerminalPrompter;
use gittyup::io::reporter::{Reporter, TerminalReporter};
use gittyup::logging;
use gittyup::menu::run_menu;
use gittyup::session::Session;

#[derive(Parser)]
#[command(
    name = "gittyup",
    version,
    about = "Menu-driven staging, commit, push and pull for git"
)]
struct Cli {
    /// Repository directory to operate on.
    #[arg(short = 'C', long, default_value = ".")]
    dir: PathBuf,

    /// Settings file (defaults to `<dir>/.gittyup.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remote used by Simple-Push (overrides the settings file).
    #[arg(long)]
    remote: Option<String>,

    /// Enable debug diagnostics on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Print the status snapshot as JSON (only with `status`).
    #[arg(long)]
    json: bool,

    /// Run a single action and exit instead of opening the menu.
    #[arg(value_enum)]
    action: Option<Action>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if cli.json && cli.action != Some(Action::Status) {
        bail!("--json is only supported with the status action");
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.dir.join(DEFAULT_CONFIG_FILE));
    let mut settings = load_settings(&config_path)?;
    if let Some(remote) = cli.remote {
        settings.remote = remote;
        settings.validate().context("invalid --remote")?;
    }
    debug!(?settings, dir = %cli.dir.display(), "loaded settings");

    let backend = GitBackend::new(settings.git_binary.as_str());
    let prompter = TerminalPrompter;
    let reporter = TerminalReporter;
    let session = Session::new(&backend, &prompter, &reporter, cli.dir, settings);

    match cli.action {
        None => {
            let outcome = run_menu(&session)?;
            debug!(actions_run = outcome.actions_run, "exiting");
            Ok(exit_codes::OK)
        }
        Some(Action::Status) if cli.json => print_status_json(&session),
        Some(action) => {
            let outcome = run_action(&session, action)?;
            Ok(outcome.map_or(exit_codes::OK, |outcome| outcome.exit_code()))
        }
    }
}

fn print_status_json(
    session: &Session<'_, GitBackend, TerminalPrompter, TerminalReporter>,
) -> Result<i32> {
    match session.fetch_status() {
        Ok(snapshot) => {
            let payload = serde_json::to_string_pretty(&snapshot).context("serialize status")?;
            println!("{payload}");
            Ok(exit_codes::OK)
        }
        Err(failure) => {
            session.reporter.error(&failure.to_string());
            Ok(exit_codes::FAILED)
        }
    }
}
