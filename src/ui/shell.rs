use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, LoginRunner, ShellOrchestrator},
    login::LoginOutcome,
};

use super::{terminal::TerminalSession, view};

const LOGIN_PROMPT_FAILED: &str = "LOGIN_PROMPT_FAILED";

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    login: &mut dyn LoginRunner,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        backend = %context.config.backend.base_url,
        logged_in = orchestrator.state().is_logged_in(),
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::enter()?;

    while orchestrator.state().is_running() {
        terminal.draw(|frame| view::render(frame, orchestrator.state()))?;

        if pump(event_source, orchestrator)? {
            // The sign-in prompt needs the plain terminal
            terminal.suspend();
            hand_off_login(orchestrator, login);
            terminal = TerminalSession::enter()?;
        }
    }

    tracing::info!("TUI shell stopped");
    Ok(())
}

/// Feeds one event to the orchestrator. Returns true when the user asked to log in.
fn pump(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<bool> {
    if let Some(event) = event_source.next_event()? {
        orchestrator.handle_event(event)?;
    }

    Ok(orchestrator.take_login_request())
}

fn hand_off_login(orchestrator: &mut dyn ShellOrchestrator, login: &mut dyn LoginRunner) {
    let outcome = login.run_login().unwrap_or_else(|error| {
        tracing::error!(code = LOGIN_PROMPT_FAILED, error = ?error, "login prompt failed");
        LoginOutcome::Failed {
            code: LOGIN_PROMPT_FAILED.to_owned(),
        }
    });

    orchestrator.apply_login(outcome);
}
