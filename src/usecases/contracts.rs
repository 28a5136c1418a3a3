use anyhow::Result;

use crate::domain::{events::AppEvent, shell_state::ShellState};

use super::{login::LoginOutcome, send_message::SendMessageCommand};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
    /// Returns true once per login request raised from the UI.
    fn take_login_request(&mut self) -> bool;
    fn apply_login(&mut self, outcome: LoginOutcome);
}

/// Starts backend calls without blocking; results arrive later as `AppEvent::Backend`.
pub trait BackendDispatcher {
    fn send_message(&self, command: SendMessageCommand);
    fn load_thread(&self, chat_id: String);
}

/// Runs the interactive sign-in while the TUI is suspended.
pub trait LoginRunner {
    fn run_login(&mut self) -> Result<LoginOutcome>;
}
