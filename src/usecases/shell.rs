use anyhow::Result;

use crate::{
    domain::{
        events::{AppEvent, BackendEvent, KeyInput},
        message::now_timestamp,
        shell_state::{ActivePane, ShellState, SidebarEntry},
    },
    infra::contracts::SessionStore,
};

use super::{
    contracts::{BackendDispatcher, ShellOrchestrator},
    login::{apply_login_outcome, persist_login_outcome, LoginOutcome},
    logout::logout,
    send_message::{
        accept_reply, advance_reveal, begin_send, fail_reply, new_local_chat_id, SendMessageError,
    },
    threads::{apply_loaded_thread, apply_thread_load_failure, request_thread, start_new_chat},
};

const STATE_WRITE_FAILED: &str = "STATE_WRITE_FAILED";

pub struct DefaultShellOrchestrator<S, D>
where
    S: SessionStore,
    D: BackendDispatcher,
{
    state: ShellState,
    store: S,
    dispatcher: D,
    chars_per_tick: usize,
}

impl<S, D> DefaultShellOrchestrator<S, D>
where
    S: SessionStore,
    D: BackendDispatcher,
{
    pub fn new(state: ShellState, store: S, dispatcher: D, chars_per_tick: usize) -> Self {
        Self {
            state,
            store,
            dispatcher,
            chars_per_tick,
        }
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.ctrl {
            match key.key.as_str() {
                "c" => self.state.stop(),
                "b" => self.state.toggle_sidebar(),
                "n" => self.new_chat(),
                "l" if self.state.is_logged_in() => self.logout(),
                _ => {}
            }
            return;
        }

        match self.state.active_pane() {
            ActivePane::LoginModal => match key.key.as_str() {
                "enter" => self.state.request_login(),
                "esc" => self.state.hide_login_modal(),
                _ => {}
            },
            ActivePane::Sidebar => match key.key.as_str() {
                "up" | "k" => self.state.select_previous_entry(),
                "down" | "j" => self.state.select_next_entry(),
                "enter" => self.activate_sidebar_entry(),
                "esc" => self.state.focus_input(),
                _ => {}
            },
            ActivePane::MessageInput => self.edit_input(&key),
        }
    }

    fn edit_input(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "enter" => return self.send(),
            "esc" => return self.state.clear_notice(),
            _ => {}
        }

        let input = self.state.message_input_mut();
        match key.key.as_str() {
            "backspace" => input.delete_char_before(),
            "delete" => input.delete_char_at(),
            "left" => input.move_cursor_left(),
            "right" => input.move_cursor_right(),
            "home" => input.move_cursor_home(),
            "end" => input.move_cursor_end(),
            _ => {
                if let Some(ch) = key.as_char() {
                    input.insert_char(ch);
                }
            }
        }
    }

    fn activate_sidebar_entry(&mut self) {
        let Some(entry) = self.state.selected_sidebar_entry() else {
            return;
        };

        match entry {
            SidebarEntry::NewChat => self.new_chat(),
            SidebarEntry::Logout => self.logout(),
            SidebarEntry::Thread { chat_id, .. } => {
                if let Some(chat_id) = request_thread(&mut self.state, &chat_id) {
                    tracing::debug!(chat_id = %chat_id, "loading thread");
                    self.dispatcher.load_thread(chat_id);
                }
            }
        }
        self.state.focus_input();
    }

    fn send(&mut self) {
        match begin_send(&mut self.state, now_timestamp()) {
            Ok(command) => {
                self.state.clear_notice();
                tracing::debug!(
                    chat_id = command.chat_id.as_deref().unwrap_or("new"),
                    chars = command.message.chars().count(),
                    "sending message"
                );
                self.dispatcher.send_message(command);
            }
            Err(SendMessageError::ReplyPending) => {
                self.state.set_notice("Wait for the reply to finish");
            }
            Err(SendMessageError::NotLoggedIn | SendMessageError::EmptyMessage) => {}
        }
    }

    fn new_chat(&mut self) {
        if start_new_chat(&mut self.state) {
            let result = self.store.remove_current_chat_id();
            self.report_write_failure(result);
        }
    }

    fn logout(&mut self) {
        let result = logout(&mut self.state, &mut self.store);
        self.report_write_failure(result);
        tracing::info!("logged out");
    }

    fn handle_backend(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ReplyReady { reply, chat_id } => {
                if !accept_reply(&mut self.state, &reply, chat_id, new_local_chat_id) {
                    tracing::debug!("dropping reply that is no longer expected");
                }
            }
            BackendEvent::ReplyFailed => {
                fail_reply(&mut self.state);
            }
            BackendEvent::ThreadLoaded { chat_id, messages } => {
                if !self.state.is_logged_in() || self.state.pending_reply().is_some() {
                    tracing::debug!(chat_id = %chat_id, "dropping stale thread load");
                    return;
                }
                apply_loaded_thread(&mut self.state, chat_id.clone(), messages);
                self.persist_conversation(&chat_id);
            }
            BackendEvent::ThreadLoadFailed { chat_id } => {
                if !self.state.is_logged_in() || self.state.pending_reply().is_some() {
                    tracing::debug!(chat_id = %chat_id, "dropping stale thread load failure");
                    return;
                }
                apply_thread_load_failure(&mut self.state);
            }
        }
    }

    fn tick(&mut self) {
        if let Some(done) = advance_reveal(&mut self.state, self.chars_per_tick, now_timestamp) {
            self.persist_conversation(&done.chat_id);
        }
    }

    fn persist_conversation(&mut self, chat_id: &str) {
        let result = self
            .store
            .save_threads(self.state.threads())
            .and_then(|()| self.store.save_current_chat_id(chat_id));
        self.report_write_failure(result);
    }

    fn report_write_failure(&mut self, result: Result<()>) {
        if let Err(error) = result {
            tracing::warn!(code = STATE_WRITE_FAILED, error = %error, "failed to persist session");
            self.state.set_notice("Could not save chats to disk");
        }
    }
}

impl<S, D> ShellOrchestrator for DefaultShellOrchestrator<S, D>
where
    S: SessionStore,
    D: BackendDispatcher,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.tick(),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::Backend(event) => self.handle_backend(event),
        }

        Ok(())
    }

    fn take_login_request(&mut self) -> bool {
        self.state.take_login_request()
    }

    fn apply_login(&mut self, outcome: LoginOutcome) {
        let result = persist_login_outcome(&mut self.store, &outcome);
        self.report_write_failure(result);
        apply_login_outcome(&mut self.state, outcome);
    }
}
