//! Switching between conversations.

use crate::domain::{message::ChatMessage, shell_state::ShellState};

pub const THREAD_LOAD_FAILED_NOTICE: &str = "Failed to load this conversation.";

/// Clears the active conversation.
///
/// Returns false while a reply is still pending, since the reply would be
/// committed to a conversation that is no longer on screen.
pub fn start_new_chat(state: &mut ShellState) -> bool {
    if state.pending_reply().is_some() {
        state.set_notice("Wait for the reply to finish");
        return false;
    }

    state.set_active_chat_id(None);
    state.set_chat_history(Vec::new());
    true
}

/// Validates a thread switch. Returns the id to fetch, or None for an empty id.
pub fn request_thread(state: &mut ShellState, chat_id: &str) -> Option<String> {
    if chat_id.is_empty() {
        return None;
    }
    if state.pending_reply().is_some() {
        state.set_notice("Wait for the reply to finish");
        return None;
    }

    state.clear_notice();
    Some(chat_id.to_owned())
}

pub fn apply_loaded_thread(state: &mut ShellState, chat_id: String, messages: Vec<ChatMessage>) {
    state.threads_mut().set_messages(&chat_id, messages.clone());
    state.set_chat_history(messages);
    state.set_active_chat_id(Some(chat_id));
}

pub fn apply_thread_load_failure(state: &mut ShellState) {
    state.set_chat_history(vec![ChatMessage::notice(THREAD_LOAD_FAILED_NOTICE)]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{shell_state::PendingReply, thread::Thread},
        test_support::sample_user,
    };

    const TS: &str = "2024-05-01T10:00:00.000Z";

    fn state_in_thread() -> ShellState {
        let mut state = ShellState::default();
        state.set_user(sample_user());
        state
            .threads_mut()
            .upsert("c1", Thread::new("Trip", vec![ChatMessage::user("hi", TS)]));
        state.set_active_chat_id(Some("c1".to_owned()));
        state.set_chat_history(vec![ChatMessage::user("hi", TS)]);
        state
    }

    fn with_pending_reply(state: &mut ShellState) {
        state.set_pending_reply(PendingReply {
            user_text: "q".to_owned(),
            history: Vec::new(),
            chat_id: None,
        });
    }

    #[test]
    fn new_chat_clears_active_conversation_but_keeps_threads() {
        let mut state = state_in_thread();

        assert!(start_new_chat(&mut state));

        assert_eq!(state.active_chat_id(), None);
        assert!(state.chat_history().is_empty());
        assert!(state.threads().contains("c1"));
    }

    #[test]
    fn new_chat_waits_for_pending_reply() {
        let mut state = state_in_thread();
        with_pending_reply(&mut state);

        assert!(!start_new_chat(&mut state));
        assert_eq!(state.active_chat_id(), Some("c1"));
    }

    #[test]
    fn empty_id_is_not_requested() {
        let mut state = state_in_thread();

        assert_eq!(request_thread(&mut state, ""), None);
        assert_eq!(request_thread(&mut state, "c1").as_deref(), Some("c1"));
    }

    #[test]
    fn switching_is_refused_while_reply_pending() {
        let mut state = state_in_thread();
        with_pending_reply(&mut state);

        assert_eq!(request_thread(&mut state, "c1"), None);
        assert!(state.notice().is_some());
    }

    #[test]
    fn loaded_thread_becomes_active_and_keeps_title() {
        let mut state = state_in_thread();
        start_new_chat(&mut state);
        let messages = vec![ChatMessage::user("hi", TS), ChatMessage::ai("hello", TS)];

        apply_loaded_thread(&mut state, "c1".to_owned(), messages.clone());

        assert_eq!(state.active_chat_id(), Some("c1"));
        assert_eq!(state.chat_history(), messages.as_slice());
        let thread = state.threads().get("c1").expect("thread");
        assert_eq!(thread.title, "Trip");
        assert_eq!(thread.messages, messages);
    }

    #[test]
    fn unknown_loaded_thread_is_titled_by_id() {
        let mut state = state_in_thread();

        apply_loaded_thread(&mut state, "c9".to_owned(), vec![]);

        assert_eq!(state.threads().get("c9").map(|t| t.title.as_str()), Some("c9"));
        assert_eq!(state.threads().id_at(1), Some("c9"));
    }

    #[test]
    fn failed_load_shows_single_notice() {
        let mut state = state_in_thread();

        apply_thread_load_failure(&mut state);

        assert_eq!(
            state.chat_history(),
            [ChatMessage::notice(THREAD_LOAD_FAILED_NOTICE)]
        );
        assert_eq!(state.active_chat_id(), Some("c1"));
    }
}
