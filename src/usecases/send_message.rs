//! Sending a user message and committing the assistant's reply.
//!
//! The exchange runs in three steps driven by the shell: `begin_send` appends
//! the user message and yields the backend command, `accept_reply` (or
//! `fail_reply`) reacts to the backend, and `advance_reveal` plays the reply
//! back one tick at a time until it is committed to the thread index.

use crate::domain::{
    message::ChatMessage,
    shell_state::{PendingReply, ShellState},
    typing::{TypingReveal, TypingState},
    user::UserProfile,
};

/// Shown in the conversation when the backend call fails.
pub const REPLY_FAILED_NOTICE: &str = "Error: AI couldn't respond.";

/// Request body for the backend `/chat` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub user: UserProfile,
    pub message: String,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// No signed-in user; the login modal has been raised.
    NotLoggedIn,
    /// Input is empty after trimming whitespace.
    EmptyMessage,
    /// A previous reply has not finished yet.
    ReplyPending,
}

/// The thread that received a completed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExchange {
    pub chat_id: String,
}

pub fn begin_send(
    state: &mut ShellState,
    timestamp: String,
) -> Result<SendMessageCommand, SendMessageError> {
    let Some(user) = state.user().cloned() else {
        state.show_login_modal();
        return Err(SendMessageError::NotLoggedIn);
    };

    if state.message_input().is_blank() {
        return Err(SendMessageError::EmptyMessage);
    }

    if state.pending_reply().is_some() || state.typing().is_active() {
        return Err(SendMessageError::ReplyPending);
    }

    let text = state.message_input_mut().take_text().trim().to_owned();
    state.push_message(ChatMessage::user(text.clone(), timestamp));

    let chat_id = state.active_chat_id().map(ToOwned::to_owned);
    state.set_pending_reply(PendingReply {
        user_text: text.clone(),
        history: state.chat_history().to_vec(),
        chat_id: chat_id.clone(),
    });
    state.set_typing(TypingState::Awaiting);

    Ok(SendMessageCommand {
        user,
        message: text,
        chat_id,
    })
}

/// Starts revealing a reply. The backend's chat id wins, then the id the
/// message was sent under, then `new_local_id`.
///
/// Returns false when no reply was expected (e.g. after logout).
pub fn accept_reply(
    state: &mut ShellState,
    reply: &str,
    chat_id: Option<String>,
    new_local_id: impl FnOnce() -> String,
) -> bool {
    let Some(pending) = state.pending_reply_mut() else {
        return false;
    };

    let was_new_conversation = pending.chat_id.is_none();
    let resolved = chat_id
        .or_else(|| pending.chat_id.clone())
        .unwrap_or_else(new_local_id);
    pending.chat_id = Some(resolved.clone());

    if was_new_conversation {
        state.set_active_chat_id(Some(resolved));
    }
    state.set_typing(TypingState::Revealing(TypingReveal::new(reply)));
    true
}

/// Appends the failure notice. The thread index is left untouched.
pub fn fail_reply(state: &mut ShellState) -> bool {
    if state.take_pending_reply().is_none() {
        return false;
    }

    state.push_message(ChatMessage::notice(REPLY_FAILED_NOTICE));
    state.set_typing(TypingState::Idle);
    true
}

/// Reveals `chars` more characters; commits the exchange once the reply is fully shown.
pub fn advance_reveal(
    state: &mut ShellState,
    chars: usize,
    timestamp: impl FnOnce() -> String,
) -> Option<CompletedExchange> {
    let TypingState::Revealing(reveal) = state.typing_mut() else {
        return None;
    };

    if !reveal.advance(chars) {
        return None;
    }
    let reply = reveal.full_text();
    state.set_typing(TypingState::Idle);

    let pending = state.take_pending_reply()?;
    let chat_id = pending.chat_id?;

    let mut messages = pending.history;
    messages.push(ChatMessage::ai(reply, timestamp()));

    state
        .threads_mut()
        .record_exchange(&chat_id, &pending.user_text, messages.clone());
    state.set_chat_history(messages);
    state.set_active_chat_id(Some(chat_id.clone()));

    Some(CompletedExchange { chat_id })
}

/// Id for a conversation the backend did not name.
pub fn new_local_chat_id() -> String {
    format!("local-{}", chrono::Utc::now().timestamp_millis())
}
