use std::sync::{mpsc::Sender, Arc};

use tokio::runtime::Handle;

use crate::{
    domain::events::{AppEvent, BackendEvent},
    usecases::{contracts::BackendDispatcher, send_message::SendMessageCommand},
};

use super::{dto::extract_thread_messages, http::HttpChatBackend};

const BACKEND_SEND_FAILED: &str = "BACKEND_SEND_FAILED";
const BACKEND_THREAD_LOAD_FAILED: &str = "BACKEND_THREAD_LOAD_FAILED";
const BACKEND_THREAD_SHAPE_UNEXPECTED: &str = "BACKEND_THREAD_SHAPE_UNEXPECTED";
const BACKEND_EVENT_SEND_FAILED: &str = "BACKEND_EVENT_SEND_FAILED";

/// Runs backend calls on the tokio runtime and reports results to the UI loop.
#[derive(Debug, Clone)]
pub struct RuntimeDispatcher {
    handle: Handle,
    chat: Arc<HttpChatBackend>,
    events: Sender<AppEvent>,
}

impl RuntimeDispatcher {
    pub fn new(handle: Handle, chat: Arc<HttpChatBackend>, events: Sender<AppEvent>) -> Self {
        Self {
            handle,
            chat,
            events,
        }
    }
}

impl BackendDispatcher for RuntimeDispatcher {
    fn send_message(&self, command: SendMessageCommand) {
        let chat = Arc::clone(&self.chat);
        let events = self.events.clone();

        self.handle.spawn(async move {
            let event = match chat.send_message(&command).await {
                Ok(reply) => BackendEvent::ReplyReady {
                    reply: reply.reply,
                    chat_id: reply.chat_id,
                },
                Err(error) => {
                    tracing::warn!(
                        code = BACKEND_SEND_FAILED,
                        reason = %error.code(),
                        error = %error,
                        "chat request failed"
                    );
                    BackendEvent::ReplyFailed
                }
            };
            deliver(&events, event);
        });
    }

    fn load_thread(&self, chat_id: String) {
        let chat = Arc::clone(&self.chat);
        let events = self.events.clone();

        self.handle.spawn(async move {
            let event = match chat.load_thread(&chat_id).await {
                Ok(payload) => {
                    let messages = extract_thread_messages(payload).unwrap_or_else(|| {
                        tracing::warn!(
                            code = BACKEND_THREAD_SHAPE_UNEXPECTED,
                            chat_id = %chat_id,
                            "thread payload has no message list; treating as empty"
                        );
                        Vec::new()
                    });
                    BackendEvent::ThreadLoaded { chat_id, messages }
                }
                Err(error) => {
                    tracing::warn!(
                        code = BACKEND_THREAD_LOAD_FAILED,
                        reason = %error.code(),
                        chat_id = %chat_id,
                        error = %error,
                        "thread request failed"
                    );
                    BackendEvent::ThreadLoadFailed { chat_id }
                }
            };
            deliver(&events, event);
        });
    }
}

fn deliver(events: &Sender<AppEvent>, event: BackendEvent) {
    if let Err(error) = events.send(AppEvent::Backend(event)) {
        tracing::debug!(
            code = BACKEND_EVENT_SEND_FAILED,
            error = %error,
            "ui loop is gone; dropping backend event"
        );
    }
}
