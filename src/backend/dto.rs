//! JSON shapes exchanged with the chat backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{
    message::{ChatMessage, Sender},
    thread::{Thread, ThreadIndex},
    user::UserProfile,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest<'a> {
    pub sub: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
    #[serde(rename = "emailID", skip_serializing_if = "Option::is_none")]
    pub email_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<&'a str>,
    pub phone_number: &'a str,
    pub conversation_history: Vec<ChatMessage>,
}

impl<'a> From<&'a UserProfile> for RegisterUserRequest<'a> {
    fn from(user: &'a UserProfile) -> Self {
        Self {
            sub: &user.sub,
            full_name: user.name.as_deref(),
            email_id: user.email.as_deref(),
            family_name: user.family_name.as_deref(),
            picture: user.picture.as_deref(),
            phone_number: "",
            conversation_history: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub user: &'a UserProfile,
    pub message: &'a str,
    /// Sent as `null` for a conversation the backend has not seen yet.
    pub chat_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSummary {
    #[serde(default, deserialize_with = "lenient_id")]
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    timestamp: Option<Value>,
}

/// Builds the thread index from `/chats/{sub}`; a missing title falls back to the chat id.
pub fn threads_from_summaries(summaries: Vec<ChatSummary>) -> ThreadIndex {
    summaries
        .into_iter()
        .filter_map(|summary| {
            let Some(chat_id) = summary.chat_id else {
                tracing::warn!("skipping chat summary without chat_id");
                return None;
            };
            let title = summary
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| chat_id.clone());
            let messages = messages_from_values(summary.messages.unwrap_or_default());
            Some((chat_id, Thread::new(title, messages)))
        })
        .collect()
}

/// Extracts messages from a `/chat/{id}` payload: a bare array, or an object
/// carrying `conversationHistory` or `messages`. Returns None for any other shape.
pub fn extract_thread_messages(payload: Value) -> Option<Vec<ChatMessage>> {
    let values = match payload {
        Value::Array(values) => values,
        Value::Object(mut object) => match object.remove("conversationHistory") {
            Some(Value::Array(values)) => values,
            _ => match object.remove("messages") {
                Some(Value::Array(values)) => values,
                _ => return None,
            },
        },
        _ => return None,
    };

    Some(messages_from_values(values))
}

/// Keeps entries that have both a non-empty sender and a non-empty message.
fn messages_from_values(values: Vec<Value>) -> Vec<ChatMessage> {
    values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<WireMessage>(value).ok())
        .filter_map(|wire| {
            let sender = wire.sender.filter(|sender| !sender.is_empty())?;
            let text = wire.message.filter(|text| !text.is_empty())?;
            Some(ChatMessage {
                sender: Sender::from_label(&sender),
                text,
                timestamp: wire.timestamp.and_then(|value| match value {
                    Value::String(timestamp) => Some(timestamp),
                    _ => None,
                }),
            })
        })
        .collect()
}

/// Accepts ids encoded as strings or numbers.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

/// Non-string values are treated as absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}
