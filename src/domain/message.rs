use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Maps a backend sender label. Anything that is not the user is the assistant.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("user") {
            Self::User
        } else {
            Self::Ai
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    #[serde(rename = "message")]
    pub text: String,
    /// RFC 3339 timestamp. Local notices (errors) carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    pub fn ai(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    /// An assistant-side message produced locally, e.g. a failure notice.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            timestamp: None,
        }
    }

    /// Returns `HH:MM` in local time, or None when the timestamp is absent or unparsable.
    pub fn display_time(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
        Some(parsed.with_timezone(&Local).format("%H:%M").to_string())
    }
}

/// Current time in the same shape as JavaScript's `toISOString`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_text_under_message_key() {
        let message = ChatMessage::user("hello", "2024-05-01T10:00:00.000Z");

        let json = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(json["sender"], "user");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn notice_omits_timestamp() {
        let json = serde_json::to_value(ChatMessage::notice("Error")).expect("serialize");

        assert_eq!(json["sender"], "ai");
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn deserializes_without_timestamp() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"sender":"ai","message":"hi"}"#).expect("deserialize");

        assert_eq!(message, ChatMessage::notice("hi"));
    }

    #[test]
    fn sender_label_mapping_treats_unknown_as_ai() {
        assert_eq!(Sender::from_label("user"), Sender::User);
        assert_eq!(Sender::from_label("USER"), Sender::User);
        assert_eq!(Sender::from_label("ai"), Sender::Ai);
        assert_eq!(Sender::from_label("assistant"), Sender::Ai);
    }

    #[test]
    fn display_time_is_none_for_garbage() {
        let mut message = ChatMessage::notice("x");
        assert_eq!(message.display_time(), None);

        message.timestamp = Some("yesterday".to_owned());
        assert_eq!(message.display_time(), None);
    }

    #[test]
    fn now_timestamp_round_trips_through_rfc3339() {
        let stamp = now_timestamp();

        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
