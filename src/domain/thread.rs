use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::message::ChatMessage;

/// Titles derived from the opening user message keep this many characters.
pub const DERIVED_TITLE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Thread {
    pub fn new(title: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            title: title.into(),
            messages,
        }
    }
}

/// Builds a thread title from the first characters of a user message.
pub fn derive_title(first_message: &str) -> String {
    first_message.chars().take(DERIVED_TITLE_CHARS).collect()
}

/// Conversation threads keyed by chat id, kept in insertion order.
///
/// Serialized as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreadIndex {
    entries: Vec<(String, Thread)>,
}

impl ThreadIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, chat_id: &str) -> Option<&Thread> {
        self.position(chat_id).map(|index| &self.entries[index].1)
    }

    #[cfg(test)]
    pub fn contains(&self, chat_id: &str) -> bool {
        self.position(chat_id).is_some()
    }

    /// Zero-based insertion position of a chat id.
    pub fn position(&self, chat_id: &str) -> Option<usize> {
        self.entries.iter().position(|(id, _)| id == chat_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thread)> {
        self.entries.iter().map(|(id, thread)| (id.as_str(), thread))
    }

    #[cfg(test)]
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(id, _)| id.as_str())
    }

    /// Inserts a thread; an existing id is replaced in place and keeps its position.
    pub fn upsert(&mut self, chat_id: impl Into<String>, thread: Thread) {
        let chat_id = chat_id.into();
        match self.position(&chat_id) {
            Some(index) => self.entries[index].1 = thread,
            None => self.entries.push((chat_id, thread)),
        }
    }

    /// Replaces the messages of a thread, keeping its title. Unknown ids are
    /// added with the id itself as title.
    pub fn set_messages(&mut self, chat_id: &str, messages: Vec<ChatMessage>) {
        match self.position(chat_id) {
            Some(index) => self.entries[index].1.messages = messages,
            None => self
                .entries
                .push((chat_id.to_owned(), Thread::new(chat_id, messages))),
        }
    }

    /// Stores the full history of a thread after a reply. Existing titles win;
    /// new threads are titled from the user message.
    pub fn record_exchange(&mut self, chat_id: &str, user_text: &str, messages: Vec<ChatMessage>) {
        let title = self
            .get(chat_id)
            .map(|thread| thread.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| derive_title(user_text));

        self.upsert(chat_id, Thread::new(title, messages));
    }
}

impl FromIterator<(String, Thread)> for ThreadIndex {
    fn from_iter<T: IntoIterator<Item = (String, Thread)>>(iter: T) -> Self {
        let mut index = Self::default();
        for (chat_id, thread) in iter {
            index.upsert(chat_id, thread);
        }
        index
    }
}

impl Serialize for ThreadIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (chat_id, thread) in &self.entries {
            map.serialize_entry(chat_id, thread)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThreadIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ThreadIndexVisitor;

        impl<'de> Visitor<'de> for ThreadIndexVisitor {
            type Value = ThreadIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of chat id to thread")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut index = ThreadIndex::default();
                while let Some((chat_id, thread)) = access.next_entry::<String, Thread>()? {
                    index.upsert(chat_id, thread);
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(ThreadIndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> ChatMessage {
        ChatMessage::user(text, "2024-05-01T10:00:00.000Z")
    }

    #[test]
    fn keeps_insertion_order() {
        let mut index = ThreadIndex::default();
        index.upsert("b", Thread::new("B", vec![]));
        index.upsert("a", Thread::new("A", vec![]));
        index.upsert("c", Thread::new("C", vec![]));

        let ids: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn upsert_replaces_existing_in_place() {
        let mut index = ThreadIndex::default();
        index.upsert("a", Thread::new("A", vec![]));
        index.upsert("b", Thread::new("B", vec![]));

        index.upsert("a", Thread::new("A2", vec![msg("x")]));

        assert_eq!(index.len(), 2);
        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.get("a").map(|t| t.title.as_str()), Some("A2"));
    }

    #[test]
    fn set_messages_keeps_title_and_defaults_unknown_to_id() {
        let mut index = ThreadIndex::default();
        index.upsert("a", Thread::new("Alpha", vec![]));

        index.set_messages("a", vec![msg("one")]);
        index.set_messages("zz", vec![msg("two")]);

        assert_eq!(index.get("a").map(|t| t.title.as_str()), Some("Alpha"));
        assert_eq!(index.get("a").map(|t| t.messages.len()), Some(1));
        assert_eq!(index.get("zz").map(|t| t.title.as_str()), Some("zz"));
    }

    #[test]
    fn record_exchange_titles_new_threads_from_first_twenty_chars() {
        let mut index = ThreadIndex::default();

        index.record_exchange("c1", "What is the capital city of France?", vec![]);

        assert_eq!(
            index.get("c1").map(|t| t.title.as_str()),
            Some("What is the capital ")
        );
    }

    #[test]
    fn record_exchange_keeps_existing_title() {
        let mut index = ThreadIndex::default();
        index.upsert("c1", Thread::new("Geography", vec![]));

        index.record_exchange("c1", "Another question", vec![msg("q")]);

        let thread = index.get("c1").expect("thread should exist");
        assert_eq!(thread.title, "Geography");
        assert_eq!(thread.messages.len(), 1);
    }

    #[test]
    fn derive_title_counts_characters_not_bytes() {
        assert_eq!(derive_title("Привет, как дела? Всё хорошо"), "Привет, как дела? Вс");
        assert_eq!(derive_title("short"), "short");
    }

    #[test]
    fn json_object_preserves_order() {
        let raw = r#"{"z":{"title":"Z","messages":[]},"a":{"title":"A"}}"#;

        let index: ThreadIndex = serde_json::from_str(raw).expect("index should parse");
        assert_eq!(index.id_at(0), Some("z"));
        assert_eq!(index.id_at(1), Some("a"));
        assert!(index.get("a").is_some_and(|t| t.messages.is_empty()));

        let encoded = serde_json::to_string(&index).expect("index should encode");
        assert!(encoded.find("\"z\"") < encoded.find("\"a\""));
    }
}
