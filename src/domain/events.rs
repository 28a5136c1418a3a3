use super::message::ChatMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Backend(BackendEvent),
}

/// Results of background backend calls, delivered back to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    ReplyReady {
        reply: String,
        chat_id: Option<String>,
    },
    ReplyFailed,
    ThreadLoaded {
        chat_id: String,
        messages: Vec<ChatMessage>,
    },
    ThreadLoadFailed {
        chat_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// Returns the typed character for plain single-character keys.
    pub fn as_char(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }

        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_char_only_for_single_plain_characters() {
        assert_eq!(KeyInput::new("a", false).as_char(), Some('a'));
        assert_eq!(KeyInput::new("ж", false).as_char(), Some('ж'));
        assert_eq!(KeyInput::new("a", true).as_char(), None);
        assert_eq!(KeyInput::new("enter", false).as_char(), None);
    }
}
