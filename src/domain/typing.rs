//! Simulated character-by-character reveal of an assistant reply.

/// Frame shown while the backend has not answered yet.
pub const AWAITING_FRAME: &str = "...";

/// Cursor appended to the partially revealed reply.
pub const REVEAL_CURSOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypingState {
    #[default]
    Idle,
    Awaiting,
    Revealing(TypingReveal),
}

impl TypingState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Text of the typing indicator, or None when idle.
    pub fn frame(&self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Awaiting => Some(AWAITING_FRAME.to_owned()),
            Self::Revealing(reveal) => Some(reveal.frame()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingReveal {
    chars: Vec<char>,
    revealed: usize,
}

impl TypingReveal {
    pub fn new(reply: &str) -> Self {
        Self {
            chars: reply.chars().collect(),
            revealed: 0,
        }
    }

    /// Reveals up to `count` more characters. Returns true once nothing is left.
    ///
    /// Completion is reported one step after the last character, so the full
    /// text with a cursor is visible for at least one frame.
    pub fn advance(&mut self, count: usize) -> bool {
        if self.revealed >= self.chars.len() {
            return true;
        }

        self.revealed = self.chars.len().min(self.revealed + count.max(1));
        false
    }

    pub fn revealed_text(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    pub fn full_text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn frame(&self) -> String {
        let mut frame = self.revealed_text();
        frame.push(REVEAL_CURSOR);
        frame
    }
}
