//! Editing state of the chat input box.

/// Upper bound on a single prompt, in characters.
const MAX_INPUT_LENGTH: usize = 8_000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageInputState {
    chars: Vec<char>,
    /// Index into `chars`.
    cursor: usize,
}

impl MessageInputState {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns true when the text is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|ch| ch.is_whitespace())
    }

    /// Inserts at the cursor. Returns false when the input is full.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.chars.len() >= MAX_INPUT_LENGTH {
            return false;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    pub fn delete_char_before(&mut self) {
        if let Some(before) = self.cursor.checked_sub(1) {
            self.chars.remove(before);
            self.cursor = before;
        }
    }

    pub fn delete_char_at(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Empties the input and returns what was typed.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.chars).into_iter().collect()
    }
}
